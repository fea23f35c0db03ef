//! Canonical date, datetime and duration strings of API v3
//!
//! Dates are `YYYY-MM-DD`, datetimes RFC 3339 in UTC, durations ISO 8601
//! (`PT1H30M`). Every function takes an `allow_nil` flag: with it a missing
//! value passes through as `None`, without it a missing value is an error.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use op_core::{OpError, OpResult};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct DateTimeFormatter;

impl DateTimeFormatter {
    pub fn format_date(date: Option<NaiveDate>, allow_nil: bool) -> OpResult<Option<String>> {
        match date {
            Some(date) => Ok(Some(date.format(DATE_FORMAT).to_string())),
            None => nil_or_error(allow_nil, "ISO 8601 date"),
        }
    }

    pub fn parse_date(value: &Value, property: &str, allow_nil: bool) -> OpResult<Option<NaiveDate>> {
        match value {
            Value::Null if allow_nil => Ok(None),
            Value::String(raw) => {
                // chrono accepts unpadded fields, the API does not
                let strict = raw.len() == 10 && raw.as_bytes()[4] == b'-' && raw.as_bytes()[7] == b'-';
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .ok()
                    .filter(|_| strict)
                    .map(Some)
                    .ok_or_else(|| OpError::invalid_format(property, "ISO 8601 date only", raw))
            }
            other => Err(OpError::invalid_format(
                property,
                "ISO 8601 date only",
                other.to_string(),
            )),
        }
    }

    pub fn format_datetime(
        datetime: Option<DateTime<Utc>>,
        allow_nil: bool,
    ) -> OpResult<Option<String>> {
        match datetime {
            Some(datetime) => Ok(Some(datetime.to_rfc3339_opts(SecondsFormat::Secs, true))),
            None => nil_or_error(allow_nil, "ISO 8601 date and time"),
        }
    }

    /// Formats fractional hours, rounded to whole seconds
    pub fn format_duration_from_hours(hours: Option<f64>, allow_nil: bool) -> OpResult<Option<String>> {
        let Some(hours) = hours else {
            return nil_or_error(allow_nil, "ISO 8601 duration");
        };

        if !hours.is_finite() {
            return Err(OpError::invalid_format("duration", "finite number of hours", hours.to_string()));
        }

        // saturates at the i64 range
        let total_seconds = (hours * 3600.0).round() as i64;
        if total_seconds == 0 {
            return Ok(Some("PT0S".to_string()));
        }

        let sign = if total_seconds < 0 { "-" } else { "" };
        let total_seconds = total_seconds.unsigned_abs();
        let (h, m, s) = (
            total_seconds / 3600,
            (total_seconds % 3600) / 60,
            total_seconds % 60,
        );

        let mut out = format!("{}PT", sign);
        if h > 0 {
            out.push_str(&format!("{}H", h));
        }
        if m > 0 {
            out.push_str(&format!("{}M", m));
        }
        if s > 0 {
            out.push_str(&format!("{}S", s));
        }
        Ok(Some(out))
    }

    pub fn parse_duration_to_hours(
        value: &Value,
        property: &str,
        allow_nil: bool,
    ) -> OpResult<Option<f64>> {
        match value {
            Value::Null if allow_nil => Ok(None),
            Value::String(raw) => parse_iso8601_duration(raw)
                .map(Some)
                .ok_or_else(|| OpError::invalid_format(property, "ISO 8601 duration", raw)),
            other => Err(OpError::invalid_format(
                property,
                "ISO 8601 duration",
                other.to_string(),
            )),
        }
    }
}

fn nil_or_error<T>(allow_nil: bool, expected: &str) -> OpResult<Option<T>> {
    if allow_nil {
        Ok(None)
    } else {
        Err(OpError::invalid_format("value", expected, "null"))
    }
}

/// `P[nD][T[nH][nM][nS]]` in hours; weeks, months and years are rejected
fn parse_iso8601_duration(raw: &str) -> Option<f64> {
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let rest = rest.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut hours = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut seen_component = false;

    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'T' if !in_time && number.is_empty() => in_time = true,
            unit => {
                let amount: f64 = number.parse().ok()?;
                number.clear();
                hours += match (in_time, unit) {
                    (false, 'D') => amount * 24.0,
                    (true, 'H') => amount,
                    (true, 'M') => amount / 60.0,
                    (true, 'S') => amount / 3600.0,
                    _ => return None,
                };
                seen_component = true;
            }
        }
    }

    if !number.is_empty() || !seen_component {
        return None;
    }
    Some(if negative { -hours } else { hours })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(
            DateTimeFormatter::format_date(date, false).unwrap().as_deref(),
            Some("2024-03-07")
        );
        assert_eq!(DateTimeFormatter::format_date(None, true).unwrap(), None);
        assert!(DateTimeFormatter::format_date(None, false).is_err());
    }

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(
            DateTimeFormatter::parse_date(&json!("2024-03-07"), "startDate", false).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 7)
        );
        assert_eq!(
            DateTimeFormatter::parse_date(&Value::Null, "startDate", true).unwrap(),
            None
        );

        for bad in [json!("2024-3-7"), json!("07.03.2024"), json!(20240307), Value::Null] {
            let err = DateTimeFormatter::parse_date(&bad, "startDate", false).unwrap_err();
            assert!(matches!(err, OpError::InvalidFormat { ref property, .. } if property == "startDate"));
        }
    }

    #[test]
    fn test_format_datetime() {
        let datetime = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(
            DateTimeFormatter::format_datetime(Some(datetime), false)
                .unwrap()
                .as_deref(),
            Some("2024-03-07T14:05:09Z")
        );
    }

    #[test]
    fn test_format_duration() {
        let format = |h| {
            DateTimeFormatter::format_duration_from_hours(Some(h), false)
                .unwrap()
                .unwrap()
        };
        assert_eq!(format(1.0), "PT1H");
        assert_eq!(format(1.5), "PT1H30M");
        assert_eq!(format(0.5), "PT30M");
        assert_eq!(format(0.0), "PT0S");
        assert_eq!(format(26.0), "PT26H");
        assert_eq!(
            DateTimeFormatter::format_duration_from_hours(None, true).unwrap(),
            None
        );
    }

    #[test]
    fn test_format_duration_out_of_range() {
        let huge_negative = DateTimeFormatter::format_duration_from_hours(Some(-1e300), true)
            .unwrap()
            .unwrap();
        assert!(huge_negative.starts_with("-PT"));
        assert!(huge_negative.ends_with('S'));

        let huge = DateTimeFormatter::format_duration_from_hours(Some(1e300), true)
            .unwrap()
            .unwrap();
        assert!(huge.starts_with("PT"));

        assert!(matches!(
            DateTimeFormatter::format_duration_from_hours(Some(f64::NAN), true),
            Err(OpError::InvalidFormat { .. })
        ));
        assert!(DateTimeFormatter::format_duration_from_hours(Some(f64::NEG_INFINITY), true).is_err());
    }

    #[test]
    fn test_parse_duration() {
        let parse = |raw: &str| {
            DateTimeFormatter::parse_duration_to_hours(&json!(raw), "estimatedTime", false)
        };
        assert_eq!(parse("PT1H30M").unwrap(), Some(1.5));
        assert_eq!(parse("P1DT2H").unwrap(), Some(26.0));
        assert_eq!(parse("PT45S").unwrap(), Some(0.0125));
        assert!(parse("PT").is_err());
        assert!(parse("P1W").is_err());
        assert!(parse("1 hour").is_err());
    }
}
