//! Translation lookup
//!
//! Mirrors Rails' `I18n.t` for the keys the API layer needs. Translations are
//! bundled YAML in the Rails locale layout (`en: { activerecord: ... }`) and
//! flattened into dotted keys on first use.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const DEFAULT_LOCALE: &str = "en";

static BUNDLED: &[(&str, &str)] = &[("en", include_str!("../locales/en.yml"))];

static TRANSLATIONS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (locale, source) in BUNDLED {
        match serde_yaml::from_str::<serde_yaml::Value>(source) {
            Ok(document) => flatten(&document, "", &mut table),
            Err(e) => tracing::warn!("Failed to load translations for {}: {}", locale, e),
        }
    }
    table
});

fn flatten(value: &serde_yaml::Value, prefix: &str, table: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(child, &path, table);
            }
        }
        serde_yaml::Value::String(s) => {
            table.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}

/// Translate `key` in the default locale
pub fn t(key: &str) -> String {
    t_in(DEFAULT_LOCALE, key)
}

/// Translate `key` in `locale`, falling back to the default locale and then
/// to a humanized form of the key's last segment
pub fn t_in(locale: &str, key: &str) -> String {
    TRANSLATIONS
        .get(&format!("{}.{}", locale, key))
        .or_else(|| TRANSLATIONS.get(&format!("{}.{}", DEFAULT_LOCALE, key)))
        .cloned()
        .unwrap_or_else(|| {
            tracing::trace!(key, "translation missing");
            humanize(key.rsplit('.').next().unwrap_or(key))
        })
}

/// "start_date" => "Start date"
pub fn humanize(attribute: &str) -> String {
    let words = attribute.trim_start_matches('_').replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_translation() {
        assert_eq!(t("activerecord.attributes.work_package.start_date"), "Start date");
        assert_eq!(t("api_v3.attributes.lock_version"), "Lock Version");
    }

    #[test]
    fn test_missing_translation_is_humanized() {
        assert_eq!(t("activerecord.attributes.work_package.story_points"), "Story points");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_default() {
        assert_eq!(t_in("de", "activerecord.attributes.work_package.status"), "Status");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("due_date"), "Due date");
        assert_eq!(humanize("_type"), "Type");
        assert_eq!(humanize(""), "");
    }
}
