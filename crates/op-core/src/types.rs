//! Common types used throughout OpenProject RS

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formattable text (raw markup plus its HTML rendering)
/// Mirrors OpenProject's Formattable concern
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Formattable {
    /// Markup language the raw text is written in
    pub format: TextFormat,
    /// Raw content, `None` when the attribute is unset
    pub raw: Option<String>,
    /// Rendered HTML content
    pub html: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Textile,
    Markdown,
    Plain,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Textile => "textile",
            Self::Markdown => "markdown",
            Self::Plain => "plain",
        }
    }
}

impl FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textile" => Ok(Self::Textile),
            "markdown" => Ok(Self::Markdown),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown text format '{}'", other)),
        }
    }
}

/// How user names are displayed and sorted (Setting.user_format)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserFormat {
    #[default]
    FirstnameLastname,
    Firstname,
    LastnameFirstname,
    LastnameComaFirstname,
    Username,
}

/// A user attribute participating in name formatting and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameColumn {
    Firstname,
    Lastname,
    Login,
}

impl UserFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstnameLastname => "firstname_lastname",
            Self::Firstname => "firstname",
            Self::LastnameFirstname => "lastname_firstname",
            Self::LastnameComaFirstname => "lastname_coma_firstname",
            Self::Username => "username",
        }
    }

    /// Columns users are ordered by under this format
    pub fn order_columns(&self) -> &'static [NameColumn] {
        match self {
            Self::FirstnameLastname => &[NameColumn::Firstname, NameColumn::Lastname],
            Self::Firstname => &[NameColumn::Firstname],
            Self::LastnameFirstname | Self::LastnameComaFirstname => {
                &[NameColumn::Lastname, NameColumn::Firstname]
            }
            Self::Username => &[NameColumn::Login],
        }
    }

    /// Display name for the given name parts
    pub fn format_name(&self, firstname: &str, lastname: &str, login: &str) -> String {
        let name = match self {
            Self::FirstnameLastname => format!("{} {}", firstname, lastname),
            Self::Firstname => firstname.to_string(),
            Self::LastnameFirstname => format!("{} {}", lastname, firstname),
            Self::LastnameComaFirstname => format!("{}, {}", lastname, firstname),
            Self::Username => login.to_string(),
        };
        name.trim().to_string()
    }
}

impl FromStr for UserFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstname_lastname" => Ok(Self::FirstnameLastname),
            "firstname" => Ok(Self::Firstname),
            "lastname_firstname" => Ok(Self::LastnameFirstname),
            "lastname_coma_firstname" => Ok(Self::LastnameComaFirstname),
            "username" => Ok(Self::Username),
            other => Err(format!("unknown user format '{}'", other)),
        }
    }
}

/// How a work package's done ratio is maintained (Setting.work_package_done_ratio)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DoneRatioMode {
    #[default]
    Field,
    Status,
    Disabled,
}

impl DoneRatioMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Status => "status",
            Self::Disabled => "disabled",
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl FromStr for DoneRatioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field" => Ok(Self::Field),
            "status" => Ok(Self::Status),
            "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown done ratio mode '{}'", other)),
        }
    }
}

impl fmt::Display for DoneRatioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Registered,
    Locked,
    Invited,
}

impl UserStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Registered => "registered",
            Self::Locked => "locked",
            Self::Invited => "invited",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_format_names() {
        assert_eq!(
            UserFormat::FirstnameLastname.format_name("Ada", "Lovelace", "ada"),
            "Ada Lovelace"
        );
        assert_eq!(
            UserFormat::LastnameComaFirstname.format_name("Ada", "Lovelace", "ada"),
            "Lovelace, Ada"
        );
        assert_eq!(UserFormat::Username.format_name("Ada", "Lovelace", "ada"), "ada");
    }

    #[test]
    fn test_user_format_parse() {
        assert_eq!(
            "lastname_firstname".parse::<UserFormat>(),
            Ok(UserFormat::LastnameFirstname)
        );
        assert!("nickname".parse::<UserFormat>().is_err());
    }

    #[test]
    fn test_done_ratio_mode() {
        assert!("disabled".parse::<DoneRatioMode>().unwrap().is_disabled());
        assert!(!DoneRatioMode::default().is_disabled());
        assert_eq!(DoneRatioMode::Status.to_string(), "status");
    }
}
