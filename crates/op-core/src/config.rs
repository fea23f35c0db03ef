//! Configuration types and loading
//!
//! Mirrors OpenProject's Settings and configuration patterns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::OpError;
use crate::result::OpResult;
use crate::types::{DoneRatioMode, TextFormat, UserFormat};

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Work package behaviour
    pub work_packages: WorkPackageConfig,

    /// Instance-specific settings
    pub instance: InstanceConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Path prefix the application is mounted under (e.g. "/openproject")
    pub rails_relative_url_root: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkPackageConfig {
    /// How percentage done is maintained, or whether it is shown at all
    pub done_ratio: DoneRatioMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceConfig {
    /// Application title
    pub app_title: String,
    /// Default locale
    pub default_locale: String,
    /// Markup used for formattable texts
    pub text_formatting: TextFormat,
    /// How user names are displayed and sorted
    pub user_format: UserFormat,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            app_title: "OpenProject".to_string(),
            default_locale: "en".to_string(),
            text_formatting: TextFormat::Textile,
            user_format: UserFormat::FirstnameLastname,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> OpResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from `OPENPROJECT_*` style keys resolved by `lookup`
    pub fn from_lookup<F>(lookup: F) -> OpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup("RAILS_RELATIVE_URL_ROOT") {
            let root = root.trim_end_matches('/').to_string();
            config.server.rails_relative_url_root = if root.is_empty() { None } else { Some(root) };
        }

        if let Some(mode) = parse_key::<DoneRatioMode, _>(&lookup, "OPENPROJECT_WORK_PACKAGE_DONE_RATIO")? {
            config.work_packages.done_ratio = mode;
        }

        if let Some(title) = lookup("OPENPROJECT_APP_TITLE") {
            config.instance.app_title = title;
        }
        if let Some(locale) = lookup("OPENPROJECT_DEFAULT_LOCALE") {
            config.instance.default_locale = locale;
        }
        if let Some(format) = parse_key::<TextFormat, _>(&lookup, "OPENPROJECT_TEXT_FORMATTING")? {
            config.instance.text_formatting = format;
        }
        if let Some(format) = parse_key::<UserFormat, _>(&lookup, "OPENPROJECT_USER_FORMAT")? {
            config.instance.user_format = format;
        }

        Ok(config)
    }
}

fn parse_key<T, F>(lookup: &F, key: &str) -> OpResult<Option<T>>
where
    T: FromStr<Err = String>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|message| OpError::Config {
                key: key.to_string(),
                message,
            }),
        None => Ok(None),
    }
}

/// Dynamic settings (stored in database)
/// Mirrors OpenProject's Setting model
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

/// Setting keys read by the API layer
pub mod keys {
    pub const WORK_PACKAGE_DONE_RATIO: &str = "work_package_done_ratio";
    pub const USER_FORMAT: &str = "user_format";
    pub const TEXT_FORMATTING: &str = "text_formatting";
}

impl Settings {
    /// Seed the settings store from static configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let mut settings = Self::default();
        settings.set(
            keys::WORK_PACKAGE_DONE_RATIO,
            SettingValue::String(config.work_packages.done_ratio.as_str().to_string()),
        );
        settings.set(
            keys::USER_FORMAT,
            SettingValue::String(config.instance.user_format.as_str().to_string()),
        );
        settings.set(
            keys::TEXT_FORMATTING,
            SettingValue::String(config.instance.text_formatting.as_str().to_string()),
        );
        settings
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(SettingValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(SettingValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(SettingValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    /// Unknown or missing values fall back to the default mode
    pub fn work_package_done_ratio(&self) -> DoneRatioMode {
        self.parsed(keys::WORK_PACKAGE_DONE_RATIO)
    }

    pub fn user_format(&self) -> UserFormat {
        self.parsed(keys::USER_FORMAT)
    }

    pub fn text_formatting(&self) -> TextFormat {
        self.parsed(keys::TEXT_FORMATTING)
    }

    fn parsed<T: FromStr + Default>(&self, key: &str) -> T {
        self.get_string(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}
