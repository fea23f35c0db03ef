//! Custom field model
//!
//! Mirrors: app/models/work_package_custom_field.rb
//! Table: custom_fields (with type = 'WorkPackageCustomField')
//!
//! Custom fields are administrator-defined attributes attached to work packages
//! through the (project, type) pairs that enable them.

use op_core::traits::Id;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// The value type of a custom field (`field_format` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldFormat {
    String,
    Text,
    Int,
    Float,
    Date,
    Bool,
    List,
    User,
    Version,
}

impl CustomFieldFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::Date => "date",
            Self::Bool => "bool",
            Self::List => "list",
            Self::User => "user",
            Self::Version => "version",
        }
    }

    /// Whether values of this format reference another resource
    pub fn is_link(&self) -> bool {
        matches!(self, Self::User | Self::Version)
    }
}

impl fmt::Display for CustomFieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work package custom field
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: Id,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub field_format: CustomFieldFormat,

    #[serde(default)]
    pub is_required: bool,

    /// Selectable values for list fields, in display order
    #[serde(default)]
    pub possible_values: Vec<String>,

    /// Length bounds for string/text fields (0 means unbounded)
    #[serde(default)]
    pub min_length: u32,
    #[serde(default)]
    pub max_length: u32,

    pub default_value: Option<String>,
}

impl CustomField {
    pub fn new(id: Id, name: impl Into<String>, field_format: CustomFieldFormat) -> Self {
        Self {
            id,
            name: name.into(),
            field_format,
            is_required: false,
            possible_values: Vec::new(),
            min_length: 0,
            max_length: 0,
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_possible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_length(mut self, min: u32, max: u32) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// API property name of this field, e.g. `customField12`
    pub fn accessor_name(&self) -> String {
        format!("customField{}", self.id)
    }
}
