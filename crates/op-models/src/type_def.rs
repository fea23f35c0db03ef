//! Type model (work package type)
//!
//! Mirrors: app/models/type.rb
//! Table: types
//!
//! Note: Named `type_def` because `type` is a Rust reserved keyword

use op_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::custom_field::CustomField;

/// Work package type entity
///
/// Types categorize work packages (Task, Bug, Feature, Epic, etc.)
///
/// # Ruby equivalent
/// ```ruby
/// class Type < ApplicationRecord
///   has_many :work_packages
///   has_and_belongs_to_many :projects
///   has_and_belongs_to_many :custom_fields
///   has_many :workflows
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    pub id: Option<Id>,

    /// Type name (unique)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Sort position
    #[serde(default)]
    pub position: i32,

    /// Whether this is the default type for new work packages
    #[serde(default)]
    pub is_default: bool,

    /// Whether this is a milestone type (no duration, just a date)
    #[serde(default)]
    pub is_milestone: bool,

    /// Work package custom fields activated for this type
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl Default for Type {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            position: 0,
            is_default: false,
            is_milestone: false,
            custom_fields: Vec::new(),
        }
    }
}

impl Identifiable for Type {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Type {
    /// Create a new type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: persisted type
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Primary key, 0 for unsaved types
    pub fn id_or_zero(&self) -> Id {
        self.id.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_new() {
        let t = Type::new("Bug");
        assert_eq!(t.name, "Bug");
        assert!(!t.is_milestone);
        assert!(t.custom_fields.is_empty());
    }
}
