//! Priority model (issue priority)
//!
//! Mirrors: app/models/issue_priority.rb (actually called IssuePriority in Rails)
//! Table: enumerations (with type = 'IssuePriority')

use op_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Work package priority entity
///
/// Priorities define urgency levels (Low, Normal, High, Immediate, etc.)
///
/// # Ruby equivalent
/// ```ruby
/// class IssuePriority < Enumeration
///   has_many :work_packages, foreign_key: 'priority_id'
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub id: Option<Id>,

    /// Priority name (unique)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Sort position (lower = higher priority typically)
    #[serde(default)]
    pub position: i32,

    /// Whether this is the default priority for new work packages
    #[serde(default)]
    pub is_default: bool,

    /// Whether this priority is active (can be selected)
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Priority {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            position: 0,
            is_default: false,
            active: true,
        }
    }
}

impl Identifiable for Priority {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Priority {
    /// Create a new priority
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: persisted priority with id and position
    pub fn with_id(mut self, id: Id, position: i32) -> Self {
        self.id = Some(id);
        self.position = position;
        self
    }
}
