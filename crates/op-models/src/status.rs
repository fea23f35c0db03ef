//! Status model
//!
//! Mirrors: app/models/status.rb
//! Table: statuses

use chrono::{DateTime, Utc};
use op_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Work package status entity
///
/// Statuses represent the lifecycle state of work packages (New, In Progress, Closed, etc.).
/// Which status a work package may move to next is decided by the workflow.
///
/// # Ruby equivalent
/// ```ruby
/// class Status < ApplicationRecord
///   has_many :work_packages
///   has_many :workflows
///   validates :name, presence: true, uniqueness: true
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: Option<Id>,

    /// Status name (unique)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Whether this status means "closed/done"
    #[serde(default)]
    pub is_closed: bool,

    /// Whether this status is the default for new work packages
    #[serde(default)]
    pub is_default: bool,

    /// Whether this status is read-only (prevents further edits)
    #[serde(default)]
    pub is_readonly: bool,

    /// Sort position
    #[serde(default)]
    pub position: i32,

    /// Default done ratio for this status (0-100)
    pub default_done_ratio: Option<i32>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            is_closed: false,
            is_default: false,
            is_readonly: false,
            position: 0,
            default_done_ratio: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for Status {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Status {
    /// Create a new status
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: persisted status with id and position
    pub fn with_id(mut self, id: Id, position: i32) -> Self {
        self.id = Some(id);
        self.position = position;
        self
    }
}
