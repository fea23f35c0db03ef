//! Project model
//!
//! Mirrors: app/models/project.rb
//! Table: projects

use chrono::{DateTime, Utc};
use op_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::custom_field::CustomField;
use crate::version::Version;

/// Project entity
///
/// Only the parts of a project the work package API needs: its identity, the
/// work package custom fields enabled for it and the versions shared with it.
///
/// # Ruby equivalent
/// ```ruby
/// class Project < ApplicationRecord
///   has_and_belongs_to_many :work_package_custom_fields
///   has_many :versions
///   def shared_versions; end
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    /// Unique identifier (URL-safe slug)
    #[validate(length(min = 1, max = 100))]
    pub identifier: String,

    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Whether the project is public (visible to non-members)
    #[serde(default)]
    pub public: bool,

    /// Parent project ID (for hierarchy)
    pub parent_id: Option<Id>,

    /// Whether the project is active (not archived)
    #[serde(default = "default_true")]
    pub active: bool,

    /// Work package custom fields enabled for this project
    /// (`all_work_package_custom_fields`, including those marked for all projects)
    #[serde(default)]
    pub work_package_custom_fields: Vec<CustomField>,

    /// Versions usable by this project, its own and shared ones
    #[serde(default)]
    pub shared_versions: Vec<Version>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: None,
            identifier: String::new(),
            name: String::new(),
            public: false,
            parent_id: None,
            active: true,
            work_package_custom_fields: Vec::new(),
            shared_versions: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Project {
    /// Create a new project with minimal required fields
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: persisted project
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Check if project is archived
    pub fn archived(&self) -> bool {
        !self.active
    }

    /// Primary key, 0 for unsaved projects
    pub fn id_or_zero(&self) -> Id {
        self.id.unwrap_or(0)
    }
}
