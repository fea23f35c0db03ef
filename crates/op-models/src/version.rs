//! Version model
//!
//! Mirrors: app/models/version.rb
//! Table: versions

use chrono::{DateTime, NaiveDate, Utc};
use op_core::traits::{Id, Identifiable, ProjectScoped};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::Validate;

use crate::project::Project;

/// Version sharing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionSharing {
    /// Version is only visible in its own project
    #[default]
    None,
    /// Version is visible in all subprojects
    Descendants,
    /// Version is visible in parent projects and siblings
    Hierarchy,
    /// Version is visible in all projects within the tree
    Tree,
    /// Version is visible in all projects
    System,
}

impl VersionSharing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Descendants => "descendants",
            Self::Hierarchy => "hierarchy",
            Self::Tree => "tree",
            Self::System => "system",
        }
    }
}

/// Version status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    #[default]
    Open,
    Locked,
    Closed,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Locked => "locked",
            Self::Closed => "closed",
        }
    }
}

/// Version entity
///
/// Versions represent releases/milestones that work packages can target.
///
/// # Ruby equivalent
/// ```ruby
/// class Version < ApplicationRecord
///   belongs_to :project
///   has_many :work_packages
///   validates :name, presence: true
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: Option<Id>,

    /// Version name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Owning project
    pub project_id: Id,

    /// Name of the owning project, loaded alongside shared versions
    pub project_name: Option<String>,

    /// Target completion date
    pub effective_date: Option<NaiveDate>,

    /// Start date
    pub start_date: Option<NaiveDate>,

    /// Version status
    #[serde(default)]
    pub status: VersionStatus,

    /// Sharing scope
    #[serde(default)]
    pub sharing: VersionSharing,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            project_id: 0,
            project_name: None,
            effective_date: None,
            start_date: None,
            status: VersionStatus::Open,
            sharing: VersionSharing::None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for Version {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl ProjectScoped for Version {
    fn project_id(&self) -> Option<Id> {
        Some(self.project_id)
    }
}

impl Version {
    /// Create a new version
    pub fn new(name: impl Into<String>, project_id: Id) -> Self {
        Self {
            name: name.into(),
            project_id,
            ..Default::default()
        }
    }

    /// Builder: persisted version
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Check if version is open
    pub fn open(&self) -> bool {
        matches!(self.status, VersionStatus::Open)
    }

    /// Check if version is closed
    pub fn closed(&self) -> bool {
        matches!(self.status, VersionStatus::Closed)
    }

    /// Name as shown inside `project`: prefixed with the owning project's
    /// name when the version is shared from elsewhere
    pub fn to_s_for_project(&self, project: &Project) -> String {
        match (&self.project_name, project.id) {
            (Some(owner), Some(id)) if id != self.project_id => {
                format!("{} - {}", owner, self.name)
            }
            _ => self.name.clone(),
        }
    }

    /// Versions sort by effective date (undated last), then by name
    pub fn cmp_by_date(&self, other: &Version) -> Ordering {
        match (self.effective_date, other.effective_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
    }
}
