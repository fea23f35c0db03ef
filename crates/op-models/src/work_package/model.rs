//! Work Package model
//!
//! Mirrors: app/models/work_package.rb
//! Table: work_packages
//!
//! Foreign keys and loaded associations are kept side by side, the way
//! ActiveRecord holds `status_id` next to a cached `status`. Writing a foreign
//! key without reloading leaves the stale association unreachable: accessors
//! only hand out an association whose id matches its key.

use chrono::{DateTime, NaiveDate, Utc};
use op_core::traits::{Id, Identifiable, ProjectScoped};
use op_core::OpResult;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::category::Category;
use crate::custom_field::CustomField;
use crate::journal::Journal;
use crate::priority::Priority;
use crate::project::Project;
use crate::relation::Relation;
use crate::status::Status;
use crate::type_def::Type;
use crate::user::model::User;
use crate::version::Version;
use crate::work_package::store::WorkPackageStore;

/// Lightweight reference to another work package (parent, children)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageRef {
    pub id: Id,
    pub subject: String,
}

impl WorkPackageRef {
    pub fn new(id: Id, subject: impl Into<String>) -> Self {
        Self {
            id,
            subject: subject.into(),
        }
    }
}

/// Work Package entity
///
/// # Ruby equivalent
/// ```ruby
/// class WorkPackage < ApplicationRecord
///   belongs_to :project
///   belongs_to :type
///   belongs_to :status
///   belongs_to :author, class_name: 'User'
///   belongs_to :assigned_to, class_name: 'Principal'
///   belongs_to :responsible, class_name: 'Principal'
///   belongs_to :fixed_version, class_name: 'Version'
///   belongs_to :priority, class_name: 'IssuePriority'
///   belongs_to :category
///   acts_as_customizable
///   acts_as_watchable
///   acts_as_journalized
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct WorkPackage {
    pub id: Option<Id>,
    pub subject: String,
    pub description: Option<String>,

    pub project: Project,
    #[serde(rename = "type")]
    pub work_package_type: Type,

    pub status_id: Option<Id>,
    pub status: Option<Status>,
    /// Persisted value of `status_id`
    #[serde(skip)]
    pub status_id_was: Option<Id>,

    pub author_id: Option<Id>,
    pub author: Option<User>,
    pub assigned_to_id: Option<Id>,
    pub assigned_to: Option<User>,
    pub responsible_id: Option<Id>,
    pub responsible: Option<User>,

    pub category_id: Option<Id>,
    pub category: Option<Category>,
    pub priority_id: Option<Id>,
    pub priority: Option<Priority>,
    pub fixed_version_id: Option<Id>,
    pub fixed_version: Option<Version>,

    pub parent_id: Option<Id>,
    pub parent: Option<WorkPackageRef>,
    #[serde(default)]
    pub children: Vec<WorkPackageRef>,

    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub done_ratio: i32,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub spent_hours: f64,

    /// Optimistic locking counter; `None` forces the stale check to fail
    pub lock_version: Option<i32>,

    /// Raw custom values keyed by custom field id
    #[serde(default)]
    pub custom_values: BTreeMap<Id, String>,

    #[serde(default)]
    pub watcher_users: Vec<User>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub journals: Vec<Journal>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Serialize for WorkPackage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WorkPackage::serialize(self, serializer)
    }
}

/// A deserialized work package is a loaded record: its state is the
/// persisted baseline.
impl<'de> Deserialize<'de> for WorkPackage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut work_package = WorkPackage::deserialize(deserializer)?;
        work_package.changes_applied();
        Ok(work_package)
    }
}

impl Identifiable for WorkPackage {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl ProjectScoped for WorkPackage {
    fn project_id(&self) -> Option<Id> {
        self.project.id
    }
}

/// Returns the association only when it matches the foreign key
fn loaded<'a, T: Identifiable>(key: Option<Id>, association: &'a Option<T>) -> Option<&'a T> {
    match (key, association) {
        (Some(id), Some(value)) if value.id() == Some(id) => Some(value),
        _ => None,
    }
}

impl WorkPackage {
    pub fn new(subject: impl Into<String>, project: Project, work_package_type: Type) -> Self {
        Self {
            subject: subject.into(),
            project,
            work_package_type,
            lock_version: Some(0),
            ..Default::default()
        }
    }

    /// Builder: persisted work package
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self.changes_applied();
        self
    }

    pub fn status(&self) -> Option<&Status> {
        loaded(self.status_id, &self.status)
    }

    pub fn set_status(&mut self, status: Status) {
        self.status_id = status.id;
        self.status = Some(status);
    }

    pub fn author(&self) -> Option<&User> {
        loaded(self.author_id, &self.author)
    }

    pub fn set_author(&mut self, user: User) {
        self.author_id = user.id;
        self.author = Some(user);
    }

    pub fn assigned_to(&self) -> Option<&User> {
        loaded(self.assigned_to_id, &self.assigned_to)
    }

    pub fn set_assigned_to(&mut self, user: Option<User>) {
        self.assigned_to_id = user.as_ref().and_then(|u| u.id);
        self.assigned_to = user;
    }

    pub fn responsible(&self) -> Option<&User> {
        loaded(self.responsible_id, &self.responsible)
    }

    pub fn set_responsible(&mut self, user: Option<User>) {
        self.responsible_id = user.as_ref().and_then(|u| u.id);
        self.responsible = user;
    }

    pub fn category(&self) -> Option<&Category> {
        loaded(self.category_id, &self.category)
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category_id = category.as_ref().and_then(|c| c.id);
        self.category = category;
    }

    pub fn priority(&self) -> Option<&Priority> {
        loaded(self.priority_id, &self.priority)
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority_id = priority.id;
        self.priority = Some(priority);
    }

    pub fn fixed_version(&self) -> Option<&Version> {
        loaded(self.fixed_version_id, &self.fixed_version)
    }

    pub fn set_fixed_version(&mut self, version: Option<Version>) {
        self.fixed_version_id = version.as_ref().and_then(|v| v.id);
        self.fixed_version = version;
    }

    pub fn parent(&self) -> Option<&WorkPackageRef> {
        match (self.parent_id, &self.parent) {
            (Some(id), Some(parent)) if parent.id == id => Some(parent),
            _ => None,
        }
    }

    pub fn set_parent(&mut self, parent: Option<WorkPackageRef>) {
        self.parent_id = parent.as_ref().map(|p| p.id);
        self.parent = parent;
    }

    /// True for a persisted work package whose status differs from the stored one
    pub fn status_id_changed(&self) -> bool {
        self.is_persisted() && self.status_id != self.status_id_was
    }

    /// Marks the current state as persisted
    pub fn changes_applied(&mut self) {
        self.status_id_was = self.status_id;
    }

    /// Custom fields enabled for both the project and the type
    pub fn available_custom_fields(&self) -> Vec<CustomField> {
        Self::custom_fields_for(&self.project, &self.work_package_type)
    }

    /// Custom fields a work package of `work_package_type` in `project` carries,
    /// in project order
    pub fn custom_fields_for(project: &Project, work_package_type: &Type) -> Vec<CustomField> {
        project
            .work_package_custom_fields
            .iter()
            .filter(|cf| {
                work_package_type
                    .custom_fields
                    .iter()
                    .any(|other| other.id == cf.id)
            })
            .cloned()
            .collect()
    }

    /// Open versions shared with the project plus the current one
    pub fn assignable_versions(&self) -> Vec<Version> {
        let mut versions: Vec<Version> = self
            .project
            .shared_versions
            .iter()
            .filter(|v| v.open())
            .cloned()
            .collect();

        if let Some(current) = self.fixed_version() {
            versions.push(current.clone());
        }

        versions.sort_by(|a, b| a.cmp_by_date(b));
        let mut seen = Vec::with_capacity(versions.len());
        versions.retain(|v| {
            if seen.contains(&v.id) {
                false
            } else {
                seen.push(v.id);
                true
            }
        });
        versions
    }

    pub fn assignable_priorities(&self, store: &dyn WorkPackageStore) -> OpResult<Vec<Priority>> {
        store.active_priorities()
    }

    pub fn custom_value(&self, custom_field_id: Id) -> Option<&str> {
        self.custom_values.get(&custom_field_id).map(String::as_str)
    }

    /// Sets or clears (with `None` or a blank string) a custom value
    pub fn set_custom_value(&mut self, custom_field_id: Id, value: Option<String>) {
        match value {
            Some(v) if !v.is_empty() => {
                self.custom_values.insert(custom_field_id, v);
            }
            _ => {
                self.custom_values.remove(&custom_field_id);
            }
        }
    }

    pub fn is_watched_by(&self, user_id: Id) -> bool {
        self.watcher_users.iter().any(|u| u.id == Some(user_id))
    }
}
