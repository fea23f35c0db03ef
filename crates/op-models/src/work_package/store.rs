//! Read access to persisted work packages
//!
//! The representers never talk to a database directly. Whatever they need
//! from persisted state (the stored copy of a work package, visibility of a
//! related one, the active priorities) goes through `WorkPackageStore`.

use op_core::traits::{Id, UserContext};
use op_core::{OpError, OpResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

use super::model::WorkPackage;
use crate::priority::Priority;

const VIEW_WORK_PACKAGES: &str = "view_work_packages";

/// Persisted work package lookups
pub trait WorkPackageStore: Send + Sync {
    /// The persisted copy of a work package, ignoring unsaved local changes
    fn find(&self, id: Id) -> OpResult<WorkPackage>;

    /// Whether `user` may see the work package (unknown ids are invisible)
    fn visible(&self, id: Id, user: &dyn UserContext) -> OpResult<bool>;

    /// Active priorities ordered by position
    fn active_priorities(&self) -> OpResult<Vec<Priority>>;
}

/// In-memory store, used by tests and by embedders without a database
#[derive(Default)]
pub struct InMemoryWorkPackageStore {
    work_packages: RwLock<HashMap<Id, WorkPackage>>,
    priorities: RwLock<Vec<Priority>>,
}

impl InMemoryWorkPackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a persisted work package, marking its current state as saved
    pub fn insert(&self, mut work_package: WorkPackage) -> OpResult<()> {
        let id = work_package
            .id
            .ok_or_else(|| OpError::argument("cannot store a work package without id"))?;
        work_package.changes_applied();
        self.work_packages.write().insert(id, work_package);
        Ok(())
    }

    pub fn add_priority(&self, priority: Priority) {
        let mut priorities = self.priorities.write();
        priorities.push(priority);
        priorities.sort_by_key(|p| p.position);
    }
}

impl WorkPackageStore for InMemoryWorkPackageStore {
    fn find(&self, id: Id) -> OpResult<WorkPackage> {
        trace!(work_package_id = id, "loading persisted work package");
        self.work_packages
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| OpError::not_found("WorkPackage", id))
    }

    fn visible(&self, id: Id, user: &dyn UserContext) -> OpResult<bool> {
        let work_packages = self.work_packages.read();
        let visible = work_packages
            .get(&id)
            .and_then(|wp| wp.project.id)
            .map_or(false, |project_id| {
                user.allowed_in_project(VIEW_WORK_PACKAGES, project_id)
            });
        Ok(visible)
    }

    fn active_priorities(&self) -> OpResult<Vec<Priority>> {
        Ok(self
            .priorities
            .read()
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect())
    }
}
