//! Workflow model
//!
//! Mirrors: app/models/workflow.rb
//! Table: workflows
//!
//! A workflow lists, per type, which status a work package may move to from
//! its current one.

use op_core::traits::{Id, ProjectScoped, UserContext};
use op_core::OpResult;
use std::collections::HashMap;
use tracing::debug;

use crate::status::Status;
use crate::work_package::model::WorkPackage;

const EDIT_WORK_PACKAGES: &str = "edit_work_packages";

/// Status transitions available to a user
pub trait Workflow: Send + Sync {
    /// Statuses `user` may set on `work_package`, starting from its current
    /// `status_id`. The current status is part of the result.
    fn new_statuses_allowed_to(
        &self,
        work_package: &WorkPackage,
        user: &dyn UserContext,
    ) -> OpResult<Vec<Status>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TransitionKey {
    type_id: Id,
    old_status_id: Id,
}

/// Workflow held in memory as (type, old status) -> new statuses
#[derive(Debug, Default, Clone)]
pub struct WorkflowTable {
    statuses: HashMap<Id, Status>,
    transitions: HashMap<TransitionKey, Vec<Id>>,
}

impl WorkflowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a status; statuses without id are ignored
    pub fn add_status(&mut self, status: Status) -> &mut Self {
        if let Some(id) = status.id {
            self.statuses.insert(id, status);
        }
        self
    }

    /// Allows moving work packages of `type_id` from `old_status_id` to `new_status_id`
    pub fn allow(&mut self, type_id: Id, old_status_id: Id, new_status_id: Id) -> &mut Self {
        let targets = self
            .transitions
            .entry(TransitionKey {
                type_id,
                old_status_id,
            })
            .or_default();
        if !targets.contains(&new_status_id) {
            targets.push(new_status_id);
        }
        self
    }
}

impl Workflow for WorkflowTable {
    fn new_statuses_allowed_to(
        &self,
        work_package: &WorkPackage,
        user: &dyn UserContext,
    ) -> OpResult<Vec<Status>> {
        let Some(current_id) = work_package.status_id else {
            return Ok(Vec::new());
        };

        let mut ids = vec![current_id];

        let may_edit = work_package
            .project_id()
            .map_or(false, |project_id| user.allowed_in_project(EDIT_WORK_PACKAGES, project_id));

        if may_edit {
            if let Some(type_id) = work_package.work_package_type.id {
                let key = TransitionKey {
                    type_id,
                    old_status_id: current_id,
                };
                if let Some(targets) = self.transitions.get(&key) {
                    ids.extend(targets.iter().copied());
                }
            }
        } else {
            debug!(
                user_id = user.user_id(),
                "user may not edit work packages, only the current status is allowed"
            );
        }

        let mut statuses: Vec<Status> = ids
            .into_iter()
            .filter_map(|id| self.statuses.get(&id).cloned())
            .collect();
        statuses.sort_by_key(|s| (s.position, s.id));
        statuses.dedup_by_key(|s| s.id);
        Ok(statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use crate::type_def::Type;

    struct Editor {
        may_edit: bool,
    }

    impl UserContext for Editor {
        fn user_id(&self) -> Id {
            3
        }
        fn is_admin(&self) -> bool {
            false
        }
        fn is_anonymous(&self) -> bool {
            false
        }
        fn allowed_in_project(&self, permission: &str, _project_id: Id) -> bool {
            self.may_edit && permission == EDIT_WORK_PACKAGES
        }
        fn allowed_globally(&self, _permission: &str) -> bool {
            false
        }
    }

    fn table() -> WorkflowTable {
        let mut table = WorkflowTable::new();
        table
            .add_status(Status::new("New").with_id(1, 1))
            .add_status(Status::new("In progress").with_id(2, 2))
            .add_status(Status::new("Closed").with_id(3, 3))
            .allow(1, 1, 3)
            .allow(1, 1, 2)
            .allow(1, 2, 3)
            .allow(1, 1, 1);
        table
    }

    fn work_package(status_id: Option<Id>) -> WorkPackage {
        let mut wp = WorkPackage::new(
            "Flow",
            Project::new("p", "P").with_id(1),
            Type::new("Task").with_id(1),
        );
        wp.status_id = status_id;
        wp
    }

    fn names(statuses: Vec<Status>) -> Vec<String> {
        statuses.into_iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_transitions_sorted_and_unique() {
        let allowed = table()
            .new_statuses_allowed_to(&work_package(Some(1)), &Editor { may_edit: true })
            .unwrap();
        assert_eq!(names(allowed), vec!["New", "In progress", "Closed"]);
    }

    #[test]
    fn test_origin_status_decides() {
        let allowed = table()
            .new_statuses_allowed_to(&work_package(Some(2)), &Editor { may_edit: true })
            .unwrap();
        assert_eq!(names(allowed), vec!["In progress", "Closed"]);
    }

    #[test]
    fn test_without_edit_permission_only_current() {
        let allowed = table()
            .new_statuses_allowed_to(&work_package(Some(1)), &Editor { may_edit: false })
            .unwrap();
        assert_eq!(names(allowed), vec!["New"]);
    }

    #[test]
    fn test_no_status_allows_nothing() {
        let allowed = table()
            .new_statuses_allowed_to(&work_package(None), &Editor { may_edit: true })
            .unwrap();
        assert!(allowed.is_empty());
    }
}
