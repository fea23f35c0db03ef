//! Work package schema model
//!
//! Describes what a work package may be set to. Built either from a concrete
//! work package (edit form) or from a project and type alone (new work
//! package form). Only the former can compute allowed values, since those
//! depend on the instance: its current status, its project, whether it is
//! persisted.

use op_core::traits::{Id, Identifiable, ProjectScoped, UserContext};
use op_core::{OpError, OpResult};
use op_models::{CustomField, Priority, Project, Status, Type, Version, WorkPackage, WorkPackageStore, Workflow};
use tracing::debug;

use crate::representers::schema::DefinesAssignableValues;

#[derive(Debug, Clone)]
pub struct WorkPackageSchema {
    project: Project,
    work_package_type: Type,
    work_package: Option<WorkPackage>,
}

impl WorkPackageSchema {
    /// Either `work_package` or both `project` and `work_package_type` must
    /// be given. Project and type default to the work package's own.
    pub fn new(
        work_package: Option<WorkPackage>,
        project: Option<Project>,
        work_package_type: Option<Type>,
    ) -> OpResult<Self> {
        let (project, work_package_type) = match (&work_package, project, work_package_type) {
            (_, Some(project), Some(work_package_type)) => (project, work_package_type),
            (Some(wp), project, work_package_type) => (
                project.unwrap_or_else(|| wp.project.clone()),
                work_package_type.unwrap_or_else(|| wp.work_package_type.clone()),
            ),
            (None, _, _) => {
                return Err(OpError::argument(
                    "a schema needs either a work package or a project and a type",
                ))
            }
        };

        Ok(Self {
            project,
            work_package_type,
            work_package,
        })
    }

    pub fn for_work_package(work_package: WorkPackage) -> Self {
        Self {
            project: work_package.project.clone(),
            work_package_type: work_package.work_package_type.clone(),
            work_package: Some(work_package),
        }
    }

    pub fn for_project_and_type(project: Project, work_package_type: Type) -> Self {
        Self {
            project,
            work_package_type,
            work_package: None,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn work_package_type(&self) -> &Type {
        &self.work_package_type
    }

    pub fn work_package(&self) -> Option<&WorkPackage> {
        self.work_package.as_ref()
    }

    /// True iff built from a concrete work package
    pub fn defines_assignable_values(&self) -> bool {
        self.work_package.is_some()
    }

    /// Statuses `user` may move the work package to. A persisted work package
    /// with an unsaved status change is evaluated from its stored status so
    /// a single save cannot skip workflow steps.
    pub fn assignable_statuses_for(
        &self,
        user: &dyn UserContext,
        workflow: &dyn Workflow,
        store: &dyn WorkPackageStore,
    ) -> OpResult<Option<Vec<Status>>> {
        let Some(work_package) = &self.work_package else {
            return Ok(None);
        };

        let statuses = match work_package.id {
            Some(id) if work_package.status_id_changed() => {
                debug!(
                    work_package_id = id,
                    status_id = ?work_package.status_id,
                    status_id_was = ?work_package.status_id_was,
                    "status changed locally, using persisted work package for workflow"
                );
                let persisted = store.find(id)?;
                workflow.new_statuses_allowed_to(&persisted, user)?
            }
            _ => workflow.new_statuses_allowed_to(work_package, user)?,
        };
        Ok(Some(statuses))
    }

    pub fn assignable_versions(&self) -> Option<Vec<Version>> {
        self.work_package.as_ref().map(WorkPackage::assignable_versions)
    }

    pub fn assignable_priorities(&self, store: &dyn WorkPackageStore) -> OpResult<Option<Vec<Priority>>> {
        self.work_package
            .as_ref()
            .map(|wp| wp.assignable_priorities(store))
            .transpose()
    }

    /// Custom fields enabled for both the schema's project and its type
    pub fn available_custom_fields(&self) -> Vec<CustomField> {
        WorkPackage::custom_fields_for(&self.project, &self.work_package_type)
    }
}

impl DefinesAssignableValues for WorkPackageSchema {
    fn defines_assignable_values(&self) -> bool {
        WorkPackageSchema::defines_assignable_values(self)
    }
}

impl ProjectScoped for WorkPackageSchema {
    fn project_id(&self) -> Option<Id> {
        self.project.id
    }
}

impl Identifiable for WorkPackageSchema {
    fn id(&self) -> Option<Id> {
        self.work_package.as_ref().and_then(|wp| wp.id)
    }
}
