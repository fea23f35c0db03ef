//! # op-models
//!
//! Domain models for OpenProject RS.
//!
//! This crate contains the entity structs the API layer consumes, together
//! with the collaborator traits (`WorkPackageStore`, `Workflow`) through which
//! it reaches persisted state.

pub use op_core::traits::{Id, Identifiable, ProjectScoped};

// Core domain modules
pub mod category;
pub mod custom_field;
pub mod journal;
pub mod priority;
pub mod project;
pub mod relation;
pub mod status;
pub mod type_def;
pub mod user;
pub mod version;
pub mod work_package;
pub mod workflow;

// Re-exports for convenience
pub use category::Category;
pub use custom_field::{CustomField, CustomFieldFormat};
pub use journal::{Journal, JournalDetail, JournalVersion};
pub use priority::Priority;
pub use project::Project;
pub use relation::{Relation, RelationType};
pub use status::Status;
pub use type_def::Type;
pub use user::model::User;
pub use version::{Version, VersionSharing, VersionStatus};
pub use work_package::model::{WorkPackage, WorkPackageRef};
pub use work_package::store::{InMemoryWorkPackageStore, WorkPackageStore};
pub use workflow::{Workflow, WorkflowTable};
