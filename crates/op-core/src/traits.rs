//! Core traits that mirror OpenProject's Ruby patterns
//!
//! These traits provide the foundational interfaces shared by models and representers.

/// Primary key type (mirrors Rails' ID)
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Option<Id>;
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for entities that belong to a project
pub trait ProjectScoped {
    fn project_id(&self) -> Option<Id>;
}

/// User context for permission checks
pub trait UserContext: Send + Sync {
    fn user_id(&self) -> Id;
    fn is_admin(&self) -> bool;
    fn is_anonymous(&self) -> bool;
    fn is_logged_in(&self) -> bool {
        !self.is_anonymous()
    }
    /// Check if user has permission in a project
    fn allowed_in_project(&self, permission: &str, project_id: Id) -> bool;
    /// Check if user has global permission
    fn allowed_globally(&self, permission: &str) -> bool;
}
