//! Category model
//!
//! Mirrors: app/models/category.rb
//! Table: categories

use op_core::traits::{Id, Identifiable, ProjectScoped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Work package category, scoped to a project
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub project_id: Id,

    /// Default assignee for work packages in this category
    pub assigned_to_id: Option<Id>,
}

impl Identifiable for Category {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl ProjectScoped for Category {
    fn project_id(&self) -> Option<Id> {
        Some(self.project_id)
    }
}

impl Category {
    pub fn new(name: impl Into<String>, project_id: Id) -> Self {
        Self {
            name: name.into(),
            project_id,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }
}
