//! Per-request representer context
//!
//! Everything a representer consults besides the represented object: the
//! current user, an administrative settings snapshot, the path builder and
//! the collaborators reaching into persisted state.

use op_auth::CurrentUser;
use op_core::config::{AppConfig, Settings};
use op_core::traits::{Id, ProjectScoped, UserContext};
use op_core::OpResult;
use op_models::{WorkPackageStore, Workflow};
use std::sync::Arc;
use tracing::trace;

use crate::paths::ApiV3Paths;
use crate::text_renderer::{TextRenderer, TextileRenderer};

#[derive(Clone)]
pub struct RepresenterContext {
    pub current_user: Arc<CurrentUser>,
    pub settings: Arc<Settings>,
    pub paths: ApiV3Paths,
    pub workflow: Arc<dyn Workflow>,
    pub store: Arc<dyn WorkPackageStore>,
    pub text_renderer: Arc<dyn TextRenderer>,
}

impl RepresenterContext {
    pub fn new(
        current_user: Arc<CurrentUser>,
        config: &AppConfig,
        workflow: Arc<dyn Workflow>,
        store: Arc<dyn WorkPackageStore>,
    ) -> Self {
        Self {
            current_user,
            settings: Arc::new(Settings::from_config(config)),
            paths: ApiV3Paths::from_config(config),
            workflow,
            store,
            text_renderer: Arc::new(TextileRenderer),
        }
    }

    /// Replace the settings snapshot
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub fn with_current_user(mut self, current_user: CurrentUser) -> Self {
        self.current_user = Arc::new(current_user);
        self
    }

    pub fn user(&self) -> &dyn UserContext {
        self.current_user.as_ref()
    }

    /// Whether the current user holds `permission` in the project of `model`
    pub fn current_user_allowed_to<M: ProjectScoped>(&self, permission: &str, model: &M) -> bool {
        self.allowed_in(permission, model.project_id())
    }

    pub fn allowed_in(&self, permission: &str, project_id: Option<Id>) -> bool {
        let allowed = project_id.map_or(false, |project_id| {
            self.current_user.allowed_in_project(permission, project_id)
        });
        if !allowed {
            trace!(
                user_id = self.current_user.id,
                permission,
                ?project_id,
                "permission not granted"
            );
        }
        allowed
    }

    /// Whether the current user may see the work package with `id`
    pub fn visible(&self, id: Id) -> OpResult<bool> {
        self.store.visible(id, self.user())
    }
}
