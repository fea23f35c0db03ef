//! User HAL Representer
//!
//! Converts user models to HAL+JSON format compatible with OpenProject API v3.

use op_auth::builtin;
use op_core::traits::Id;
use op_core::OpResult;
use op_models::{User, WorkPackage};
use serde::Serialize;
use serde_json::Value;

use super::hal::{rels, HalLink, HalLinks, HalResource};
use crate::context::RepresenterContext;
use crate::date_time_formatter::DateTimeFormatter;

const AVATAR_SIZE: u32 = 40;

/// User representation for API responses
#[derive(Debug, Clone, Serialize)]
pub struct UserRepresentation {
    pub id: Option<Id>,
    pub login: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub avatar: String,
    pub status: &'static str,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// User representer
pub struct UserRepresenter;

impl UserRepresenter {
    /// Create a HAL resource for a single user
    pub fn represent(user: &User, context: &RepresenterContext) -> OpResult<HalResource<UserRepresentation>> {
        let name = user.name_in(context.settings.user_format());
        let current = &context.current_user;
        let can_view_email = current.is_admin() || (!current.is_anonymous() && user.id == Some(current.id()));

        let rep = UserRepresentation {
            id: user.id,
            login: user.login.clone(),
            first_name: user.firstname.clone(),
            last_name: user.lastname.clone(),
            email: can_view_email.then(|| user.mail.clone()),
            avatar: Self::gravatar_url(&user.mail, AVATAR_SIZE),
            status: user.status.as_str(),
            created_at: DateTimeFormatter::format_datetime(user.created_at, true)?,
            updated_at: DateTimeFormatter::format_datetime(user.updated_at, true)?,
            name,
        };

        let mut links = HalLinks::new();
        if let Some(id) = user.id {
            links.add(rels::SELF, HalLink::with_title(context.paths.user(id), &rep.name));
        }

        Ok(HalResource::new("User", rep).with_links(links))
    }

    pub fn to_value(user: &User, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(user, context)?.to_value()
    }

    /// A user listed as watcher of `work_package`; carries `removeWatcher`
    /// when the current user may remove watchers there
    pub fn represent_watcher(
        user: &User,
        work_package: &WorkPackage,
        context: &RepresenterContext,
    ) -> OpResult<HalResource<UserRepresentation>> {
        let mut hal = Self::represent(user, context)?;

        let allowed =
            context.current_user_allowed_to(builtin::DELETE_WORK_PACKAGE_WATCHERS.name, work_package);
        if let (true, Some(work_package_id), Some(user_id)) = (allowed, work_package.id, user.id) {
            hal.links.add(
                rels::REMOVE_WATCHER,
                HalLink::new(format!(
                    "{}/{}",
                    context.paths.work_package_watchers(work_package_id),
                    user_id
                ))
                .method("delete"),
            );
        }
        Ok(hal)
    }

    /// `{href, title}` pointing at a user
    pub fn link(user: &User, context: &RepresenterContext) -> HalLink {
        match user.id {
            Some(id) => HalLink::with_title(context.paths.user(id), user.name_in(context.settings.user_format())),
            None => HalLink::empty(),
        }
    }

    /// Generate gravatar URL from email
    fn gravatar_url(email: &str, size: u32) -> String {
        let hash = md5::compute(email.trim().to_lowercase().as_bytes());
        format!(
            "https://secure.gravatar.com/avatar/{:x}?default=404&secure=true&size={}",
            hash, size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin, assignee, context, context_with_user, member, work_package};
    use op_core::config::{keys, SettingValue};

    #[test]
    fn test_user_representation() {
        let json = UserRepresenter::to_value(&assignee(), &context()).unwrap();
        assert_eq!(json["_type"], "User");
        assert_eq!(json["id"], 3);
        assert_eq!(json["login"], "asmith");
        assert_eq!(json["firstName"], "Anna");
        assert_eq!(json["lastName"], "Smith");
        assert_eq!(json["name"], "Anna Smith");
        assert_eq!(json["status"], "active");
        assert_eq!(json["_links"]["self"]["href"], "/api/v3/users/3");
    }

    #[test]
    fn test_email_hidden_from_other_users() {
        let json = UserRepresenter::to_value(&assignee(), &context()).unwrap();
        assert!(json.get("email").is_none());

        let json = UserRepresenter::to_value(&assignee(), &context_with_user(admin())).unwrap();
        assert_eq!(json["email"], "asmith@example.net");
    }

    #[test]
    fn test_name_follows_user_format() {
        let mut settings = op_core::config::Settings::default();
        settings.set(keys::USER_FORMAT, SettingValue::String("lastname_coma_firstname".into()));
        let ctx = context().with_settings(settings);

        let json = UserRepresenter::to_value(&assignee(), &ctx).unwrap();
        assert_eq!(json["name"], "Smith, Anna");
    }

    #[test]
    fn test_gravatar_url() {
        let url = UserRepresenter::gravatar_url(" Someone@Example.com ", 40);
        assert_eq!(
            url,
            "https://secure.gravatar.com/avatar/16d113840f999444259f73bac9ab8b10?default=404&secure=true&size=40"
        );
    }

    #[test]
    fn test_watcher_remove_link_needs_permission() {
        let wp = work_package();

        let plain = UserRepresenter::represent_watcher(&assignee(), &wp, &context())
            .unwrap()
            .to_value()
            .unwrap();
        assert!(plain["_links"].get("removeWatcher").is_none());

        let ctx = context_with_user(member(&[builtin::DELETE_WORK_PACKAGE_WATCHERS.name]));
        let json = UserRepresenter::represent_watcher(&assignee(), &wp, &ctx)
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(
            json["_links"]["removeWatcher"]["href"],
            "/api/v3/work_packages/42/watchers/3"
        );
        assert_eq!(json["_links"]["removeWatcher"]["method"], "delete");
    }
}
