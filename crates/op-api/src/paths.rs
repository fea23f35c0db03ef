//! API v3 path builder
//!
//! Every href rendered by the representers comes from here, prefixed with
//! the relative URL root the application is mounted under.

use op_core::config::AppConfig;
use op_core::traits::Id;
use op_core::{OpError, OpResult};
use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiV3Paths {
    root: String,
}

impl ApiV3Paths {
    /// `root` is the relative URL root, e.g. `/openproject` (empty for none)
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config
                .server
                .rails_relative_url_root
                .clone()
                .unwrap_or_default(),
        )
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.root, path)
    }

    pub fn work_package(&self, id: Id) -> String {
        self.api(&format!("work_packages/{}", id))
    }

    pub fn work_package_form(&self, id: Id) -> String {
        self.api(&format!("work_packages/{}/form", id))
    }

    pub fn work_package_watchers(&self, id: Id) -> String {
        self.api(&format!("work_packages/{}/watchers", id))
    }

    pub fn available_watchers(&self, id: Id) -> String {
        self.api(&format!("work_packages/{}/available_watchers", id))
    }

    pub fn work_package_relations(&self, id: Id) -> String {
        self.api(&format!("work_packages/{}/relations", id))
    }

    pub fn work_package_relation(&self, work_package_id: Id, relation_id: Id) -> String {
        self.api(&format!(
            "work_packages/{}/relations/{}",
            work_package_id, relation_id
        ))
    }

    pub fn work_package_activities(&self, id: Id) -> String {
        self.api(&format!("work_packages/{}/activities", id))
    }

    pub fn schema(&self, project_id: Id, type_id: Id) -> String {
        self.api(&format!("work_packages/schemas/{}-{}", project_id, type_id))
    }

    pub fn available_assignees(&self, project_id: Id) -> String {
        self.api(&format!("projects/{}/available_assignees", project_id))
    }

    pub fn available_responsibles(&self, project_id: Id) -> String {
        self.api(&format!("projects/{}/available_responsibles", project_id))
    }

    pub fn activity(&self, id: Id) -> String {
        self.api(&format!("activities/{}", id))
    }

    pub fn category(&self, id: Id) -> String {
        self.api(&format!("categories/{}", id))
    }

    pub fn priority(&self, id: Id) -> String {
        self.api(&format!("priorities/{}", id))
    }

    pub fn project(&self, id: Id) -> String {
        self.api(&format!("projects/{}", id))
    }

    pub fn status(&self, id: Id) -> String {
        self.api(&format!("statuses/{}", id))
    }

    pub fn user(&self, id: Id) -> String {
        self.api(&format!("users/{}", id))
    }

    pub fn version(&self, id: Id) -> String {
        self.api(&format!("versions/{}", id))
    }

    pub fn string_object(&self, value: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
        self.api(&format!("string_objects?value={}", encoded))
    }

    // HTML (non API) paths

    pub fn work_packages_bulk_delete(&self, id: Id) -> String {
        format!("{}/work_packages/bulk?ids={}", self.root, id)
    }

    pub fn new_work_package_time_entry(&self, id: Id) -> String {
        format!("{}/work_packages/{}/time_entries/new", self.root, id)
    }

    pub fn work_package_time_entries(&self, id: Id) -> String {
        format!("{}/work_packages/{}/time_entries", self.root, id)
    }

    pub fn new_work_package_move(&self, id: Id) -> String {
        format!("{}/work_packages/{}/move/new", self.root, id)
    }

    pub fn new_project_work_package_copy(&self, project_identifier: &str, copy_from: Id) -> String {
        format!(
            "{}/projects/{}/work_packages/new?copy_from={}",
            self.root, project_identifier, copy_from
        )
    }

    pub fn new_project_work_package_child(&self, project_identifier: &str, parent_id: Id) -> String {
        format!(
            "{}/projects/{}/work_packages/new?work_package%5Bparent_id%5D={}",
            self.root, project_identifier, parent_id
        )
    }

    /// Id referenced by an API href of the given resource collection,
    /// e.g. `statuses` for `/api/v3/statuses/3`
    pub fn parse_id(&self, collection: &str, property: &str, href: &str) -> OpResult<Id> {
        let prefix = self.api(&format!("{}/", collection));
        href.strip_prefix(&prefix)
            .and_then(|rest| rest.parse::<Id>().ok())
            .ok_or_else(|| OpError::invalid_format(property, format!("{}{{id}}", prefix), href))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_without_root() {
        let paths = ApiV3Paths::default();
        assert_eq!(paths.work_package(4), "/api/v3/work_packages/4");
        assert_eq!(paths.schema(1, 2), "/api/v3/work_packages/schemas/1-2");
        assert_eq!(paths.work_packages_bulk_delete(42), "/work_packages/bulk?ids=42");
    }

    #[test]
    fn test_paths_with_root() {
        let paths = ApiV3Paths::new("/openproject/");
        assert_eq!(
            paths.available_assignees(3),
            "/openproject/api/v3/projects/3/available_assignees"
        );
        assert_eq!(
            paths.new_work_package_move(5),
            "/openproject/work_packages/5/move/new"
        );
        assert_eq!(
            paths.work_packages_bulk_delete(5),
            "/openproject/work_packages/bulk?ids=5"
        );
    }

    #[test]
    fn test_parse_id() {
        let paths = ApiV3Paths::new("/op");
        assert_eq!(
            paths.parse_id("statuses", "status", "/op/api/v3/statuses/12").unwrap(),
            12
        );
        assert!(matches!(
            paths.parse_id("statuses", "status", "/op/api/v3/users/12"),
            Err(OpError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_string_object_encoding() {
        let paths = ApiV3Paths::default();
        let href = paths.string_object("A & B");
        assert_eq!(href, "/api/v3/string_objects?value=A+%26+B");
    }
}
