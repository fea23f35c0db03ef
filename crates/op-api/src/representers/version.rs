//! Version HAL Representer

use op_core::traits::Id;
use op_core::types::Formattable;
use op_core::OpResult;
use op_models::Version;
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalLinks, HalResource};
use crate::context::RepresenterContext;
use crate::date_time_formatter::DateTimeFormatter;

#[derive(Debug, Clone, Serialize)]
pub struct VersionRepresentation {
    pub id: Option<Id>,
    pub name: String,
    pub description: Formattable,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub status: &'static str,
    pub sharing: &'static str,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

pub struct VersionRepresenter;

impl VersionRepresenter {
    pub fn represent(version: &Version, context: &RepresenterContext) -> OpResult<HalResource<VersionRepresentation>> {
        let description = context
            .text_renderer
            .formattable(context.settings.text_formatting(), version.description.as_deref());

        let rep = VersionRepresentation {
            id: version.id,
            name: version.name.clone(),
            description,
            start_date: DateTimeFormatter::format_date(version.start_date, true)?,
            end_date: DateTimeFormatter::format_date(version.effective_date, true)?,
            status: version.status.as_str(),
            sharing: version.sharing.as_str(),
            created_at: DateTimeFormatter::format_datetime(version.created_at, true)?,
            updated_at: DateTimeFormatter::format_datetime(version.updated_at, true)?,
        };

        let paths = &context.paths;
        let mut defining_project = HalLink::new(paths.project(version.project_id));
        if let Some(project_name) = &version.project_name {
            defining_project = defining_project.title(project_name);
        }
        let mut links = HalLinks::new().with("definingProject", defining_project);
        if let Some(id) = version.id {
            links.add("self", Self::link(id, &version.name, context));
        }

        Ok(HalResource::new("Version", rep).with_links(links))
    }

    pub fn to_value(version: &Version, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(version, context)?.to_value()
    }

    pub fn link(id: Id, title: &str, context: &RepresenterContext) -> HalLink {
        HalLink::with_title(context.paths.version(id), title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use chrono::NaiveDate;

    #[test]
    fn test_version_representation() {
        let mut version = Version::new("1.0", 2).with_id(9);
        version.project_name = Some("Platform".to_string());
        version.effective_date = NaiveDate::from_ymd_opt(2015, 6, 30);

        let json = VersionRepresenter::to_value(&version, &context()).unwrap();
        assert_eq!(json["_type"], "Version");
        assert_eq!(json["endDate"], "2015-06-30");
        assert!(json["startDate"].is_null());
        assert_eq!(json["status"], "open");
        assert_eq!(json["_links"]["self"]["href"], "/api/v3/versions/9");
        assert_eq!(json["_links"]["definingProject"]["title"], "Platform");
    }
}
