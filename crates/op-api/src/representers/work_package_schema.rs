//! Work Package Schema Representer
//!
//! Renders a `WorkPackageSchema` as a schema document: one property schema
//! per attribute (`{type, name, required, writable, ...}`), with the allowed
//! values of link valued attributes where the schema can compute them.

use op_core::i18n::t;
use op_core::OpResult;
use serde_json::Value;
use std::sync::Arc;

use super::custom_field_injector::CustomFieldInjector;
use super::hal::{rels, to_value};
use super::links::{LinkDescriptor, LinkTable};
use super::priority::PriorityRepresenter;
use super::property::PropertyList;
use super::schema::{allowed_values_of, AllowedValue, SchemaDefinition, SchemaOptions};
use super::status::StatusRepresenter;
use super::version::VersionRepresenter;
use crate::context::RepresenterContext;
use crate::work_package_schema::WorkPackageSchema;

pub const I18N_PREFIX: &str = "activerecord.attributes.work_package";

pub struct WorkPackageSchemaRepresenter<'a> {
    schema: &'a WorkPackageSchema,
    context: &'a RepresenterContext,
    properties: PropertyList<WorkPackageSchema>,
    links: LinkTable<WorkPackageSchema>,
}

impl<'a> WorkPackageSchemaRepresenter<'a> {
    pub fn new(schema: &'a WorkPackageSchema, context: &'a RepresenterContext) -> OpResult<Self> {
        let mut definition = base_definition()?;
        for custom_field in schema.available_custom_fields() {
            CustomFieldInjector::inject_schema(&mut definition, &custom_field)?;
        }

        let links = LinkTable::new().with(LinkDescriptor::new(
            rels::SELF,
            |schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                Ok(Some(ctx.paths.schema(
                    schema.project().id_or_zero(),
                    schema.work_package_type().id_or_zero(),
                )))
            },
        ));

        Ok(Self {
            schema,
            context,
            properties: definition.into_properties(),
            links,
        })
    }

    pub fn properties(&self) -> &PropertyList<WorkPackageSchema> {
        &self.properties
    }

    pub fn to_value(&self) -> OpResult<Value> {
        let mut document = self.properties.render(self.schema, self.context)?;
        let links = self.links.render(self.schema, self.context)?;
        document.insert("_links".to_string(), to_value(&links)?);
        Ok(Value::Object(document))
    }
}

fn base_definition() -> OpResult<SchemaDefinition<WorkPackageSchema>> {
    let mut definition = SchemaDefinition::new(I18N_PREFIX);

    definition
        .schema(
            "_type",
            SchemaOptions::typed("MetaType")
                .title(t("api_v3.attributes._type"))
                .read_only(),
        )?
        .schema(
            "lock_version",
            SchemaOptions::typed("Integer")
                .title(t("api_v3.attributes.lock_version"))
                .read_only(),
        )?
        .schema("id", SchemaOptions::typed("Integer").read_only())?
        .schema(
            "subject",
            SchemaOptions::typed("String").min_length(1).max_length(255),
        )?
        .schema("description", SchemaOptions::typed("Formattable"))?
        .schema("start_date", SchemaOptions::typed("Date").optional())?
        .schema("due_date", SchemaOptions::typed("Date").optional())?
        .schema(
            "estimated_time",
            SchemaOptions::typed("Duration").optional().read_only(),
        )?
        .schema("spent_time", SchemaOptions::typed("Duration").read_only())?
        .schema(
            "percentage_done",
            SchemaOptions::typed("Integer")
                .title(t(&format!("{}.done_ratio", I18N_PREFIX)))
                .read_only(),
        )?
        .schema("created_at", SchemaOptions::typed("DateTime").read_only())?
        .schema("updated_at", SchemaOptions::typed("DateTime").read_only())?
        .schema("author", SchemaOptions::typed("User").read_only())?
        .schema("project", SchemaOptions::typed("Project").read_only())?
        .schema("type", SchemaOptions::typed("Type").read_only())?;

    definition
        .schema_with_allowed_link(
            "assignee",
            SchemaOptions::typed("User")
                .title(t(&format!("{}.assigned_to", I18N_PREFIX)))
                .optional(),
            Some(Arc::new(|schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                Ok(ctx.paths.available_assignees(schema.project().id_or_zero()))
            })),
        )?
        .schema_with_allowed_link(
            "responsible",
            SchemaOptions::typed("User")
                .title(t(&format!("{}.responsible", I18N_PREFIX)))
                .optional(),
            Some(Arc::new(|schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                Ok(ctx.paths.available_responsibles(schema.project().id_or_zero()))
            })),
        )?;

    definition
        .schema_with_allowed_collection(
            "status",
            SchemaOptions::typed("Status"),
            Some(Arc::new(|schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                let Some(statuses) =
                    schema.assignable_statuses_for(ctx.user(), ctx.workflow.as_ref(), ctx.store.as_ref())?
                else {
                    return Ok(None);
                };
                allowed_values_of("status", &statuses, |status| status.id, |id, status| {
                    Ok(AllowedValue::new(
                        StatusRepresenter::link(id, &status.name, ctx),
                        StatusRepresenter::to_value(status, ctx)?,
                    ))
                })
                .map(Some)
            })),
        )?
        .schema_with_allowed_collection(
            "version",
            SchemaOptions::typed("Version")
                .title(t(&format!("{}.fixed_version", I18N_PREFIX)))
                .optional(),
            Some(Arc::new(|schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                let Some(versions) = schema.assignable_versions() else {
                    return Ok(None);
                };
                allowed_values_of("version", &versions, |version| version.id, |id, version| {
                    Ok(AllowedValue::new(
                        VersionRepresenter::link(id, &version.name, ctx),
                        VersionRepresenter::to_value(version, ctx)?,
                    ))
                })
                .map(Some)
            })),
        )?
        .schema_with_allowed_collection(
            "priority",
            SchemaOptions::typed("Priority"),
            Some(Arc::new(|schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                let Some(priorities) = schema.assignable_priorities(ctx.store.as_ref())? else {
                    return Ok(None);
                };
                allowed_values_of("priority", &priorities, |priority| priority.id, |id, priority| {
                    Ok(AllowedValue::new(
                        PriorityRepresenter::link(id, &priority.name, ctx),
                        PriorityRepresenter::to_value(priority, ctx)?,
                    ))
                })
                .map(Some)
            })),
        )?;

    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use op_auth::builtin;
    use op_core::traits::Id;
    use op_models::{CustomField, CustomFieldFormat, InMemoryWorkPackageStore, Version};
    use serde_json::json;

    fn render(schema: &WorkPackageSchema, ctx: &RepresenterContext) -> Value {
        WorkPackageSchemaRepresenter::new(schema, ctx)
            .unwrap()
            .to_value()
            .unwrap()
    }

    fn new_form_schema() -> WorkPackageSchema {
        WorkPackageSchema::for_project_and_type(project(), task_type())
    }

    #[test]
    fn test_base_entries() {
        let json = render(&new_form_schema(), &context());

        assert_eq!(
            json["_type"],
            json!({ "type": "MetaType", "name": "Type", "required": true, "writable": false })
        );
        assert_eq!(json["lockVersion"]["name"], "Lock Version");
        assert_eq!(json["id"]["writable"], false);
        assert_eq!(
            json["subject"],
            json!({
                "type": "String",
                "name": "Subject",
                "required": true,
                "writable": true,
                "minLength": 1,
                "maxLength": 255
            })
        );
        assert_eq!(json["description"]["type"], "Formattable");
        assert_eq!(json["startDate"]["required"], false);
        assert_eq!(json["estimatedTime"]["type"], "Duration");
        assert_eq!(json["spentTime"]["required"], true);
        assert_eq!(json["percentageDone"]["name"], "Progress (%)");
        assert_eq!(json["createdAt"]["type"], "DateTime");
        assert_eq!(json["author"]["writable"], false);
        assert_eq!(json["project"]["type"], "Project");
        assert_eq!(json["type"]["type"], "Type");
        assert_eq!(json["version"]["name"], "Version");
        assert_eq!(json["version"]["required"], false);
        assert_eq!(json["_links"]["self"]["href"], "/api/v3/work_packages/schemas/1-1");
    }

    #[test]
    fn test_new_form_has_no_allowed_values() {
        let json = render(&new_form_schema(), &context());

        for attribute in ["assignee", "responsible", "status", "version", "priority"] {
            assert!(json[attribute].get("_links").is_none(), "{} has links", attribute);
            assert!(json[attribute].get("_embedded").is_none(), "{} has values", attribute);
        }
        assert_eq!(json["assignee"]["type"], "User");
        assert_eq!(json["assignee"]["name"], "Assignee");
        assert_eq!(json["assignee"]["required"], false);
    }

    #[test]
    fn test_assignee_links_to_project_members() {
        let schema = WorkPackageSchema::for_work_package(work_package());
        let json = render(&schema, &context());

        assert_eq!(
            json["assignee"]["_links"]["allowedValues"]["href"],
            "/api/v3/projects/1/available_assignees"
        );
        assert_eq!(
            json["responsible"]["_links"]["allowedValues"]["href"],
            "/api/v3/projects/1/available_responsibles"
        );
    }

    #[test]
    fn test_statuses_equal_workflow_result() {
        let ctx = context_for(&[builtin::EDIT_WORK_PACKAGES.name]);
        let wp = work_package();
        let expected = ctx.workflow.new_statuses_allowed_to(&wp, ctx.user()).unwrap();
        assert!(expected.len() > 1);

        let json = render(&WorkPackageSchema::for_work_package(wp), &ctx);
        let links = json["status"]["_links"]["allowedValues"].as_array().unwrap();
        let embedded = json["status"]["_embedded"]["allowedValues"].as_array().unwrap();

        let embedded_ids: Vec<Option<Id>> = embedded.iter().map(|s| s["id"].as_i64()).collect();
        let expected_ids: Vec<Option<Id>> = expected.iter().map(|s| s.id).collect();
        assert_eq!(embedded_ids, expected_ids);
        for (link, status) in links.iter().zip(&expected) {
            assert_eq!(link["title"], status.name.as_str());
            assert_eq!(link["href"], format!("/api/v3/statuses/{}", status.id.unwrap()));
        }
    }

    #[test]
    fn test_statuses_of_dirty_work_package_start_from_stored_status() {
        let store = Arc::new(InMemoryWorkPackageStore::new());
        store.insert(work_package()).unwrap();

        let mut wp = work_package();
        wp.set_status(status_closed());
        let ctx = context_with(member(&[builtin::EDIT_WORK_PACKAGES.name]), store);

        let json = render(&WorkPackageSchema::for_work_package(wp), &ctx);
        let names: Vec<&str> = json["status"]["_embedded"]["allowedValues"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["name"].as_str())
            .collect();
        assert_eq!(names, vec!["New", "In Progress"]);
    }

    #[test]
    fn test_versions_and_priorities_embedded() {
        let store = Arc::new(InMemoryWorkPackageStore::new());
        store.add_priority(priority_high());
        store.add_priority(priority_normal());
        let ctx = context_with(member(&[]), store);

        let mut wp = work_package();
        wp.project.shared_versions = vec![Version::new("1.0", PROJECT_ID).with_id(9)];

        let json = render(&WorkPackageSchema::for_work_package(wp), &ctx);
        assert_eq!(
            json["version"]["_links"]["allowedValues"],
            json!([{ "href": "/api/v3/versions/9", "title": "1.0" }])
        );
        assert_eq!(json["version"]["_embedded"]["allowedValues"][0]["_type"], "Version");

        let priorities: Vec<&str> = json["priority"]["_links"]["allowedValues"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["title"].as_str())
            .collect();
        assert_eq!(priorities, vec!["Normal", "High"]);
    }

    #[test]
    fn test_custom_fields_injected_per_schema() {
        let effort = CustomField::new(11, "Effort", CustomFieldFormat::Int).required();
        let mut project = project();
        project.work_package_custom_fields = vec![effort.clone()];
        let mut wp_type = task_type();
        wp_type.custom_fields = vec![effort];

        let ctx = context();
        let with_field = WorkPackageSchema::for_project_and_type(project, wp_type);
        let json = render(&with_field, &ctx);
        assert_eq!(
            json["customField11"],
            json!({ "type": "Integer", "name": "Effort", "required": true, "writable": true })
        );

        let json = render(&new_form_schema(), &ctx);
        assert!(json.get("customField11").is_none());
    }
}
