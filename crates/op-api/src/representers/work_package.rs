//! Work Package HAL Representer
//!
//! Converts work package models to HAL+JSON format compatible with OpenProject API v3.
//!
//! The shape is a shared base `Representation` (properties, permission gated
//! links, embedded sub-resources) cloned per call and extended with the
//! custom fields available to the represented work package.

use once_cell::sync::Lazy;
use op_auth::builtin;
use op_core::traits::Id;
use op_core::{OpError, OpResult};
use op_models::WorkPackage;
use serde_json::{Map, Value};

use super::activity::ActivityRepresenter;
use super::category::CategoryRepresenter;
use super::custom_field_injector::CustomFieldInjector;
use super::hal::{rels, HalLink};
use super::links::{LinkDescriptor, Representation};
use super::priority::PriorityRepresenter;
use super::property::PropertyDescriptor;
use super::relation::RelationRepresenter;
use super::status::StatusRepresenter;
use super::user::UserRepresenter;
use super::version::VersionRepresenter;
use crate::context::RepresenterContext;
use crate::date_time_formatter::DateTimeFormatter;
use crate::paths::ApiV3Paths;

pub const WORK_PACKAGE_TYPE: &str = "WorkPackage";

static BASE: Lazy<Representation<WorkPackage>> = Lazy::new(base_representation);

/// Full read view of a work package
pub struct WorkPackageRepresenter<'a> {
    work_package: &'a WorkPackage,
    context: &'a RepresenterContext,
    representation: Representation<WorkPackage>,
}

impl<'a> WorkPackageRepresenter<'a> {
    pub fn new(work_package: &'a WorkPackage, context: &'a RepresenterContext) -> Self {
        let mut representation = BASE.clone();
        for custom_field in work_package.available_custom_fields() {
            CustomFieldInjector::inject_value(&mut representation, &custom_field);
        }

        Self {
            work_package,
            context,
            representation,
        }
    }

    pub fn representation(&self) -> &Representation<WorkPackage> {
        &self.representation
    }

    pub fn to_value(&self) -> OpResult<Value> {
        self.representation.render(self.work_package, self.context)
    }
}

fn base_representation() -> Representation<WorkPackage> {
    let mut representation = Representation::new(WORK_PACKAGE_TYPE);
    for link in action_links().into_iter().chain(attribute_links()) {
        representation.links.push(link);
    }
    for property in properties() {
        representation.properties.push(property);
    }
    for embedded in embedded() {
        representation.embedded.push(embedded);
    }
    representation
}

type HrefBuilder = fn(&ApiV3Paths, Id) -> String;

/// Href of a path taking the work package id; `None` while unsaved
fn member_href(
    path: HrefBuilder,
) -> impl Fn(&WorkPackage, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync + 'static {
    move |wp: &WorkPackage, ctx: &RepresenterContext| Ok(wp.id.map(|id| path(&ctx.paths, id)))
}

fn subject_title(
    prefix: &'static str,
) -> impl Fn(&WorkPackage, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync + 'static {
    move |wp: &WorkPackage, _: &RepresenterContext| Ok(Some(format!("{} {}", prefix, wp.subject)))
}

fn fixed_title(
    title: &'static str,
) -> impl Fn(&WorkPackage, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync + 'static {
    move |_: &WorkPackage, _: &RepresenterContext| Ok(Some(title.to_string()))
}

fn watchers_href(wp: &WorkPackage, ctx: &RepresenterContext) -> Option<String> {
    wp.id.map(|id| ctx.paths.work_package_watchers(id))
}

fn action_links() -> Vec<LinkDescriptor<WorkPackage>> {
    vec![
        LinkDescriptor::new(rels::SELF, member_href(ApiV3Paths::work_package))
            .title(|wp: &WorkPackage, _: &RepresenterContext| Ok(Some(wp.subject.clone()))),
        LinkDescriptor::new(rels::SCHEMA, |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(Some(ctx.paths.schema(
                wp.project.id_or_zero(),
                wp.work_package_type.id_or_zero(),
            )))
        }),
        LinkDescriptor::new(rels::UPDATE, member_href(ApiV3Paths::work_package_form))
            .permission(builtin::EDIT_WORK_PACKAGES.name)
            .method("post")
            .title(subject_title("Update")),
        LinkDescriptor::new(rels::UPDATE_IMMEDIATELY, member_href(ApiV3Paths::work_package))
            .permission(builtin::EDIT_WORK_PACKAGES.name)
            .method("patch")
            .title(subject_title("Update")),
        LinkDescriptor::new(rels::DELETE, member_href(ApiV3Paths::work_packages_bulk_delete))
            .permission(builtin::DELETE_WORK_PACKAGES.name)
            .method("delete")
            .title(subject_title("Delete")),
        LinkDescriptor::new(rels::LOG_TIME, member_href(ApiV3Paths::new_work_package_time_entry))
            .permission(builtin::LOG_TIME.name)
            .media_type("text/html")
            .title(subject_title("Log time on")),
        LinkDescriptor::new(rels::DUPLICATE, |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp
                .id
                .map(|id| ctx.paths.new_project_work_package_copy(&wp.project.identifier, id)))
        })
        .permission(builtin::ADD_WORK_PACKAGES.name)
        .media_type("text/html")
        .title(subject_title("Duplicate")),
        LinkDescriptor::new(rels::MOVE, member_href(ApiV3Paths::new_work_package_move))
            .permission(builtin::MOVE_WORK_PACKAGES.name)
            .media_type("text/html")
            .title(subject_title("Move")),
        LinkDescriptor::new(rels::AVAILABLE_WATCHERS, member_href(ApiV3Paths::available_watchers))
            .permission(builtin::ADD_WORK_PACKAGE_WATCHERS.name)
            .title(fixed_title("Available Watchers")),
        LinkDescriptor::new(rels::WATCH_CHANGES, |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(watchers_href(wp, ctx))
        })
        .permission(builtin::VIEW_WORK_PACKAGES.name)
        .show_if(|wp: &WorkPackage, ctx: &RepresenterContext| {
            let user = &ctx.current_user;
            Ok(!user.is_anonymous() && !wp.is_watched_by(user.id()))
        })
        .method("post")
        .data(|_: &WorkPackage, ctx: &RepresenterContext| {
            let mut data = Map::new();
            data.insert("user_id".to_string(), Value::from(ctx.current_user.id()));
            Ok(Some(Value::Object(data)))
        })
        .title(fixed_title("Watch work package")),
        LinkDescriptor::new(rels::UNWATCH_CHANGES, |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(watchers_href(wp, ctx).map(|href| format!("{}/{}", href, ctx.current_user.id())))
        })
        .permission(builtin::VIEW_WORK_PACKAGES.name)
        .show_if(|wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.is_watched_by(ctx.current_user.id()))
        })
        .method("delete")
        .title(fixed_title("Unwatch work package")),
        LinkDescriptor::new(rels::ADD_WATCHER, |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(watchers_href(wp, ctx).map(|href| format!("{}{{?user_id}}", href)))
        })
        .permission(builtin::ADD_WORK_PACKAGE_WATCHERS.name)
        .method("post")
        .templated()
        .title(fixed_title("Add watcher")),
        LinkDescriptor::new(rels::ADD_RELATION, member_href(ApiV3Paths::work_package_relations))
            .permission(builtin::MANAGE_WORK_PACKAGE_RELATIONS.name)
            .method("post")
            .title(fixed_title("Add relation")),
        LinkDescriptor::new(rels::ADD_CHILD, |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp
                .id
                .map(|id| ctx.paths.new_project_work_package_child(&wp.project.identifier, id)))
        })
        .permission(builtin::ADD_WORK_PACKAGES.name)
        .media_type("text/html")
        .title(subject_title("Add child of")),
        LinkDescriptor::new(rels::CHANGE_PARENT, member_href(ApiV3Paths::work_package))
            .permission(builtin::MANAGE_SUBTASKS.name)
            .method("patch")
            .title(subject_title("Change parent of")),
        LinkDescriptor::new(rels::ADD_COMMENT, member_href(ApiV3Paths::work_package_activities))
            .permission(builtin::ADD_WORK_PACKAGE_NOTES.name)
            .method("post")
            .title(fixed_title("Add comment")),
        LinkDescriptor::new(rels::TIME_ENTRIES, member_href(ApiV3Paths::work_package_time_entries))
            .permission(builtin::VIEW_TIME_ENTRIES.name)
            .media_type("text/html")
            .title(fixed_title("Time entries")),
        LinkDescriptor::many(rels::CHILDREN, |wp: &WorkPackage, ctx: &RepresenterContext| {
            let mut links = Vec::new();
            for child in &wp.children {
                if ctx.visible(child.id)? {
                    links.push(HalLink::with_title(ctx.paths.work_package(child.id), &child.subject));
                }
            }
            Ok(links)
        }),
        LinkDescriptor::new("parent", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.parent_id.map(|id| ctx.paths.work_package(id)))
        })
        .show_if(|wp: &WorkPackage, ctx: &RepresenterContext| match wp.parent_id {
            Some(parent_id) => ctx.visible(parent_id),
            None => Ok(true),
        })
        .title(|wp: &WorkPackage, _: &RepresenterContext| {
            Ok(wp.parent().map(|parent| parent.subject.clone()))
        }),
    ]
}

/// Attribute links; the setters make them writable through `_links`
pub(crate) fn attribute_links() -> Vec<LinkDescriptor<WorkPackage>> {
    vec![
        LinkDescriptor::new("status", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.status_id.map(|id| ctx.paths.status(id)))
        })
        .title(|wp: &WorkPackage, _: &RepresenterContext| Ok(wp.status().map(|s| s.name.clone())))
        .setter("statuses", |wp: &mut WorkPackage, id, _: &RepresenterContext| {
            wp.status_id = id;
            Ok(())
        }),
        LinkDescriptor::new("author", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.author_id.map(|id| ctx.paths.user(id)))
        })
        .title(|wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.author().map(|u| u.name_in(ctx.settings.user_format())))
        }),
        LinkDescriptor::new("assignee", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.assigned_to_id.map(|id| ctx.paths.user(id)))
        })
        .title(|wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.assigned_to().map(|u| u.name_in(ctx.settings.user_format())))
        })
        .setter("users", |wp: &mut WorkPackage, id, _: &RepresenterContext| {
            wp.assigned_to_id = id;
            Ok(())
        }),
        LinkDescriptor::new("responsible", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.responsible_id.map(|id| ctx.paths.user(id)))
        })
        .title(|wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.responsible().map(|u| u.name_in(ctx.settings.user_format())))
        })
        .setter("users", |wp: &mut WorkPackage, id, _: &RepresenterContext| {
            wp.responsible_id = id;
            Ok(())
        }),
        LinkDescriptor::new("category", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.category_id.map(|id| ctx.paths.category(id)))
        })
        .title(|wp: &WorkPackage, _: &RepresenterContext| Ok(wp.category().map(|c| c.name.clone())))
        .setter("categories", |wp: &mut WorkPackage, id, _: &RepresenterContext| {
            wp.category_id = id;
            Ok(())
        }),
        LinkDescriptor::new("version", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.fixed_version_id.map(|id| ctx.paths.version(id)))
        })
        .title(|wp: &WorkPackage, _: &RepresenterContext| {
            Ok(wp.fixed_version().map(|v| v.to_s_for_project(&wp.project)))
        })
        .setter("versions", |wp: &mut WorkPackage, id, _: &RepresenterContext| {
            wp.fixed_version_id = id;
            Ok(())
        }),
        LinkDescriptor::new("priority", |wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(wp.priority_id.map(|id| ctx.paths.priority(id)))
        })
        .title(|wp: &WorkPackage, _: &RepresenterContext| Ok(wp.priority().map(|p| p.name.clone())))
        .setter("priorities", |wp: &mut WorkPackage, id, _: &RepresenterContext| {
            wp.priority_id = id;
            Ok(())
        }),
    ]
}

fn optional<T>(value: OpResult<Option<T>>) -> OpResult<Value>
where
    T: Into<Value>,
{
    value.map(|v| v.map_or(Value::Null, Into::into))
}

fn id_value(value: &Value, property: &str) -> OpResult<Option<Id>> {
    match value {
        Value::Null => Ok(None),
        other => other
            .as_i64()
            .map(Some)
            .ok_or_else(|| OpError::invalid_format(property, "integer", other.to_string())),
    }
}

pub(crate) fn lock_version() -> PropertyDescriptor<WorkPackage> {
    PropertyDescriptor::new("lockVersion", |wp: &WorkPackage, _: &RepresenterContext| {
        Ok(wp.lock_version.map_or(Value::Null, Value::from))
    })
    .setter(|wp: &mut WorkPackage, value: &Value, _: &RepresenterContext| {
        wp.lock_version = id_value(value, "lockVersion")?
            .map(|v| {
                i32::try_from(v).map_err(|_| OpError::invalid_format("lockVersion", "integer", v.to_string()))
            })
            .transpose()?;
        Ok(())
    })
}

pub(crate) fn subject() -> PropertyDescriptor<WorkPackage> {
    PropertyDescriptor::new("subject", |wp: &WorkPackage, _: &RepresenterContext| {
        Ok(Value::String(wp.subject.clone()))
    })
    .setter(|wp: &mut WorkPackage, value: &Value, _: &RepresenterContext| {
        wp.subject = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => return Err(OpError::invalid_format("subject", "string", other.to_string())),
        };
        Ok(())
    })
    .render_nil()
}

/// `{format, raw, html}`; only `raw` is read back
pub(crate) fn description() -> PropertyDescriptor<WorkPackage> {
    PropertyDescriptor::new("description", |wp: &WorkPackage, ctx: &RepresenterContext| {
        super::hal::to_value(
            ctx.text_renderer
                .formattable(ctx.settings.text_formatting(), wp.description.as_deref()),
        )
    })
    .setter(|wp: &mut WorkPackage, value: &Value, _: &RepresenterContext| {
        wp.description = match (value, value.get("raw")) {
            (Value::Null, _) => None,
            (_, Some(Value::String(raw))) => Some(raw.clone()),
            (Value::Object(_), Some(Value::Null) | None) => None,
            _ => {
                return Err(OpError::invalid_format(
                    "description",
                    "formattable with raw text",
                    value.to_string(),
                ))
            }
        };
        Ok(())
    })
    .render_nil()
}

pub(crate) fn start_date() -> PropertyDescriptor<WorkPackage> {
    PropertyDescriptor::new("startDate", |wp: &WorkPackage, _: &RepresenterContext| {
        optional(DateTimeFormatter::format_date(wp.start_date, true))
    })
    .setter(|wp: &mut WorkPackage, value: &Value, _: &RepresenterContext| {
        wp.start_date = DateTimeFormatter::parse_date(value, "startDate", true)?;
        Ok(())
    })
    .render_nil()
}

pub(crate) fn due_date() -> PropertyDescriptor<WorkPackage> {
    PropertyDescriptor::new("dueDate", |wp: &WorkPackage, _: &RepresenterContext| {
        optional(DateTimeFormatter::format_date(wp.due_date, true))
    })
    .setter(|wp: &mut WorkPackage, value: &Value, _: &RepresenterContext| {
        wp.due_date = DateTimeFormatter::parse_date(value, "dueDate", true)?;
        Ok(())
    })
    .render_nil()
}

pub(crate) fn parent_id() -> PropertyDescriptor<WorkPackage> {
    PropertyDescriptor::new("parentId", |wp: &WorkPackage, _: &RepresenterContext| {
        Ok(wp.parent_id.map_or(Value::Null, Value::from))
    })
    .setter(|wp: &mut WorkPackage, value: &Value, _: &RepresenterContext| {
        wp.parent_id = id_value(value, "parentId")?;
        Ok(())
    })
}

/// Writes `fixed_version_id`
pub(crate) fn version_id_setter(wp: &mut WorkPackage, value: &Value, _: &RepresenterContext) -> OpResult<()> {
    wp.fixed_version_id = id_value(value, "versionId")?;
    Ok(())
}

fn properties() -> Vec<PropertyDescriptor<WorkPackage>> {
    vec![
        PropertyDescriptor::new("id", |wp: &WorkPackage, _: &RepresenterContext| {
            Ok(wp.id.map_or(Value::Null, Value::from))
        })
        .render_nil(),
        lock_version(),
        subject(),
        PropertyDescriptor::new("type", |wp: &WorkPackage, _: &RepresenterContext| {
            Ok(Value::String(wp.work_package_type.name.clone()))
        })
        .render_nil(),
        description(),
        start_date(),
        due_date(),
        PropertyDescriptor::new("estimatedTime", |wp: &WorkPackage, _: &RepresenterContext| {
            optional(DateTimeFormatter::format_duration_from_hours(wp.estimated_hours, true))
        })
        .render_nil(),
        PropertyDescriptor::new("spentTime", |wp: &WorkPackage, _: &RepresenterContext| {
            optional(DateTimeFormatter::format_duration_from_hours(Some(wp.spent_hours), false))
        })
        .show_if(|wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(ctx.current_user_allowed_to(builtin::VIEW_TIME_ENTRIES.name, wp))
        }),
        PropertyDescriptor::new("percentageDone", |wp: &WorkPackage, ctx: &RepresenterContext| {
            if ctx.settings.work_package_done_ratio().is_disabled() {
                Ok(Value::Null)
            } else {
                Ok(Value::from(wp.done_ratio))
            }
        })
        .render_nil(),
        PropertyDescriptor::new("versionId", |wp: &WorkPackage, _: &RepresenterContext| {
            Ok(wp.fixed_version_id.map_or(Value::Null, Value::from))
        })
        .setter(version_id_setter)
        .render_nil(),
        PropertyDescriptor::new("versionName", |wp: &WorkPackage, _: &RepresenterContext| {
            Ok(wp
                .fixed_version()
                .map_or(Value::Null, |v| Value::String(v.name.clone())))
        })
        .render_nil(),
        PropertyDescriptor::new("projectId", |wp: &WorkPackage, _: &RepresenterContext| {
            Ok(wp.project.id.map_or(Value::Null, Value::from))
        }),
        PropertyDescriptor::new("projectName", |wp: &WorkPackage, _: &RepresenterContext| {
            Ok(Value::String(wp.project.name.clone()))
        }),
        parent_id(),
        PropertyDescriptor::new("createdAt", |wp: &WorkPackage, _: &RepresenterContext| {
            optional(DateTimeFormatter::format_datetime(wp.created_at, true))
        }),
        PropertyDescriptor::new("updatedAt", |wp: &WorkPackage, _: &RepresenterContext| {
            optional(DateTimeFormatter::format_datetime(wp.updated_at, true))
        }),
    ]
}

fn embedded() -> Vec<PropertyDescriptor<WorkPackage>> {
    vec![
        PropertyDescriptor::new("status", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.status()
                .map_or(Ok(Value::Null), |status| StatusRepresenter::to_value(status, ctx))
        }),
        PropertyDescriptor::new("author", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.author()
                .map_or(Ok(Value::Null), |user| UserRepresenter::to_value(user, ctx))
        }),
        PropertyDescriptor::new("responsible", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.responsible()
                .map_or(Ok(Value::Null), |user| UserRepresenter::to_value(user, ctx))
        }),
        PropertyDescriptor::new("assignee", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.assigned_to()
                .map_or(Ok(Value::Null), |user| UserRepresenter::to_value(user, ctx))
        }),
        PropertyDescriptor::new("category", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.category()
                .map_or(Ok(Value::Null), |category| CategoryRepresenter::to_value(category, ctx))
        }),
        PropertyDescriptor::new("priority", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.priority()
                .map_or(Ok(Value::Null), |priority| PriorityRepresenter::to_value(priority, ctx))
        }),
        PropertyDescriptor::new("activities", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.journals
                .iter()
                .map(|journal| ActivityRepresenter::to_value(journal, ctx))
                .collect::<OpResult<Vec<_>>>()
                .map(Value::Array)
        }),
        PropertyDescriptor::new("version", |wp: &WorkPackage, ctx: &RepresenterContext| {
            wp.fixed_version()
                .map_or(Ok(Value::Null), |version| VersionRepresenter::to_value(version, ctx))
        }),
        PropertyDescriptor::new("watchers", |wp: &WorkPackage, ctx: &RepresenterContext| {
            let format = ctx.settings.user_format();
            let mut watchers: Vec<_> = wp.watcher_users.iter().collect();
            watchers.sort_by(|a, b| a.cmp_by_name(b, format));
            watchers
                .into_iter()
                .map(|user| UserRepresenter::represent_watcher(user, wp, ctx)?.to_value())
                .collect::<OpResult<Vec<_>>>()
                .map(Value::Array)
        })
        .show_if(|wp: &WorkPackage, ctx: &RepresenterContext| {
            Ok(ctx.current_user_allowed_to(builtin::VIEW_WORK_PACKAGE_WATCHERS.name, wp))
        }),
        PropertyDescriptor::new("relations", |wp: &WorkPackage, ctx: &RepresenterContext| {
            let Some(work_package_id) = wp.id else {
                return Ok(Value::Array(Vec::new()));
            };
            let mut relations = Vec::new();
            for relation in &wp.relations {
                if ctx.visible(relation.other_work_package_id(work_package_id))? {
                    relations.push(RelationRepresenter::to_value(relation, wp, ctx)?);
                }
            }
            Ok(Value::Array(relations))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use op_core::config::{keys, SettingValue, Settings};
    use serde_json::json;
    use op_models::{
        Category, CustomField, CustomFieldFormat, InMemoryWorkPackageStore, Journal, JournalVersion, Relation,
        RelationType, User, Version, WorkPackageRef,
    };
    use std::sync::Arc;

    fn render(wp: &WorkPackage, ctx: &RepresenterContext) -> Value {
        WorkPackageRepresenter::new(wp, ctx).to_value().unwrap()
    }

    fn done_ratio_setting(mode: &str) -> Settings {
        let mut settings = Settings::default();
        settings.set(keys::WORK_PACKAGE_DONE_RATIO, SettingValue::String(mode.to_string()));
        settings
    }

    #[test]
    fn test_properties() {
        let json = render(&work_package(), &context());

        assert_eq!(json["_type"], "WorkPackage");
        assert_eq!(json["id"], 42);
        assert_eq!(json["lockVersion"], 3);
        assert_eq!(json["subject"], "Write the docs");
        assert_eq!(json["type"], "Task");
        assert_eq!(json["description"]["format"], "textile");
        assert_eq!(json["description"]["raw"], "First *draft*");
        assert_eq!(json["startDate"], "2015-03-02");
        assert_eq!(json["dueDate"], Value::Null);
        assert_eq!(json["estimatedTime"], "PT6H");
        assert_eq!(json["percentageDone"], 40);
        assert_eq!(json["projectId"], 1);
        assert_eq!(json["projectName"], "Demo Project");
        assert_eq!(json["createdAt"], "2015-03-01T10:00:00Z");
        assert!(json.get("spentTime").is_none());
    }

    #[test]
    fn test_percentage_done_hidden_while_disabled() {
        let wp = work_package();

        let disabled = context().with_settings(done_ratio_setting("disabled"));
        let json = render(&wp, &disabled);
        assert!(json.as_object().unwrap().contains_key("percentageDone"));
        assert_eq!(json["percentageDone"], Value::Null);

        let enabled = context().with_settings(done_ratio_setting("field"));
        assert_eq!(render(&wp, &enabled)["percentageDone"], 40);
    }

    #[test]
    fn test_spent_time_needs_permission() {
        let mut wp = work_package();
        wp.spent_hours = 1.5;
        let ctx = context_for(&[builtin::VIEW_TIME_ENTRIES.name]);
        assert_eq!(render(&wp, &ctx)["spentTime"], "PT1H30M");
    }

    #[test]
    fn test_links_for_anonymous() {
        let json = render(&work_package(), &context());
        let links = json["_links"].as_object().unwrap();

        assert_eq!(json["_links"]["self"]["href"], "/api/v3/work_packages/42");
        assert_eq!(json["_links"]["self"]["title"], "Write the docs");
        assert_eq!(json["_links"]["schema"]["href"], "/api/v3/work_packages/schemas/1-1");
        for rel in ["update", "updateImmediately", "delete", "logTime", "watchChanges", "addComment"] {
            assert!(!links.contains_key(rel), "{} should be hidden", rel);
        }
    }

    #[test]
    fn test_permission_gated_links() {
        let ctx = context_for(&[
            builtin::EDIT_WORK_PACKAGES.name,
            builtin::DELETE_WORK_PACKAGES.name,
            builtin::LOG_TIME.name,
            builtin::ADD_WORK_PACKAGES.name,
            builtin::MOVE_WORK_PACKAGES.name,
            builtin::ADD_WORK_PACKAGE_WATCHERS.name,
            builtin::MANAGE_WORK_PACKAGE_RELATIONS.name,
            builtin::MANAGE_SUBTASKS.name,
            builtin::ADD_WORK_PACKAGE_NOTES.name,
            builtin::VIEW_TIME_ENTRIES.name,
        ]);
        let json = render(&work_package(), &ctx);
        let links = &json["_links"];

        assert_eq!(links["update"]["href"], "/api/v3/work_packages/42/form");
        assert_eq!(links["update"]["method"], "post");
        assert_eq!(links["updateImmediately"]["method"], "patch");
        assert_eq!(links["delete"]["href"], "/work_packages/bulk?ids=42");
        assert_eq!(links["delete"]["method"], "delete");
        assert_eq!(links["logTime"]["type"], "text/html");
        assert_eq!(
            links["duplicate"]["href"],
            "/projects/demo/work_packages/new?copy_from=42"
        );
        assert_eq!(links["move"]["href"], "/work_packages/42/move/new");
        assert_eq!(
            links["availableWatchers"]["href"],
            "/api/v3/work_packages/42/available_watchers"
        );
        assert_eq!(links["addWatcher"]["href"], "/api/v3/work_packages/42/watchers{?user_id}");
        assert_eq!(links["addWatcher"]["templated"], true);
        assert_eq!(links["addRelation"]["href"], "/api/v3/work_packages/42/relations");
        assert_eq!(links["addChild"]["title"], "Add child of Write the docs");
        assert_eq!(links["changeParent"]["method"], "patch");
        assert_eq!(links["addComment"]["href"], "/api/v3/work_packages/42/activities");
        assert_eq!(links["timeEntries"]["href"], "/work_packages/42/time_entries");
    }

    #[test]
    fn test_watch_links_are_exclusive() {
        let ctx = context_for(&[builtin::VIEW_WORK_PACKAGES.name]);
        let mut wp = work_package();

        let json = render(&wp, &ctx);
        assert_eq!(json["_links"]["watchChanges"]["method"], "post");
        assert_eq!(json["_links"]["watchChanges"]["data"]["user_id"], USER_ID);
        assert!(json["_links"].get("unwatchChanges").is_none());

        wp.watcher_users.push(User::new(USER_ID, "member", "Mia", "Member"));
        let json = render(&wp, &ctx);
        assert!(json["_links"].get("watchChanges").is_none());
        assert_eq!(
            json["_links"]["unwatchChanges"]["href"],
            format!("/api/v3/work_packages/42/watchers/{}", USER_ID)
        );
    }

    #[test]
    fn test_attribute_links() {
        let mut wp = work_package();
        let mut version = Version::new("1.0", 2).with_id(9);
        version.project_name = Some("Platform".to_string());
        wp.set_fixed_version(Some(version));
        wp.set_assigned_to(Some(assignee()));

        let json = render(&wp, &context());
        let links = &json["_links"];
        assert_eq!(links["status"]["href"], "/api/v3/statuses/1");
        assert_eq!(links["status"]["title"], "New");
        assert_eq!(links["author"]["title"], "John Doe");
        assert_eq!(links["assignee"]["href"], "/api/v3/users/3");
        assert_eq!(links["responsible"], json!({ "href": null }));
        assert_eq!(links["category"], json!({ "href": null }));
        assert_eq!(links["version"]["title"], "Platform - 1.0");
        assert_eq!(links["priority"]["title"], "Normal");
        assert_eq!(links["parent"], json!({ "href": null }));
        assert_eq!(json["versionId"], 9);
        assert_eq!(json["versionName"], "1.0");
    }

    #[test]
    fn test_embedded_only_when_present() {
        let mut wp = work_package();
        wp.set_category(Some(Category::new("Docs", 1).with_id(4)));

        let json = render(&wp, &context());
        let embedded = json["_embedded"].as_object().unwrap();
        assert_eq!(embedded["status"]["_type"], "Status");
        assert_eq!(embedded["author"]["_type"], "User");
        assert_eq!(embedded["priority"]["name"], "Normal");
        assert_eq!(embedded["category"]["name"], "Docs");
        assert!(!embedded.contains_key("assignee"));
        assert!(!embedded.contains_key("responsible"));
        assert!(!embedded.contains_key("version"));
        assert!(!embedded.contains_key("watchers"));
        assert_eq!(embedded["activities"], json!([]));
    }

    #[test]
    fn test_responsible_embedded_and_linked() {
        let mut wp = work_package();
        wp.set_responsible(Some(assignee()));

        let json = render(&wp, &context());
        assert_eq!(json["_links"]["responsible"]["href"], "/api/v3/users/3");
        assert_eq!(json["_links"]["responsible"]["title"], "Anna Smith");
        assert_eq!(json["_embedded"]["responsible"]["login"], "asmith");
    }

    #[test]
    fn test_activities_embedded() {
        let mut wp = work_package();
        wp.journals.push(Journal::new(42, JournalVersion::initial(), 2).with_id(1));
        wp.journals
            .push(Journal::new(42, JournalVersion::new(2), 2).with_id(2).with_notes("done"));

        let json = render(&wp, &context());
        let activities = json["_embedded"]["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[1]["_type"], "Activity::Comment");
    }

    #[test]
    fn test_watchers_sorted_by_name() {
        let mut wp = work_package();
        wp.watcher_users = vec![
            User::new(7, "zed", "Zoe", "Zimmer"),
            User::new(8, "abe", "Abe", "Adams"),
        ];
        let ctx = context_for(&[builtin::VIEW_WORK_PACKAGE_WATCHERS.name]);

        let json = render(&wp, &ctx);
        let watchers = json["_embedded"]["watchers"].as_array().unwrap();
        assert_eq!(watchers[0]["name"], "Abe Adams");
        assert_eq!(watchers[1]["name"], "Zoe Zimmer");
    }

    #[test]
    fn test_only_visible_relations_and_children() {
        let store = Arc::new(InMemoryWorkPackageStore::new());
        let mut other_project = project();
        other_project.id = Some(2);
        store
            .insert(WorkPackage::new("Visible", project(), task_type()).with_id(50))
            .unwrap();
        store
            .insert(WorkPackage::new("Hidden", other_project, task_type()).with_id(51))
            .unwrap();

        let mut wp = work_package();
        wp.relations = vec![
            Relation::new(42, 50, RelationType::Relates).with_id(1),
            Relation::new(51, 42, RelationType::Blocks).with_id(2),
        ];
        wp.children = vec![WorkPackageRef::new(50, "Visible"), WorkPackageRef::new(51, "Hidden")];

        let ctx = context_with(member(&[builtin::VIEW_WORK_PACKAGES.name]), store);
        let json = render(&wp, &ctx);

        let relations = json["_embedded"]["relations"].as_array().unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0]["_links"]["relatedTo"]["href"], "/api/v3/work_packages/50");

        assert_eq!(
            json["_links"]["children"],
            json!([{ "href": "/api/v3/work_packages/50", "title": "Visible" }])
        );
    }

    #[test]
    fn test_parent_link_hidden_when_invisible() {
        let store = Arc::new(InMemoryWorkPackageStore::new());
        store
            .insert(WorkPackage::new("Epic", project(), task_type()).with_id(60))
            .unwrap();

        let mut wp = work_package();
        wp.set_parent(Some(WorkPackageRef::new(60, "Epic")));

        let viewer = context_with(member(&[builtin::VIEW_WORK_PACKAGES.name]), Arc::clone(&store));
        let json = render(&wp, &viewer);
        assert_eq!(json["_links"]["parent"]["href"], "/api/v3/work_packages/60");
        assert_eq!(json["_links"]["parent"]["title"], "Epic");
        assert_eq!(json["parentId"], 60);

        let json = render(&wp, &context_with(member(&[]), store));
        assert!(json["_links"].get("parent").is_none());
    }

    #[test]
    fn test_custom_fields_are_injected_per_work_package() {
        let field = CustomField::new(11, "Effort", CustomFieldFormat::Int);
        let mut wp = work_package();
        wp.project.work_package_custom_fields = vec![field.clone()];
        wp.work_package_type.custom_fields = vec![field];
        wp.set_custom_value(11, Some("5".to_string()));

        let ctx = context();
        assert_eq!(render(&wp, &ctx)["customField11"], 5);
        assert!(render(&work_package(), &ctx).get("customField11").is_none());
        assert!(!BASE.properties.contains("customField11"));
    }

    #[test]
    fn test_concurrent_representers_do_not_share_fields() {
        let ctx = context();

        let mut with_text = work_package();
        let text = CustomField::new(21, "Notes", CustomFieldFormat::Text);
        with_text.project.work_package_custom_fields = vec![text.clone()];
        with_text.work_package_type.custom_fields = vec![text];
        with_text.set_custom_value(21, Some("left".to_string()));

        let mut with_user = work_package();
        let reviewer = CustomField::new(22, "Reviewer", CustomFieldFormat::User);
        with_user.project.work_package_custom_fields = vec![reviewer.clone()];
        with_user.work_package_type.custom_fields = vec![reviewer];
        with_user.set_custom_value(22, Some("3".to_string()));

        std::thread::scope(|scope| {
            let left = scope.spawn(|| {
                (0..50)
                    .map(|_| render(&with_text, &ctx))
                    .collect::<Vec<_>>()
            });
            let right = scope.spawn(|| {
                (0..50)
                    .map(|_| render(&with_user, &ctx))
                    .collect::<Vec<_>>()
            });

            for json in left.join().unwrap() {
                assert_eq!(json["customField21"]["raw"], "left");
                assert!(json["_links"].get("customField22").is_none());
            }
            for json in right.join().unwrap() {
                assert_eq!(json["_links"]["customField22"]["href"], "/api/v3/users/3");
                assert!(json.get("customField21").is_none());
            }
        });
    }
}
