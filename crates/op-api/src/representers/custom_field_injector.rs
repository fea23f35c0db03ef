//! Custom field injection
//!
//! Extends a representation with one `customField<ID>` entry per custom
//! field available to the represented work package. Value formats map as:
//!
//! | format  | value          | schema type   |
//! |---------|----------------|---------------|
//! | string  | string         | String        |
//! | text    | formattable    | Formattable   |
//! | int     | integer        | Integer       |
//! | float   | number         | Float         |
//! | date    | `YYYY-MM-DD`   | Date          |
//! | bool    | boolean        | Boolean       |
//! | list    | string         | StringObject  |
//! | user    | link           | User          |
//! | version | link           | Version       |
//!
//! Stored values that do not parse for their format render as `null`.

use chrono::NaiveDate;
use op_core::error::ContractError;
use op_core::traits::Id;
use op_core::{OpError, OpResult};
use op_models::{CustomField, CustomFieldFormat, WorkPackage};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::hal::to_value;
use super::links::{LinkDescriptor, Representation};
use super::property::PropertyDescriptor;
use super::schema::{allowed_values_of, AllowedValue, SchemaDefinition, SchemaOptions};
use super::string_object::StringObjectRepresenter;
use super::version::VersionRepresenter;
use crate::context::RepresenterContext;
use crate::date_time_formatter::DateTimeFormatter;
use crate::work_package_schema::WorkPackageSchema;

pub struct CustomFieldInjector;

impl CustomFieldInjector {
    /// Schema type tag of a custom field format
    pub fn schema_type(format: CustomFieldFormat) -> &'static str {
        match format {
            CustomFieldFormat::String => "String",
            CustomFieldFormat::Text => "Formattable",
            CustomFieldFormat::Int => "Integer",
            CustomFieldFormat::Float => "Float",
            CustomFieldFormat::Date => "Date",
            CustomFieldFormat::Bool => "Boolean",
            CustomFieldFormat::List => "StringObject",
            CustomFieldFormat::User => "User",
            CustomFieldFormat::Version => "Version",
        }
    }

    /// Add the value of `custom_field` to a work package representation:
    /// a link for user and version fields, a property otherwise
    pub fn inject_value(representation: &mut Representation<WorkPackage>, custom_field: &CustomField) {
        debug!(
            custom_field_id = custom_field.id,
            format = %custom_field.field_format,
            "injecting custom field value"
        );

        let name = custom_field.accessor_name();
        let id = custom_field.id;

        match custom_field.field_format {
            CustomFieldFormat::User => representation.links.push(
                LinkDescriptor::new(name, move |wp: &WorkPackage, ctx: &RepresenterContext| {
                    Ok(stored_id(wp, id).map(|user_id| ctx.paths.user(user_id)))
                })
                .setter("users", move |wp: &mut WorkPackage, value, _ctx: &RepresenterContext| {
                    wp.set_custom_value(id, value.map(|v| v.to_string()));
                    Ok(())
                }),
            ),
            CustomFieldFormat::Version => representation.links.push(
                LinkDescriptor::new(name, move |wp: &WorkPackage, ctx: &RepresenterContext| {
                    Ok(stored_id(wp, id).map(|version_id| ctx.paths.version(version_id)))
                })
                .setter("versions", move |wp: &mut WorkPackage, value, _ctx: &RepresenterContext| {
                    wp.set_custom_value(id, value.map(|v| v.to_string()));
                    Ok(())
                }),
            ),
            format => {
                let field = Arc::new(custom_field.clone());
                let reader = Arc::clone(&field);
                representation.properties.push(
                    PropertyDescriptor::new(name, move |wp: &WorkPackage, ctx: &RepresenterContext| {
                        read_value(&reader, format, wp, ctx)
                    })
                    .setter(move |wp: &mut WorkPackage, value: &Value, _ctx: &RepresenterContext| {
                        let stored = write_value(&field, value)?;
                        wp.set_custom_value(field.id, stored);
                        Ok(())
                    })
                    .render_nil(),
                );
            }
        }
    }

    /// Add the schema entry of `custom_field` to a work package schema
    pub fn inject_schema(
        definition: &mut SchemaDefinition<WorkPackageSchema>,
        custom_field: &CustomField,
    ) -> OpResult<()> {
        debug!(
            custom_field_id = custom_field.id,
            format = %custom_field.field_format,
            "injecting custom field schema"
        );

        let name = custom_field.accessor_name();
        let mut options = SchemaOptions::typed(Self::schema_type(custom_field.field_format))
            .title(custom_field.name.clone());
        if !custom_field.is_required {
            options = options.optional();
        }

        match custom_field.field_format {
            CustomFieldFormat::String | CustomFieldFormat::Text => {
                if custom_field.min_length > 0 {
                    options = options.min_length(custom_field.min_length);
                }
                if custom_field.max_length > 0 {
                    options = options.max_length(custom_field.max_length);
                }
                definition.schema(&name, options)?;
            }
            CustomFieldFormat::List => {
                let possible_values = custom_field.possible_values.clone();
                definition.schema_with_allowed_collection(
                    &name,
                    options,
                    Some(Arc::new(move |_: &WorkPackageSchema, ctx: &RepresenterContext| {
                        possible_values
                            .iter()
                            .map(|value| {
                                Ok(AllowedValue::new(
                                    StringObjectRepresenter::link(value, ctx),
                                    StringObjectRepresenter::to_value(value, ctx)?,
                                ))
                            })
                            .collect::<OpResult<Vec<_>>>()
                            .map(Some)
                    })),
                )?;
            }
            CustomFieldFormat::User => {
                definition.schema_with_allowed_link(
                    &name,
                    options,
                    Some(Arc::new(|schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                        Ok(ctx.paths.available_assignees(schema.project().id_or_zero()))
                    })),
                )?;
            }
            CustomFieldFormat::Version => {
                let property = name.clone();
                definition.schema_with_allowed_collection(
                    &name,
                    options,
                    Some(Arc::new(move |schema: &WorkPackageSchema, ctx: &RepresenterContext| {
                        let Some(versions) = schema.assignable_versions() else {
                            return Ok(None);
                        };
                        allowed_values_of(&property, &versions, |version| version.id, |id, version| {
                            Ok(AllowedValue::new(
                                VersionRepresenter::link(id, &version.name, ctx),
                                VersionRepresenter::to_value(version, ctx)?,
                            ))
                        })
                        .map(Some)
                    })),
                )?;
            }
            CustomFieldFormat::Int
            | CustomFieldFormat::Float
            | CustomFieldFormat::Date
            | CustomFieldFormat::Bool => {
                definition.schema(&name, options)?;
            }
        }
        Ok(())
    }
}

fn stored_id(work_package: &WorkPackage, custom_field_id: Id) -> Option<Id> {
    work_package
        .custom_value(custom_field_id)
        .and_then(|raw| raw.trim().parse().ok())
}

fn read_value(
    custom_field: &CustomField,
    format: CustomFieldFormat,
    work_package: &WorkPackage,
    context: &RepresenterContext,
) -> OpResult<Value> {
    let raw = work_package.custom_value(custom_field.id);

    let value = match format {
        CustomFieldFormat::Text => to_value(
            context
                .text_renderer
                .formattable(context.settings.text_formatting(), raw),
        )?,
        _ => {
            let Some(raw) = raw else {
                return Ok(Value::Null);
            };
            match format {
                CustomFieldFormat::Int => raw.trim().parse::<i64>().map(Value::from).unwrap_or(Value::Null),
                CustomFieldFormat::Float => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                CustomFieldFormat::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| DateTimeFormatter::format_date(Some(date), true).ok().flatten())
                    .map(Value::String)
                    .unwrap_or(Value::Null),
                CustomFieldFormat::Bool => match raw {
                    "1" | "t" | "true" => Value::Bool(true),
                    "0" | "f" | "false" => Value::Bool(false),
                    _ => Value::Null,
                },
                _ => Value::String(raw.to_string()),
            }
        }
    };
    Ok(value)
}

/// Stored string form of a submitted value; `None` clears it
fn write_value(custom_field: &CustomField, value: &Value) -> OpResult<Option<String>> {
    let property = custom_field.accessor_name();
    let mismatch = |expected: &str| OpError::invalid_format(property.clone(), expected, value.to_string());

    if value.is_null() {
        return Ok(None);
    }

    let stored = match custom_field.field_format {
        CustomFieldFormat::String => value.as_str().map(str::to_string).ok_or_else(|| mismatch("string"))?,
        CustomFieldFormat::Text => value
            .get("raw")
            .map(|raw| match raw {
                Value::Null => Ok(String::new()),
                Value::String(s) => Ok(s.clone()),
                _ => Err(mismatch("formattable with raw text")),
            })
            .unwrap_or_else(|| Err(mismatch("formattable with raw text")))?,
        CustomFieldFormat::Int => value
            .as_i64()
            .map(|n| n.to_string())
            .ok_or_else(|| mismatch("integer"))?,
        CustomFieldFormat::Float => value
            .as_f64()
            .map(|n| n.to_string())
            .ok_or_else(|| mismatch("number"))?,
        CustomFieldFormat::Date => match DateTimeFormatter::parse_date(value, &property, true)? {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => return Ok(None),
        },
        CustomFieldFormat::Bool => match value.as_bool() {
            Some(true) => "1".to_string(),
            Some(false) => "0".to_string(),
            None => return Err(mismatch("boolean")),
        },
        CustomFieldFormat::List => {
            let chosen = value.as_str().ok_or_else(|| mismatch("string"))?;
            if !custom_field.possible_values.iter().any(|v| v == chosen) {
                return Err(ContractError::AttributeInvalid {
                    attribute: property.clone(),
                    message: format!("'{}' is not a possible value", chosen),
                }
                .into());
            }
            chosen.to_string()
        }
        CustomFieldFormat::User | CustomFieldFormat::Version => {
            return Err(OpError::argument(format!(
                "custom field {} is set through _links",
                custom_field.id
            )))
        }
    };
    Ok(Some(stored))
}
