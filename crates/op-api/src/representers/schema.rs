//! Schema decorator
//!
//! Builds the property list of a schema document. Every entry renders as a
//! property schema (`{type, name, required, writable, ...}`) instead of a
//! plain value. Link valued attributes expose what they may be set to in one
//! of two ways, chosen when the entry is declared:
//!
//! - by link: `_links.allowedValues.href`, a collection the client fetches
//! - by collection: `_links.allowedValues` as an array of `{href, title}`
//!   plus the rendered values under `_embedded.allowedValues`
//!
//! Both only carry allowed values when the represented schema defines
//! assignable values (it was built for a concrete work package).

use op_core::i18n::t;
use op_core::traits::Id;
use op_core::{OpError, OpResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use super::hal::{rels, to_value, HalLink, HalLinks};
use super::property::{camel_case, upper_camel_case, PropertyDescriptor, PropertyList};
use crate::context::RepresenterContext;

/// Implemented by the models a schema is rendered from
pub trait DefinesAssignableValues {
    /// Whether allowed values can be computed at all
    fn defines_assignable_values(&self) -> bool;
}

pub type AllowedHrefFn<S> = Arc<dyn Fn(&S, &RepresenterContext) -> OpResult<String> + Send + Sync>;
pub type AllowedValuesFn<S> =
    Arc<dyn Fn(&S, &RepresenterContext) -> OpResult<Option<Vec<AllowedValue>>> + Send + Sync>;

/// One value of a by-collection attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedValue {
    pub link: HalLink,
    pub document: Value,
}

impl AllowedValue {
    pub fn new(link: HalLink, document: Value) -> Self {
        Self { link, document }
    }
}

/// Allowed values of `property` built from `items`. Items without an id
/// cannot be linked to and are skipped.
pub fn allowed_values_of<T>(
    property: &str,
    items: &[T],
    id_of: impl Fn(&T) -> Option<Id>,
    represent: impl Fn(Id, &T) -> OpResult<AllowedValue>,
) -> OpResult<Vec<AllowedValue>> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        match id_of(item) {
            Some(id) => values.push(represent(id, item)?),
            None => warn!(property, "skipping allowed value without id"),
        }
    }
    Ok(values)
}

/// How an attribute exposes its allowed values
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AllowedValues {
    #[default]
    None,
    ByLink(Option<String>),
    ByCollection(Option<Vec<AllowedValue>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    pub name: String,
    pub required: bool,
    pub writable: bool,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip)]
    pub allowed_values: AllowedValues,
}

impl PropertySchema {
    pub fn to_value(&self) -> OpResult<Value> {
        let mut document = match to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(OpError::Internal(format!(
                    "property schema serialized to {}",
                    other
                )))
            }
        };

        match &self.allowed_values {
            AllowedValues::None | AllowedValues::ByLink(None) | AllowedValues::ByCollection(None) => {}
            AllowedValues::ByLink(Some(href)) => {
                let links = HalLinks::new().with(rels::ALLOWED_VALUES, HalLink::new(href.clone()));
                document.insert("_links".to_string(), to_value(&links)?);
            }
            AllowedValues::ByCollection(Some(values)) => {
                let mut links = HalLinks::new();
                links.add_array(
                    rels::ALLOWED_VALUES,
                    values.iter().map(|v| v.link.clone()).collect(),
                );
                document.insert("_links".to_string(), to_value(&links)?);

                let mut embedded = Map::new();
                embedded.insert(
                    rels::ALLOWED_VALUES.to_string(),
                    Value::Array(values.iter().map(|v| v.document.clone()).collect()),
                );
                document.insert("_embedded".to_string(), Value::Object(embedded));
            }
        }

        Ok(Value::Object(document))
    }
}

/// Declaration options shared by all schema entries
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaOptions {
    pub type_name: Option<String>,
    pub title: Option<String>,
    pub required: bool,
    pub writable: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            type_name: None,
            title: None,
            required: true,
            writable: true,
            min_length: None,
            max_length: None,
        }
    }
}

impl SchemaOptions {
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn min_length(mut self, min: u32) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: u32) -> Self {
        self.max_length = Some(max);
        self
    }
}

/// Property list builder of a schema representer
pub struct SchemaDefinition<S> {
    i18n_prefix: &'static str,
    properties: PropertyList<S>,
}

impl<S: DefinesAssignableValues + 'static> SchemaDefinition<S> {
    /// `i18n_prefix` is where default titles are looked up, e.g.
    /// `activerecord.attributes.work_package`
    pub fn new(i18n_prefix: &'static str) -> Self {
        Self {
            i18n_prefix,
            properties: PropertyList::new(),
        }
    }

    pub fn properties(&self) -> &PropertyList<S> {
        &self.properties
    }

    pub fn into_properties(self) -> PropertyList<S> {
        self.properties
    }

    fn title_for(&self, property: &str, options: &SchemaOptions) -> String {
        options
            .title
            .clone()
            .unwrap_or_else(|| t(&format!("{}.{}", self.i18n_prefix, property)))
    }

    fn base(&self, property: &str, type_name: String, options: &SchemaOptions) -> PropertySchema {
        PropertySchema {
            property_type: type_name,
            name: self.title_for(property, options),
            required: options.required,
            writable: options.writable,
            min_length: options.min_length,
            max_length: options.max_length,
            allowed_values: AllowedValues::None,
        }
    }

    /// A plain entry; `type` must be given
    pub fn schema(&mut self, property: &str, options: SchemaOptions) -> OpResult<&mut Self> {
        if property.is_empty() {
            return Err(OpError::argument("schema property name is missing"));
        }
        let type_name = options
            .type_name
            .clone()
            .ok_or_else(|| OpError::argument(format!("schema '{}' has no type", property)))?;

        let rendered = self.base(property, type_name, &options).to_value()?;
        self.properties.push(PropertyDescriptor::new(
            camel_case(property),
            move |_: &S, _: &RepresenterContext| Ok(rendered.clone()),
        ));
        Ok(self)
    }

    /// An entry whose allowed values are fetched from `href`; the type
    /// defaults to the camelized property name
    pub fn schema_with_allowed_link(
        &mut self,
        property: &str,
        options: SchemaOptions,
        href: Option<AllowedHrefFn<S>>,
    ) -> OpResult<&mut Self> {
        if property.is_empty() {
            return Err(OpError::argument("schema property name is missing"));
        }
        let href = href.ok_or_else(|| {
            OpError::argument(format!("schema '{}' has no allowed values href", property))
        })?;
        let type_name = options
            .type_name
            .clone()
            .unwrap_or_else(|| upper_camel_case(property));
        let base = self.base(property, type_name, &options);

        self.properties.push(PropertyDescriptor::new(
            camel_case(property),
            move |schema: &S, context: &RepresenterContext| {
                let mut property_schema = base.clone();
                let allowed = if schema.defines_assignable_values() {
                    Some(href(schema, context)?)
                } else {
                    None
                };
                property_schema.allowed_values = AllowedValues::ByLink(allowed);
                property_schema.to_value()
            },
        ));
        Ok(self)
    }

    /// An entry embedding its allowed values; `type` must be given
    pub fn schema_with_allowed_collection(
        &mut self,
        property: &str,
        options: SchemaOptions,
        values: Option<AllowedValuesFn<S>>,
    ) -> OpResult<&mut Self> {
        if property.is_empty() {
            return Err(OpError::argument("schema property name is missing"));
        }
        let values = values.ok_or_else(|| {
            OpError::argument(format!("schema '{}' has no allowed values", property))
        })?;
        let type_name = options
            .type_name
            .clone()
            .ok_or_else(|| OpError::argument(format!("schema '{}' has no type", property)))?;
        let base = self.base(property, type_name, &options);

        self.properties.push(PropertyDescriptor::new(
            camel_case(property),
            move |schema: &S, context: &RepresenterContext| {
                let mut property_schema = base.clone();
                let allowed = if schema.defines_assignable_values() {
                    values(schema, context)?
                } else {
                    None
                };
                property_schema.allowed_values = AllowedValues::ByCollection(allowed);
                property_schema.to_value()
            },
        ));
        Ok(self)
    }
}
