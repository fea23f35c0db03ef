//! Work package payload (form body)
//!
//! The writable subset of a work package: scalar properties plus a `_links`
//! object for the link valued attributes. Used to render the payload of a
//! form and to read a create or update request body back into a work package.
//!
//! `projectId` is not part of the payload: moving a work package to another
//! project goes through the move flow. `id`, `createdAt` and `updatedAt` are
//! owned by persistence and ignored on write.

use once_cell::sync::Lazy;
use op_core::{OpError, OpResult};
use op_models::WorkPackage;
use serde_json::Value;
use tracing::debug;

use super::custom_field_injector::CustomFieldInjector;
use super::links::Representation;
use super::property::PropertyDescriptor;
use super::work_package::{
    attribute_links, description, due_date, lock_version, parent_id, start_date, subject, version_id_setter,
    WORK_PACKAGE_TYPE,
};
use crate::context::RepresenterContext;

/// Attribute links settable through a payload
const WRITABLE_LINKS: &[&str] = &["status", "assignee", "responsible", "priority", "version", "category"];

static BASE: Lazy<Representation<WorkPackage>> = Lazy::new(|| {
    let mut representation = Representation::new(WORK_PACKAGE_TYPE);
    for link in attribute_links()
        .into_iter()
        .filter(|link| WRITABLE_LINKS.contains(&link.rel()))
    {
        representation.links.push(link);
    }

    for property in [
        lock_version(),
        subject(),
        description(),
        parent_id(),
        start_date(),
        due_date(),
        // write only
        PropertyDescriptor::new("versionId", |_: &WorkPackage, _: &RepresenterContext| Ok(Value::Null))
            .setter(version_id_setter),
    ] {
        representation.properties.push(property);
    }
    representation
});

#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadOptions {
    /// Clear `lock_version` so the form has to supply it again
    pub enforce_lock_version_validation: bool,
}

pub struct WorkPackagePayloadRepresenter<'a> {
    work_package: &'a mut WorkPackage,
    context: &'a RepresenterContext,
    representation: Representation<WorkPackage>,
}

impl<'a> WorkPackagePayloadRepresenter<'a> {
    pub fn new(work_package: &'a mut WorkPackage, context: &'a RepresenterContext, options: PayloadOptions) -> Self {
        if options.enforce_lock_version_validation {
            debug!(work_package_id = ?work_package.id, "clearing lock version of form payload");
            work_package.lock_version = None;
        }

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

    pub fn work_package(&self) -> &WorkPackage {
        &*self.work_package
    }

    pub fn to_value(&self) -> OpResult<Value> {
        self.representation.render(&*self.work_package, self.context)
    }

    /// Apply a submitted document. Links are applied before properties;
    /// unknown and read-only keys are ignored.
    pub fn from_value(&mut self, document: &Value) -> OpResult<()> {
        let Value::Object(document) = document else {
            return Err(OpError::invalid_format(
                "payload",
                "JSON object",
                document.to_string(),
            ));
        };

        match document.get("_links") {
            Some(Value::Object(links)) => {
                self.representation
                    .links
                    .apply(&mut *self.work_package, links, self.context)?
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(OpError::invalid_format("_links", "JSON object", other.to_string()))
            }
        }

        self.representation
            .properties
            .apply(&mut *self.work_package, document, self.context)
    }

    pub fn from_json(&mut self, json: &str) -> OpResult<()> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| OpError::invalid_format("payload", "JSON document", e.to_string()))?;
        self.from_value(&document)
    }
}
