//! StringObject HAL Representer
//!
//! Wraps a plain string (a list custom field value) so it can be linked to
//! and embedded like any other resource.

use op_core::OpResult;
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalResource};
use crate::context::RepresenterContext;

#[derive(Debug, Clone, Serialize)]
pub struct StringObjectRepresentation {
    pub value: String,
}

pub struct StringObjectRepresenter;

impl StringObjectRepresenter {
    pub fn represent(value: &str, context: &RepresenterContext) -> HalResource<StringObjectRepresentation> {
        HalResource::new(
            "StringObject",
            StringObjectRepresentation {
                value: value.to_string(),
            },
        )
        .with_link("self", Self::link(value, context))
    }

    pub fn to_value(value: &str, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(value, context).to_value()
    }

    pub fn link(value: &str, context: &RepresenterContext) -> HalLink {
        HalLink::with_title(context.paths.string_object(value), value)
    }
}
