//! Status HAL Representer

use op_core::OpResult;
use op_models::Status;
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalResource};
use crate::context::RepresenterContext;

#[derive(Debug, Clone, Serialize)]
pub struct StatusRepresentation {
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "isClosed")]
    pub is_closed: bool,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    #[serde(rename = "defaultDoneRatio")]
    pub default_done_ratio: Option<i32>,
    pub position: i32,
}

pub struct StatusRepresenter;

impl StatusRepresenter {
    pub fn represent(status: &Status, context: &RepresenterContext) -> HalResource<StatusRepresentation> {
        let rep = StatusRepresentation {
            id: status.id,
            name: status.name.clone(),
            is_closed: status.is_closed,
            is_default: status.is_default,
            default_done_ratio: status.default_done_ratio,
            position: status.position,
        };

        let mut hal = HalResource::new("Status", rep);
        if let Some(id) = status.id {
            hal = hal.with_link("self", Self::link(id, &status.name, context));
        }
        hal
    }

    pub fn to_value(status: &Status, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(status, context).to_value()
    }

    /// `{href, title}` pointing at a status
    pub fn link(id: i64, name: &str, context: &RepresenterContext) -> HalLink {
        HalLink::with_title(context.paths.status(id), name)
    }
}
