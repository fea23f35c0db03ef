//! Priority HAL Representer

use op_core::OpResult;
use op_models::Priority;
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalResource};
use crate::context::RepresenterContext;

#[derive(Debug, Clone, Serialize)]
pub struct PriorityRepresentation {
    pub id: Option<i64>,
    pub name: String,
    pub position: i32,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

pub struct PriorityRepresenter;

impl PriorityRepresenter {
    pub fn represent(priority: &Priority, context: &RepresenterContext) -> HalResource<PriorityRepresentation> {
        let rep = PriorityRepresentation {
            id: priority.id,
            name: priority.name.clone(),
            position: priority.position,
            is_default: priority.is_default,
            is_active: priority.active,
        };

        let mut hal = HalResource::new("Priority", rep);
        if let Some(id) = priority.id {
            hal = hal.with_link("self", Self::link(id, &priority.name, context));
        }
        hal
    }

    pub fn to_value(priority: &Priority, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(priority, context).to_value()
    }

    pub fn link(id: i64, name: &str, context: &RepresenterContext) -> HalLink {
        HalLink::with_title(context.paths.priority(id), name)
    }
}
