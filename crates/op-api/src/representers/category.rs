//! Category HAL Representer

use op_core::OpResult;
use op_models::Category;
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalLinks, HalResource};
use crate::context::RepresenterContext;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRepresentation {
    pub id: Option<i64>,
    pub name: String,
}

pub struct CategoryRepresenter;

impl CategoryRepresenter {
    pub fn represent(category: &Category, context: &RepresenterContext) -> HalResource<CategoryRepresentation> {
        let paths = &context.paths;
        let mut links = HalLinks::new().with("project", HalLink::new(paths.project(category.project_id)));
        if let Some(id) = category.id {
            links.add("self", HalLink::with_title(paths.category(id), &category.name));
        }
        if let Some(user_id) = category.assigned_to_id {
            links.add("defaultAssignee", HalLink::new(paths.user(user_id)));
        }

        HalResource::new(
            "Category",
            CategoryRepresentation {
                id: category.id,
                name: category.name.clone(),
            },
        )
        .with_links(links)
    }

    pub fn to_value(category: &Category, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(category, context).to_value()
    }
}
