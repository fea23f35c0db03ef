//! Relation HAL Representer
//!
//! Relations are rendered from the point of view of the work package they
//! are embedded in: a `blocks` relation pointing at it reads as
//! `Relation::Blocked`.

use op_auth::builtin;
use op_core::traits::Id;
use op_core::OpResult;
use op_models::{Relation, RelationType, WorkPackage};
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalLinks, HalResource};
use crate::context::RepresenterContext;

#[derive(Debug, Clone, Serialize)]
pub struct RelationRepresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,
}

pub struct RelationRepresenter;

impl RelationRepresenter {
    pub fn represent(
        relation: &Relation,
        work_package: &WorkPackage,
        context: &RepresenterContext,
    ) -> HalResource<RelationRepresentation> {
        let work_package_id = work_package.id.unwrap_or(relation.from_id);
        let relation_type = relation.relation_type_for(work_package_id);

        let delay = match relation_type {
            RelationType::Precedes | RelationType::Follows => relation.delay,
            _ => None,
        };
        let rep = RelationRepresentation {
            id: relation.id,
            description: relation_type.label(),
            delay,
        };

        let paths = &context.paths;
        let mut links = HalLinks::new()
            .with("relatedFrom", HalLink::new(paths.work_package(relation.from_id)))
            .with("relatedTo", HalLink::new(paths.work_package(relation.to_id)));

        if let Some(relation_id) = relation.id {
            if context.current_user_allowed_to(builtin::MANAGE_WORK_PACKAGE_RELATIONS.name, work_package) {
                links.add(
                    "remove",
                    HalLink::new(paths.work_package_relation(work_package_id, relation_id))
                        .method("delete")
                        .title("Remove relation"),
                );
            }
        }

        HalResource::new(format!("Relation::{}", relation_type.camelized()), rep).with_links(links)
    }

    pub fn to_value(relation: &Relation, work_package: &WorkPackage, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(relation, work_package, context).to_value()
    }
}
