//! Activity HAL Representer
//!
//! One journal entry of a work package. Entries carrying notes are typed
//! `Activity::Comment`.

use op_core::traits::Id;
use op_core::types::{Formattable, TextFormat};
use op_core::OpResult;
use op_models::Journal;
use serde::Serialize;
use serde_json::Value;

use super::hal::{HalLink, HalLinks, HalResource};
use crate::context::RepresenterContext;
use crate::date_time_formatter::DateTimeFormatter;

#[derive(Debug, Clone, Serialize)]
pub struct ActivityRepresentation {
    pub id: Option<Id>,
    pub version: i32,
    pub comment: Formattable,
    pub details: Vec<Formattable>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

pub struct ActivityRepresenter;

impl ActivityRepresenter {
    pub fn represent(journal: &Journal, context: &RepresenterContext) -> OpResult<HalResource<ActivityRepresentation>> {
        let renderer = &context.text_renderer;
        let rep = ActivityRepresentation {
            id: journal.id,
            version: journal.version.0,
            comment: renderer.formattable(context.settings.text_formatting(), journal.notes.as_deref()),
            details: journal
                .details
                .iter()
                .map(|detail| renderer.formattable(TextFormat::Plain, Some(&detail.to_text())))
                .collect(),
            created_at: DateTimeFormatter::format_datetime(Some(journal.created_at), false)?,
        };

        let paths = &context.paths;
        let mut links = HalLinks::new()
            .with("workPackage", HalLink::new(paths.work_package(journal.journable_id)))
            .with("user", HalLink::new(paths.user(journal.user_id)));
        if let Some(id) = journal.id {
            links.add("self", HalLink::new(paths.activity(id)));
        }

        let type_name = if journal.has_notes() {
            "Activity::Comment"
        } else {
            "Activity"
        };
        Ok(HalResource::new(type_name, rep).with_links(links))
    }

    pub fn to_value(journal: &Journal, context: &RepresenterContext) -> OpResult<Value> {
        Self::represent(journal, context)?.to_value()
    }
}
