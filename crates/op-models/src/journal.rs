//! Journal Model
//!
//! Mirrors: app/models/journal.rb
//!
//! Journals are the audit trail of a work package. The API renders each one
//! as an activity.

use chrono::{DateTime, Utc};
use op_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

/// Journal version (for detecting concurrent modifications)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JournalVersion(pub i32);

impl JournalVersion {
    pub fn new(version: i32) -> Self {
        Self(version)
    }

    pub fn initial() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<i32> for JournalVersion {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// One changed attribute within a journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalDetail {
    /// Attribute name, e.g. `status_id`
    pub attribute: String,
    pub old_value: Option<String>,
    pub value: Option<String>,
}

impl JournalDetail {
    pub fn new(
        attribute: impl Into<String>,
        old_value: Option<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            old_value,
            value,
        }
    }

    /// Human readable line, e.g. "Status changed from New to Closed"
    pub fn to_text(&self) -> String {
        let label = op_core::i18n::t(&format!(
            "activerecord.attributes.work_package.{}",
            self.attribute.trim_end_matches("_id")
        ));
        match (&self.old_value, &self.value) {
            (Some(old), Some(new)) => format!("{} changed from {} to {}", label, old, new),
            (None, Some(new)) => format!("{} set to {}", label, new),
            (Some(old), None) => format!("{} deleted ({})", label, old),
            (None, None) => label,
        }
    }
}

/// A journal entry (audit record) of a work package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Journal ID
    pub id: Option<Id>,
    /// ID of the journaled work package
    pub journable_id: Id,
    /// Version number of this journal entry
    pub version: JournalVersion,
    /// User who made the change
    pub user_id: Id,
    /// Notes/comments for this change
    pub notes: Option<String>,
    /// Timestamp of the change
    pub created_at: DateTime<Utc>,
    /// Attribute changes recorded by this entry
    #[serde(default)]
    pub details: Vec<JournalDetail>,
}

impl Identifiable for Journal {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Journal {
    /// Create a new journal entry
    pub fn new(journable_id: Id, version: JournalVersion, user_id: Id) -> Self {
        Self {
            id: None,
            journable_id,
            version,
            user_id,
            notes: None,
            created_at: Utc::now(),
            details: Vec::new(),
        }
    }

    /// Builder: persisted journal
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Set notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Record an attribute change
    pub fn with_detail(mut self, detail: JournalDetail) -> Self {
        self.details.push(detail);
        self
    }

    /// Check if this is the initial journal (creation)
    pub fn is_initial(&self) -> bool {
        self.version.0 == 1
    }

    /// Check if this journal has notes
    pub fn has_notes(&self) -> bool {
        self.notes.as_ref().map_or(false, |n| !n.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_version() {
        let v = JournalVersion::initial();
        assert_eq!(v.0, 1);
        assert_eq!(v.next().0, 2);
    }

    #[test]
    fn test_journal_notes() {
        let journal = Journal::new(1, JournalVersion::initial(), 1);
        assert!(!journal.has_notes());
        assert!(journal.is_initial());

        let with_notes = journal.clone().with_notes("Test notes");
        assert!(with_notes.has_notes());

        let blank = journal.with_notes("   ");
        assert!(!blank.has_notes());
    }

    #[test]
    fn test_detail_text() {
        let changed = JournalDetail::new("status_id", Some("New".into()), Some("Closed".into()));
        assert_eq!(changed.to_text(), "Status changed from New to Closed");

        let set = JournalDetail::new("due_date", None, Some("2024-05-01".into()));
        assert_eq!(set.to_text(), "Due date set to 2024-05-01");
    }
}
