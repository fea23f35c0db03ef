//! Relation model
//!
//! Mirrors: app/models/relation.rb
//! Table: relations

use op_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of relation between two work packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Relates,
    Duplicates,
    Duplicated,
    Blocks,
    Blocked,
    Precedes,
    Follows,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relates => "relates",
            Self::Duplicates => "duplicates",
            Self::Duplicated => "duplicated",
            Self::Blocks => "blocks",
            Self::Blocked => "blocked",
            Self::Precedes => "precedes",
            Self::Follows => "follows",
        }
    }

    /// The same relation seen from the other work package
    pub fn reverse(&self) -> Self {
        match self {
            Self::Relates => Self::Relates,
            Self::Duplicates => Self::Duplicated,
            Self::Duplicated => Self::Duplicates,
            Self::Blocks => Self::Blocked,
            Self::Blocked => Self::Blocks,
            Self::Precedes => Self::Follows,
            Self::Follows => Self::Precedes,
        }
    }

    /// `Relates` -> `Relates`, used in `Relation::<Type>` tags
    pub fn camelized(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Localised label, e.g. "blocked by"
    pub fn label(&self) -> String {
        op_core::i18n::t(&format!("label_relation.{}", self.as_str()))
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed relation `from` -> `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: Option<Id>,
    pub from_id: Id,
    pub to_id: Id,
    pub relation_type: RelationType,
    /// Lag in days for precedes/follows
    pub delay: Option<i32>,
}

impl Identifiable for Relation {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Relation {
    pub fn new(from_id: Id, to_id: Id, relation_type: RelationType) -> Self {
        Self {
            id: None,
            from_id,
            to_id,
            relation_type,
            delay: None,
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// The work package on the other end, seen from `work_package_id`
    pub fn other_work_package_id(&self, work_package_id: Id) -> Id {
        if self.from_id == work_package_id {
            self.to_id
        } else {
            self.from_id
        }
    }

    /// Relation type as read from `work_package_id`
    pub fn relation_type_for(&self, work_package_id: Id) -> RelationType {
        if self.from_id == work_package_id {
            self.relation_type
        } else {
            self.relation_type.reverse()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_is_involution() {
        for t in [
            RelationType::Relates,
            RelationType::Duplicates,
            RelationType::Blocks,
            RelationType::Precedes,
        ] {
            assert_eq!(t.reverse().reverse(), t);
        }
        assert_eq!(RelationType::Blocks.reverse(), RelationType::Blocked);
    }

    #[test]
    fn test_camelized() {
        assert_eq!(RelationType::Duplicated.camelized(), "Duplicated");
    }

    #[test]
    fn test_other_side() {
        let relation = Relation::new(1, 2, RelationType::Blocks);
        assert_eq!(relation.other_work_package_id(1), 2);
        assert_eq!(relation.other_work_package_id(2), 1);
        assert_eq!(relation.relation_type_for(2), RelationType::Blocked);
        assert_eq!(RelationType::Blocked.label(), "blocked by");
    }
}
