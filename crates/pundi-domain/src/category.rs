//! Domain types representing income and expense categories.

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Groups transactions under a user-defined label of one [`EntryKind`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(deserialize_with = "wire_id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Returns `true` when this category has the same `(name, kind)` identity,
    /// comparing names case-insensitively.
    pub fn same_identity(&self, name: &str, kind: EntryKind) -> bool {
        self.kind == kind && self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Canonical payload for creating a category; the backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Materialises the payload under a provisional local identifier.
    pub fn with_id(&self, id: impl Into<String>) -> Category {
        Category::new(id, self.name.clone(), self.kind)
    }
}
