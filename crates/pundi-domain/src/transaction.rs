//! Recorded money movements and the payload used to create them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// A single income or expense entry as mirrored from the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    #[serde(default, deserialize_with = "wire_id::deserialize")]
    pub id: String,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    /// Case-insensitive substring match against the category or the note.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.category.to_lowercase().contains(needle)
            || self
                .note
                .as_deref()
                .is_some_and(|note| note.to_lowercase().contains(needle))
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        let sign = if self.kind.is_income() { '+' } else { '-' };
        format!("{} {} {}{}", self.date, self.category, sign, self.amount)
    }
}

/// Canonical payload for recording a transaction; the backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTransaction {
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        kind: EntryKind,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            kind,
            category: category.into(),
            amount,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Materialises the payload under a provisional local identifier.
    pub fn with_id(&self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            date: self.date,
            kind: self.kind,
            category: self.category.clone(),
            amount: self.amount,
            note: self.note.clone(),
        }
    }
}
