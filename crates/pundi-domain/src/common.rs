use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Direction of money flow shared by categories and transactions.
///
/// The backend speaks Indonesian labels on the wire; the English names are
/// accepted as aliases when decoding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryKind {
    #[serde(rename = "Pengeluaran", alias = "Expense")]
    Expense,
    #[serde(rename = "Pemasukan", alias = "Income")]
    Income,
}

impl EntryKind {
    pub fn is_income(self) -> bool {
        matches!(self, EntryKind::Income)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Returned when a string does not name an [`EntryKind`].
pub struct ParseEntryKindError(pub String);

impl fmt::Display for ParseEntryKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entry kind `{}` (expected expense or income)", self.0)
    }
}

impl std::error::Error for ParseEntryKindError {}

impl FromStr for EntryKind {
    type Err = ParseEntryKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "pengeluaran" => Ok(EntryKind::Expense),
            "income" | "pemasukan" => Ok(EntryKind::Income),
            other => Err(ParseEntryKindError(other.to_string())),
        }
    }
}

/// Serde helpers for identifiers that the backend may emit as numbers.
pub mod wire_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Int(value) => value.to_string(),
            RawId::Float(value) if value.fract() == 0.0 => (value as i64).to_string(),
            RawId::Float(value) => value.to_string(),
        };
        Ok(id)
    }
}

/// Serde helpers for calendar dates that may arrive as full ISO timestamps.
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let head = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(head, FORMAT).map_err(de::Error::custom)
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal;
pub use serde;
