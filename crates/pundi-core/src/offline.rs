//! Built-in record set used when the backend cannot be reached.

use pundi_domain::{Category, EntryKind, Profile, RecordSet};

pub const OFFLINE_CATEGORY_ID: &str = "C1";
pub const OFFLINE_CATEGORY_NAME: &str = "Gaji";
pub const OFFLINE_PROFILE_NAME: &str = "User Simulasi";
pub const OFFLINE_PROFILE_STATUS: &str = "Mode Preview";

/// Builds a fresh copy of the fallback dataset.
///
/// Every call returns an independent value, so edits made during an offline
/// session never leak into later fallbacks.
pub fn offline_dataset() -> RecordSet {
    RecordSet::new(
        vec![Category::new(
            OFFLINE_CATEGORY_ID,
            OFFLINE_CATEGORY_NAME,
            EntryKind::Income,
        )],
        Vec::new(),
        Profile::new(OFFLINE_PROFILE_NAME, OFFLINE_PROFILE_STATUS),
    )
}
