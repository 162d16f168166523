//! In-memory mirror of the user's records.
//!
//! The store performs no I/O. The sync controller is its only writer; the
//! local mutation primitives exist so it can apply changes optimistically and
//! undo them with a [`Rollback`] when the backend says no.

use pundi_domain::{
    Category, EntryKind, Identifiable, NewCategory, NewTransaction, Profile, RecordSet,
    Transaction,
};
use uuid::Uuid;

/// Prefix for identifiers minted locally before the backend assigns one.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Minimal pre-mutation value needed to undo one optimistic change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollback {
    DiscardCategory { temp_id: String },
    RestoreCategory { index: usize, category: Category },
    DiscardTransaction { temp_id: String },
    RestoreProfile(Profile),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: RecordSet,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories in insertion order, optionally restricted to one kind.
    pub fn categories(&self, kind: Option<EntryKind>) -> Vec<&Category> {
        self.records
            .categories
            .iter()
            .filter(|category| kind.map_or(true, |kind| category.kind == kind))
            .collect()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.records.categories.iter().find(|category| category.id() == id)
    }

    /// Returns `true` when a category with the same `(name, kind)` exists.
    pub fn has_category(&self, name: &str, kind: EntryKind) -> bool {
        self.records
            .categories
            .iter()
            .any(|category| category.same_identity(name, kind))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.records.transactions
    }

    pub fn profile(&self) -> &Profile {
        &self.records.profile
    }

    pub fn snapshot(&self) -> &RecordSet {
        &self.records
    }

    /// Atomically swaps in a complete record set.
    pub fn replace_all(&mut self, records: RecordSet) {
        self.records = records;
    }

    /// Appends `category` under a fresh local id and returns that id.
    pub fn add_category_local(&mut self, category: &NewCategory) -> String {
        let temp_id = local_id();
        self.records.categories.push(category.with_id(temp_id.clone()));
        temp_id
    }

    /// Filters out the category with `id`, returning what is needed to put it
    /// back exactly where it was.
    pub fn remove_category_local(&mut self, id: &str) -> Option<Rollback> {
        let index = position_of(&self.records.categories, id)?;
        let category = self.records.categories.remove(index);
        Some(Rollback::RestoreCategory { index, category })
    }

    pub fn restore_category_local(&mut self, index: usize, category: Category) {
        let index = index.min(self.records.categories.len());
        self.records.categories.insert(index, category);
    }

    /// Appends `transaction` under a fresh local id and returns that id.
    pub fn add_transaction_local(&mut self, transaction: &NewTransaction) -> String {
        let temp_id = local_id();
        self.records
            .transactions
            .push(transaction.with_id(temp_id.clone()));
        temp_id
    }

    /// Replaces the profile, handing back the previous value.
    pub fn set_profile_local(&mut self, profile: Profile) -> Profile {
        std::mem::replace(&mut self.records.profile, profile)
    }

    pub fn apply_rollback(&mut self, rollback: Rollback) {
        match rollback {
            Rollback::DiscardCategory { temp_id } => {
                self.records.categories.retain(|category| category.id != temp_id);
            }
            Rollback::RestoreCategory { index, category } => {
                self.restore_category_local(index, category);
            }
            Rollback::DiscardTransaction { temp_id } => {
                self.records.transactions.retain(|txn| txn.id != temp_id);
            }
            Rollback::RestoreProfile(profile) => {
                self.records.profile = profile;
            }
        }
    }
}

pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

fn local_id() -> String {
    format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4())
}

fn position_of<T: Identifiable>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
