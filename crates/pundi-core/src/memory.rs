//! In-process [`BackendClient`] that keeps canonical records in memory.
//!
//! It assigns server ids the way the hosted backend does (`C<n>`, `T<n>`),
//! and can be told to fail queries or mutations so callers can exercise the
//! offline and rollback paths without a network.

use async_trait::async_trait;
use pundi_domain::{Category, Profile, RecordSet, Transaction};
use tokio::sync::Mutex;

use crate::{
    backend::{BackendClient, Mutation, SubmitAck},
    error::BackendError,
};

/// Which query call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Categories,
    Transactions,
    Profile,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: RecordSet,
    next_category: u64,
    next_transaction: u64,
    failing_query: Option<QueryKind>,
    rejection: Option<String>,
    offline: bool,
    submitted: Vec<Mutation>,
}

pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_records(RecordSet::default())
    }

    pub fn with_records(records: RecordSet) -> Self {
        let state = MemoryState {
            next_category: next_serial(records.categories.iter().map(|c| c.id.as_str()), "C"),
            next_transaction: next_serial(
                records.transactions.iter().map(|t| t.id.as_str()),
                "T",
            ),
            records,
            ..MemoryState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Makes the given query fail with a transport error (`None` clears it).
    pub async fn fail_query(&self, query: Option<QueryKind>) {
        self.state.lock().await.failing_query = query;
    }

    /// Makes every mutation come back as `success: false` with `message`.
    pub async fn reject_mutations(&self, message: Option<String>) {
        self.state.lock().await.rejection = message;
    }

    /// Simulates a dropped connection for every call.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Mutations received so far, in arrival order.
    pub async fn submitted(&self) -> Vec<Mutation> {
        self.state.lock().await.submitted.clone()
    }

    pub async fn records(&self) -> RecordSet {
        self.state.lock().await.records.clone()
    }

    async fn query<T>(
        &self,
        kind: QueryKind,
        read: impl FnOnce(&RecordSet) -> T,
    ) -> Result<T, BackendError> {
        let state = self.state.lock().await;
        if state.offline || state.failing_query == Some(kind) {
            return Err(BackendError::Transport(format!("{kind:?} query unavailable")));
        }
        Ok(read(&state.records))
    }
}

/// One past the highest `<prefix><n>` serial among `ids`; other ids are ignored.
fn next_serial<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

#[async_trait]
impl BackendClient for MemoryBackend {
    async fn get_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.query(QueryKind::Categories, |records| records.categories.clone())
            .await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>, BackendError> {
        self.query(QueryKind::Transactions, |records| {
            records.transactions.clone()
        })
        .await
    }

    async fn get_profile(&self) -> Result<Profile, BackendError> {
        self.query(QueryKind::Profile, |records| records.profile.clone())
            .await
    }

    async fn submit(&self, mutation: &Mutation) -> Result<SubmitAck, BackendError> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(BackendError::Transport("connection dropped".into()));
        }
        state.submitted.push(mutation.clone());
        if let Some(message) = state.rejection.clone() {
            return Ok(SubmitAck::rejected(message));
        }

        let ack = match mutation {
            Mutation::SaveCategory { data } => {
                let duplicate = state
                    .records
                    .categories
                    .iter()
                    .any(|category| category.same_identity(&data.name, data.kind));
                if duplicate {
                    SubmitAck::rejected(format!("Category `{}` already exists", data.name))
                } else {
                    let id = format!("C{}", state.next_category);
                    state.next_category += 1;
                    state.records.categories.push(data.with_id(id));
                    SubmitAck::accepted()
                }
            }
            Mutation::DeleteCategory { id } => {
                state.records.categories.retain(|category| &category.id != id);
                SubmitAck::accepted()
            }
            Mutation::AddTransaction { data } => {
                let id = format!("T{}", state.next_transaction);
                state.next_transaction += 1;
                state.records.transactions.push(data.with_id(id));
                SubmitAck::accepted()
            }
            Mutation::UpdateProfile { data } => {
                state.records.profile = state.records.profile.updated_with(data);
                SubmitAck::accepted()
            }
        };
        Ok(ack)
    }
}
