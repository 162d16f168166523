//! Session orchestration: initial load, offline fallback and the optimistic
//! apply / confirm / rollback protocol for every mutating action.
//!
//! Mutating methods take `&mut self`, so a controller can only have one
//! action in flight at a time. Callers that want concurrent actions must
//! serialize them through the same controller. Readers that must not wait
//! for an action to finish follow [`SyncController::watch_records`], which
//! carries the optimistic record set while the backend is still deciding.

use std::{fmt, sync::Arc};

use pundi_domain::{
    DateWindow, EntryKind, NewCategory, NewTransaction, Profile, ProfileUpdate, RecordSet,
    Transaction,
};
use rust_decimal::Decimal;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    aggregation::{AggregationEngine, DashboardTotals},
    backend::{BackendClient, Mutation},
    codec::{ImageCodec, PhotoSettings},
    error::{BackendError, CoreError, CoreResult},
    events::SyncEvent,
    offline::offline_dataset,
    record_store::{RecordStore, Rollback},
};

const EVENT_CAPACITY: usize = 64;

/// Where the current record set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Loading,
    Live,
    Offline,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionMode::Loading => "loading",
            SessionMode::Live => "live",
            SessionMode::Offline => "offline",
        };
        f.write_str(label)
    }
}

/// Profile edit as entered by the user; `photo` holds raw image bytes that
/// still need to go through the configured [`ImageCodec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub status: String,
    pub photo: Option<Vec<u8>>,
}

impl ProfileDraft {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            photo: None,
        }
    }

    pub fn with_photo(mut self, raw: Vec<u8>) -> Self {
        self.photo = Some(raw);
        self
    }
}

/// Owns the [`RecordStore`] for one session and is its only writer.
pub struct SyncController<B> {
    backend: B,
    store: RecordStore,
    mode: SessionMode,
    events: broadcast::Sender<SyncEvent>,
    published: watch::Sender<RecordSet>,
    codec: Option<Arc<dyn ImageCodec>>,
    photo_settings: PhotoSettings,
}

impl<B: BackendClient> SyncController<B> {
    pub fn new(backend: B) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (published, _) = watch::channel(RecordSet::default());
        Self {
            backend,
            store: RecordStore::new(),
            mode: SessionMode::Loading,
            events,
            published,
            codec: None,
            photo_settings: PhotoSettings::default(),
        }
    }

    pub fn with_image_codec(mut self, codec: Arc<dyn ImageCodec>, settings: PhotoSettings) -> Self {
        self.codec = Some(codec);
        self.photo_settings = settings;
        self
    }

    /// Size limits for photos; ignored until a codec is attached.
    pub fn with_photo_settings(mut self, settings: PhotoSettings) -> Self {
        self.photo_settings = settings;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Latest record set, republished on every load, optimistic apply and
    /// rollback. The receiver stays valid while an action is awaiting the
    /// backend.
    pub fn watch_records(&self) -> watch::Receiver<RecordSet> {
        self.published.subscribe()
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetches categories, transactions and profile concurrently.
    ///
    /// All three must succeed for the session to go live; any failure swaps
    /// in a fresh offline dataset instead of a partial mix. There is no
    /// automatic retry; call [`Self::reload`] to try again.
    pub async fn load(&mut self) -> SessionMode {
        let previous = self.mode;
        self.mode = SessionMode::Loading;

        match self.fetch_remote().await {
            Ok(records) => {
                info!(
                    categories = records.categories.len(),
                    transactions = records.transactions.len(),
                    "records loaded from backend"
                );
                self.store.replace_all(records);
                self.mode = SessionMode::Live;
            }
            Err(err) => {
                warn!(error = %err, "backend unavailable, falling back to offline dataset");
                self.store.replace_all(offline_dataset());
                self.mode = SessionMode::Offline;
                if previous != SessionMode::Offline {
                    self.emit(SyncEvent::OfflineModeEntered);
                }
            }
        }

        self.publish();
        self.emit(SyncEvent::StateChanged);
        self.mode
    }

    /// User-initiated reload; the only way back to [`SessionMode::Live`]
    /// after an offline fallback.
    pub async fn reload(&mut self) -> SessionMode {
        self.load().await
    }

    pub async fn add_category(&mut self, name: &str, kind: EntryKind) -> CoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Category name must not be empty".into()));
        }
        if self.store.has_category(name, kind) {
            return Err(CoreError::Validation(format!(
                "Category `{name}` already exists in {kind}"
            )));
        }

        let payload = NewCategory::new(name, kind);
        let temp_id = self.store.add_category_local(&payload);
        debug!(%temp_id, name, %kind, "category applied locally");
        self.commit(
            Mutation::SaveCategory { data: payload },
            Rollback::DiscardCategory { temp_id },
        )
        .await
    }

    pub async fn delete_category(&mut self, id: &str) -> CoreResult<()> {
        let rollback = self
            .store
            .remove_category_local(id)
            .ok_or_else(|| CoreError::Validation(format!("Category `{id}` not found")))?;
        debug!(id, "category removed locally");
        self.commit(Mutation::DeleteCategory { id: id.to_string() }, rollback)
            .await
    }

    pub async fn add_transaction(&mut self, transaction: NewTransaction) -> CoreResult<()> {
        let transaction = normalize_transaction(transaction)?;
        let temp_id = self.store.add_transaction_local(&transaction);
        debug!(%temp_id, category = %transaction.category, "transaction applied locally");
        self.commit(
            Mutation::AddTransaction { data: transaction },
            Rollback::DiscardTransaction { temp_id },
        )
        .await
    }

    pub async fn update_profile(&mut self, draft: ProfileDraft) -> CoreResult<()> {
        let photo = match draft.photo.as_deref() {
            Some(raw) => self.encode_photo(raw)?,
            None => String::new(),
        };
        let update = ProfileUpdate {
            name: draft.name,
            status: draft.status,
            photo,
        };

        let next = self.store.profile().updated_with(&update);
        let previous = self.store.set_profile_local(next);
        debug!("profile applied locally");
        self.commit(
            Mutation::UpdateProfile { data: update },
            Rollback::RestoreProfile(previous),
        )
        .await
    }

    /// All-time income, expense, balance and expense breakdown.
    pub fn dashboard_snapshot(&self) -> DashboardTotals {
        AggregationEngine::compute_totals(self.store.transactions())
    }

    pub fn dashboard_snapshot_in(&self, window: DateWindow) -> DashboardTotals {
        AggregationEngine::compute_totals_in(self.store.transactions(), &window)
    }

    /// Transactions in store order, filtered by `keyword` when given.
    pub fn history_snapshot(&self, keyword: Option<&str>) -> Vec<Transaction> {
        match keyword {
            Some(keyword) => {
                AggregationEngine::filter_by_keyword(self.store.transactions(), keyword)
            }
            None => self.store.transactions().to_vec(),
        }
    }

    /// Category names offered when recording a transaction of `kind`.
    pub fn category_options(&self, kind: EntryKind) -> Vec<&str> {
        self.store
            .categories(Some(kind))
            .into_iter()
            .map(|category| category.name.as_str())
            .collect()
    }

    pub fn profile(&self) -> &Profile {
        self.store.profile()
    }

    async fn fetch_remote(&self) -> Result<RecordSet, BackendError> {
        let (categories, transactions, profile) = tokio::try_join!(
            self.backend.get_categories(),
            self.backend.get_transactions(),
            self.backend.get_profile(),
        )?;
        Ok(RecordSet::new(categories, transactions, profile))
    }

    /// Publishes the optimistic state, then sends the canonical payload;
    /// reconciles on success, rolls back on rejection or transport failure.
    async fn commit(&mut self, mutation: Mutation, rollback: Rollback) -> CoreResult<()> {
        let action = mutation.action();
        self.publish();
        self.emit(SyncEvent::StateChanged);
        self.emit(SyncEvent::Pending { action });

        let outcome = match self.backend.submit(&mutation).await {
            Ok(ack) => ack.into_result(),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                info!(%action, "mutation confirmed, reconciling with backend");
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.store.apply_rollback(rollback);
                self.publish();
                let message = err.to_string();
                warn!(%action, error = %message, "mutation failed, local change rolled back");
                self.emit(SyncEvent::SyncFailed {
                    action,
                    reason: message.clone(),
                });
                self.emit(SyncEvent::StateChanged);
                Err(CoreError::Sync { action, message })
            }
        }
    }

    fn encode_photo(&self, raw: &[u8]) -> CoreResult<String> {
        let codec = self.codec.as_ref().ok_or_else(|| {
            CoreError::Validation("No image codec configured for profile photos".into())
        })?;
        codec
            .encode_photo(raw, self.photo_settings)
            .map_err(|err| CoreError::Validation(err.to_string()))
    }

    fn publish(&self) {
        self.published.send_replace(self.store.snapshot().clone());
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn normalize_transaction(mut transaction: NewTransaction) -> CoreResult<NewTransaction> {
    if transaction.amount < Decimal::ZERO {
        return Err(CoreError::Validation(
            "Transaction amount must not be negative".into(),
        ));
    }
    transaction.category = transaction.category.trim().to_string();
    if transaction.category.is_empty() {
        return Err(CoreError::Validation(
            "Transaction category must not be empty".into(),
        ));
    }
    transaction.note = transaction
        .note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    Ok(transaction)
}
