use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use pundi_core::{
    memory::QueryKind, offline_dataset, record_store::is_local_id, BackendClient, BackendError,
    CodecError, CoreError, ImageCodec, MemoryBackend, Mutation, MutationAction, PhotoSettings,
    ProfileDraft, SessionMode, SubmitAck, SyncController, SyncEvent,
};
use pundi_domain::{Category, EntryKind, NewTransaction, Profile, RecordSet, Transaction};
use rust_decimal::Decimal;
use tokio::sync::{broadcast::Receiver, oneshot, Mutex};

fn remote_records() -> RecordSet {
    RecordSet::new(
        vec![
            Category::new("C1", "makan", EntryKind::Expense),
            Category::new("C2", "Gaji", EntryKind::Income),
        ],
        Vec::new(),
        Profile::new("Ana", "Hemat pangkal kaya"),
    )
}

async fn live_controller() -> (Arc<MemoryBackend>, SyncController<Arc<MemoryBackend>>) {
    let backend = Arc::new(MemoryBackend::with_records(remote_records()));
    let mut controller = SyncController::new(Arc::clone(&backend));
    assert_eq!(controller.load().await, SessionMode::Live);
    (backend, controller)
}

fn drain(rx: &mut Receiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn groceries(amount: i64) -> NewTransaction {
    NewTransaction::new(
        NaiveDate::from_ymd_opt(2024, 8, 17).unwrap(),
        EntryKind::Expense,
        "makan",
        Decimal::from(amount),
    )
}

struct FixedCodec;

impl ImageCodec for FixedCodec {
    fn encode_photo(&self, raw: &[u8], settings: PhotoSettings) -> Result<String, CodecError> {
        if raw.is_empty() {
            return Err(CodecError("empty image".into()));
        }
        Ok(format!(
            "data:image/jpeg;base64,{}x{}",
            settings.max_dimension,
            raw.len()
        ))
    }
}

#[tokio::test]
async fn initial_load_mirrors_backend_payloads() {
    let (backend, controller) = live_controller().await;
    assert_eq!(controller.store().snapshot(), &backend.records().await);
}

#[tokio::test]
async fn any_failed_query_falls_back_to_offline_dataset() {
    for failing in [QueryKind::Categories, QueryKind::Transactions, QueryKind::Profile] {
        let backend = Arc::new(MemoryBackend::with_records(remote_records()));
        backend.fail_query(Some(failing)).await;
        let mut controller = SyncController::new(Arc::clone(&backend));
        let mut rx = controller.subscribe();

        assert_eq!(controller.load().await, SessionMode::Offline);
        assert_eq!(controller.store().snapshot(), &offline_dataset());
        assert_eq!(
            drain(&mut rx),
            vec![SyncEvent::OfflineModeEntered, SyncEvent::StateChanged]
        );
    }
}

#[tokio::test]
async fn reload_recovers_after_backend_returns() {
    let backend = Arc::new(MemoryBackend::with_records(remote_records()));
    backend.set_offline(true).await;
    let mut controller = SyncController::new(Arc::clone(&backend));
    assert_eq!(controller.load().await, SessionMode::Offline);

    backend.set_offline(false).await;
    assert_eq!(controller.mode(), SessionMode::Offline);
    assert_eq!(controller.reload().await, SessionMode::Live);
    assert_eq!(controller.store().snapshot(), &remote_records());
}

#[tokio::test]
async fn duplicate_category_is_rejected_before_any_request() {
    let (backend, mut controller) = live_controller().await;
    let before = controller.store().clone();

    let err = controller
        .add_category("Makan", EntryKind::Expense)
        .await
        .expect_err("duplicate must be rejected");

    assert!(err.is_validation(), "unexpected error: {err:?}");
    assert_eq!(controller.store(), &before);
    assert!(backend.submitted().await.is_empty());
}

#[tokio::test]
async fn blank_category_name_is_rejected() {
    let (backend, mut controller) = live_controller().await;
    let err = controller
        .add_category("   ", EntryKind::Income)
        .await
        .expect_err("blank name must be rejected");
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(backend.submitted().await.is_empty());
}

#[tokio::test]
async fn same_name_with_other_kind_is_allowed() {
    let (_backend, mut controller) = live_controller().await;
    controller
        .add_category("Makan", EntryKind::Income)
        .await
        .expect("different kind is a different category");
    assert_eq!(controller.category_options(EntryKind::Income), ["Gaji", "Makan"]);
}

#[tokio::test]
async fn confirmed_category_is_reconciled_with_server_id() {
    let (backend, mut controller) = live_controller().await;
    let mut rx = controller.subscribe();

    controller
        .add_category("Transport", EntryKind::Expense)
        .await
        .expect("add category");

    let added = controller
        .store()
        .categories(Some(EntryKind::Expense))
        .into_iter()
        .find(|category| category.name == "Transport")
        .cloned()
        .expect("category present");
    assert_eq!(added.id, "C3");
    assert_eq!(controller.store().snapshot(), &backend.records().await);

    let submitted = backend.submitted().await;
    assert!(matches!(
        &submitted[..],
        [Mutation::SaveCategory { data }] if data.name == "Transport"
    ));
    assert_eq!(
        drain(&mut rx),
        vec![
            SyncEvent::StateChanged,
            SyncEvent::Pending {
                action: MutationAction::SaveCategory
            },
            SyncEvent::StateChanged,
        ]
    );
}

#[tokio::test]
async fn rejected_category_is_rolled_back_exactly() {
    let (backend, mut controller) = live_controller().await;
    backend
        .reject_mutations(Some("Sheet is locked".into()))
        .await;
    let before = controller.store().clone();
    let mut rx = controller.subscribe();

    let err = controller
        .add_category("Transport", EntryKind::Expense)
        .await
        .expect_err("backend rejects");

    match err {
        CoreError::Sync { action, message } => {
            assert_eq!(action, MutationAction::SaveCategory);
            assert_eq!(message, "Sheet is locked");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(controller.store(), &before);
    assert_eq!(
        drain(&mut rx),
        vec![
            SyncEvent::StateChanged,
            SyncEvent::Pending {
                action: MutationAction::SaveCategory
            },
            SyncEvent::SyncFailed {
                action: MutationAction::SaveCategory,
                reason: "Sheet is locked".into(),
            },
            SyncEvent::StateChanged,
        ]
    );
}

#[tokio::test]
async fn failed_delete_restores_category_in_place() {
    let (backend, mut controller) = live_controller().await;
    backend.set_offline(true).await;
    let before = controller.store().clone();

    let err = controller
        .delete_category("C1")
        .await
        .expect_err("connection dropped");

    assert!(matches!(err, CoreError::Sync { action: MutationAction::DeleteCategory, .. }));
    assert_eq!(controller.store(), &before);
    assert_eq!(controller.mode(), SessionMode::Live);
}

#[tokio::test]
async fn deleting_unknown_category_is_a_validation_error() {
    let (backend, mut controller) = live_controller().await;
    let err = controller
        .delete_category("C99")
        .await
        .expect_err("unknown id");
    assert!(err.is_validation());
    assert!(backend.submitted().await.is_empty());
}

#[tokio::test]
async fn transaction_rollback_and_confirmation() {
    let (backend, mut controller) = live_controller().await;

    backend.reject_mutations(Some("quota exceeded".into())).await;
    let before = controller.store().clone();
    controller
        .add_transaction(groceries(2000))
        .await
        .expect_err("rejected");
    assert_eq!(controller.store(), &before);

    backend.reject_mutations(None).await;
    controller
        .add_transaction(groceries(2000).with_note("  nasi padang "))
        .await
        .expect("accepted");

    let history = controller.history_snapshot(None);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "T1");
    assert_eq!(history[0].note.as_deref(), Some("nasi padang"));
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let (backend, mut controller) = live_controller().await;
    let err = controller
        .add_transaction(groceries(-5))
        .await
        .expect_err("negative amount");
    assert!(err.is_validation());
    assert!(controller.history_snapshot(None).is_empty());
    assert!(backend.submitted().await.is_empty());
}

#[tokio::test]
async fn successful_sequence_applies_every_mutation_in_order() {
    let (backend, mut controller) = live_controller().await;

    controller
        .add_category("Transport", EntryKind::Expense)
        .await
        .unwrap();
    controller
        .add_transaction(NewTransaction::new(
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            EntryKind::Income,
            "Gaji",
            Decimal::from(5000),
        ))
        .await
        .unwrap();
    controller.add_transaction(groceries(2000)).await.unwrap();
    controller.add_transaction(groceries(1000)).await.unwrap();
    controller.delete_category("C1").await.unwrap();
    controller
        .update_profile(ProfileDraft::new("Ana", "Menabung"))
        .await
        .unwrap();

    let state = controller.store().snapshot();
    assert_eq!(state, &backend.records().await);
    let names: Vec<_> = state.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Gaji", "Transport"]);
    assert_eq!(state.transactions.len(), 3);
    assert_eq!(state.profile.status, "Menabung");

    let dashboard = controller.dashboard_snapshot();
    assert_eq!(dashboard.income, Decimal::from(5000));
    assert_eq!(dashboard.expense, Decimal::from(3000));
    assert_eq!(dashboard.balance, Decimal::from(2000));
    assert_eq!(dashboard.category_amount("makan"), Some(Decimal::from(3000)));
    assert_eq!(dashboard, controller.dashboard_snapshot());
}

#[tokio::test]
async fn profile_photo_goes_through_codec() {
    let backend = Arc::new(MemoryBackend::with_records(remote_records()));
    let mut controller = SyncController::new(Arc::clone(&backend))
        .with_image_codec(Arc::new(FixedCodec), PhotoSettings::default());
    controller.load().await;

    controller
        .update_profile(ProfileDraft::new("Ana", "Hemat").with_photo(vec![1, 2, 3]))
        .await
        .expect("profile update");
    assert_eq!(
        controller.profile().embedded_photo(),
        Some("data:image/jpeg;base64,150x3")
    );

    controller
        .update_profile(ProfileDraft::new("Ana B.", "Hemat"))
        .await
        .expect("profile update without photo");
    assert_eq!(controller.profile().name, "Ana B.");
    assert_eq!(
        controller.profile().photo,
        "data:image/jpeg;base64,150x3",
        "empty photo keeps the previous image"
    );
}

#[tokio::test]
async fn photo_without_codec_is_a_validation_error() {
    let (backend, mut controller) = live_controller().await;
    let err = controller
        .update_profile(ProfileDraft::new("Ana", "Hemat").with_photo(vec![9]))
        .await
        .expect_err("no codec configured");
    assert!(err.is_validation());
    assert!(backend.submitted().await.is_empty());
}

#[tokio::test]
async fn failed_profile_update_restores_previous_profile() {
    let (backend, mut controller) = live_controller().await;
    backend.set_offline(true).await;
    let before = controller.profile().clone();

    controller
        .update_profile(ProfileDraft::new("Someone else", "Boros"))
        .await
        .expect_err("backend unreachable");

    assert_eq!(controller.profile(), &before);
}

#[tokio::test]
async fn reconcile_failure_after_confirmation_falls_back_offline() {
    let (backend, mut controller) = live_controller().await;
    backend.fail_query(Some(QueryKind::Transactions)).await;
    let mut rx = controller.subscribe();

    controller
        .add_category("Transport", EntryKind::Expense)
        .await
        .expect("mutation itself was confirmed");

    assert_eq!(controller.mode(), SessionMode::Offline);
    assert_eq!(controller.store().snapshot(), &offline_dataset());
    assert!(drain(&mut rx).contains(&SyncEvent::OfflineModeEntered));
}

#[tokio::test]
async fn history_snapshot_filters_by_keyword() {
    let (_backend, mut controller) = live_controller().await;
    controller
        .add_transaction(groceries(2000).with_note("Sarapan"))
        .await
        .unwrap();
    controller
        .add_transaction(NewTransaction::new(
            NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
            EntryKind::Income,
            "Gaji",
            Decimal::from(5000),
        ))
        .await
        .unwrap();

    assert_eq!(controller.history_snapshot(Some("SARAPAN")).len(), 1);
    assert_eq!(controller.history_snapshot(Some("mak")).len(), 1);
    assert_eq!(controller.history_snapshot(None).len(), 2);
}

/// Holds every submit until the test releases it.
struct HeldBackend {
    inner: MemoryBackend,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

impl HeldBackend {
    fn new(records: RecordSet) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let backend = Self {
            inner: MemoryBackend::with_records(records),
            release: Mutex::new(Some(rx)),
        };
        (backend, tx)
    }
}

#[async_trait]
impl BackendClient for HeldBackend {
    async fn get_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.inner.get_categories().await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>, BackendError> {
        self.inner.get_transactions().await
    }

    async fn get_profile(&self) -> Result<Profile, BackendError> {
        self.inner.get_profile().await
    }

    async fn submit(&self, mutation: &Mutation) -> Result<SubmitAck, BackendError> {
        let release = self.release.lock().await.take();
        if let Some(release) = release {
            let _ = release.await;
        }
        self.inner.submit(mutation).await
    }
}

#[tokio::test]
async fn optimistic_category_is_visible_while_submit_is_in_flight() {
    let (backend, release) = HeldBackend::new(remote_records());
    let mut controller = SyncController::new(backend);
    controller.load().await;
    let mut records = controller.watch_records();
    let mut rx = controller.subscribe();

    let observer = async {
        records.changed().await.expect("controller alive");
        let pending = records.borrow_and_update().clone();
        let added = pending
            .categories
            .iter()
            .find(|category| category.name == "Transport")
            .cloned()
            .expect("optimistic category published before the ack");
        assert!(is_local_id(&added.id), "expected a temp id, got {}", added.id);
        assert_eq!(drain(&mut rx).first(), Some(&SyncEvent::StateChanged));
        release.send(()).expect("submit still waiting");
    };

    let (outcome, ()) = tokio::join!(
        controller.add_category("Transport", EntryKind::Expense),
        observer
    );
    outcome.expect("backend confirms");

    let confirmed = records.borrow().clone();
    assert!(confirmed.categories.iter().all(|category| !is_local_id(&category.id)));
    assert_eq!(confirmed, *controller.store().snapshot());
}

#[tokio::test]
async fn rollback_is_republished_to_watchers() {
    let (backend, mut controller) = live_controller().await;
    backend.reject_mutations(Some("Sheet is locked".into())).await;
    let records = controller.watch_records();

    controller
        .add_transaction(groceries(1500))
        .await
        .expect_err("backend rejects");

    assert!(records.borrow().transactions.is_empty());
    assert_eq!(*records.borrow(), remote_records());
}
