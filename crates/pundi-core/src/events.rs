use crate::backend::MutationAction;

/// Notifications raised by the sync controller for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// An optimistic change was applied locally and is awaiting the backend.
    Pending { action: MutationAction },
    /// The record set changed: after a load, an optimistic apply or a rollback.
    StateChanged,
    /// A mutation failed and its optimistic change was rolled back.
    SyncFailed {
        action: MutationAction,
        reason: String,
    },
    /// Loading fell back to the built-in offline dataset.
    OfflineModeEntered,
}
