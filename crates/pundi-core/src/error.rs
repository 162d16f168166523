use thiserror::Error;

use crate::backend::MutationAction;

pub type CoreResult<T> = Result<T, CoreError>;

/// Failures reported by a [`crate::BackendClient`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend unreachable: {0}")]
    Transport(String),
    #[error("Backend responded with HTTP status {0}")]
    Status(u16),
    #[error("Malformed backend payload: {0}")]
    Decode(String),
    #[error("{0}")]
    Rejected(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Errors surfaced to callers of the sync controller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-correctable input problem; local state was not touched and no
    /// request was issued.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The backend rejected the mutation or could not be reached; the
    /// optimistic change has been rolled back.
    #[error("Sync failed for {action}: {message}")]
    Sync {
        action: MutationAction,
        message: String,
    },
}

impl CoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}
