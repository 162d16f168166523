//! The request/response contract with the remote backend.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use pundi_domain::{Category, NewCategory, NewTransaction, Profile, ProfileUpdate, Transaction};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

const UNKNOWN_REJECTION: &str = "Unknown error";

/// Abstraction over the remote service that owns the canonical records.
///
/// Implementations decode JSON payloads; any transport failure, non-2xx
/// status or undecodable body is reported as a [`BackendError`].
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn get_categories(&self) -> Result<Vec<Category>, BackendError>;
    async fn get_transactions(&self) -> Result<Vec<Transaction>, BackendError>;
    async fn get_profile(&self) -> Result<Profile, BackendError>;
    async fn submit(&self, mutation: &Mutation) -> Result<SubmitAck, BackendError>;
}

#[async_trait]
impl<T> BackendClient for Arc<T>
where
    T: BackendClient + ?Sized,
{
    async fn get_categories(&self) -> Result<Vec<Category>, BackendError> {
        (**self).get_categories().await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>, BackendError> {
        (**self).get_transactions().await
    }

    async fn get_profile(&self) -> Result<Profile, BackendError> {
        (**self).get_profile().await
    }

    async fn submit(&self, mutation: &Mutation) -> Result<SubmitAck, BackendError> {
        (**self).submit(mutation).await
    }
}

#[async_trait]
impl<T> BackendClient for Box<T>
where
    T: BackendClient + ?Sized,
{
    async fn get_categories(&self) -> Result<Vec<Category>, BackendError> {
        (**self).get_categories().await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>, BackendError> {
        (**self).get_transactions().await
    }

    async fn get_profile(&self) -> Result<Profile, BackendError> {
        (**self).get_profile().await
    }

    async fn submit(&self, mutation: &Mutation) -> Result<SubmitAck, BackendError> {
        (**self).submit(mutation).await
    }
}

/// Canonical mutation request body, tagged by its `action` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Mutation {
    SaveCategory { data: NewCategory },
    DeleteCategory { id: String },
    AddTransaction { data: NewTransaction },
    UpdateProfile { data: ProfileUpdate },
}

impl Mutation {
    pub fn action(&self) -> MutationAction {
        match self {
            Mutation::SaveCategory { .. } => MutationAction::SaveCategory,
            Mutation::DeleteCategory { .. } => MutationAction::DeleteCategory,
            Mutation::AddTransaction { .. } => MutationAction::AddTransaction,
            Mutation::UpdateProfile { .. } => MutationAction::UpdateProfile,
        }
    }
}

/// The four mutating actions the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationAction {
    SaveCategory,
    DeleteCategory,
    AddTransaction,
    UpdateProfile,
}

impl MutationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationAction::SaveCategory => "saveCategory",
            MutationAction::DeleteCategory => "deleteCategory",
            MutationAction::AddTransaction => "addTransaction",
            MutationAction::UpdateProfile => "updateProfile",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement returned by the backend for a submitted mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitAck {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Collapses a negative acknowledgement into [`BackendError::Rejected`].
    pub fn into_result(self) -> Result<(), BackendError> {
        if self.success {
            return Ok(());
        }
        let message = self
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_REJECTION.to_string());
        Err(BackendError::Rejected(message))
    }
}
