//! Store error types.

use thiserror::Error;

/// Errors that can occur in the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before any mutation or network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A provider with this id already exists.
    #[error("Provider already exists: {0}")]
    ProviderExists(String),

    /// Provider not found.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// A sync attempt failed; the provider was moved to the error status.
    #[error("Sync failed: {0}")]
    SyncFailed(String),

    /// A sync run was replaced by a newer one before completing.
    #[error("Sync cancelled")]
    SyncCancelled,

    /// Credentials rejected by an external endpoint.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// External endpoint unreachable or misbehaving.
    #[error("Network error: {0}")]
    Network(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation timed out.
    #[error("Operation timed out")]
    Timeout,
}

impl From<syncfeed_core::CoreError> for StoreError {
    fn from(err: syncfeed_core::CoreError) -> Self {
        match err {
            syncfeed_core::CoreError::Validation(msg) => StoreError::Validation(msg),
            syncfeed_core::CoreError::ProviderNotFound(id) => StoreError::ProviderNotFound(id),
            other => StoreError::Validation(other.to_string()),
        }
    }
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Network(_) | StoreError::Timeout | StoreError::Io(_)
        )
    }
}
