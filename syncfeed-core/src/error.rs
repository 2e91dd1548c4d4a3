//! Core error types for `SyncFeed`.

use thiserror::Error;

/// Core error type for `SyncFeed` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation before any network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
