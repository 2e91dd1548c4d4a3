//! Fetch error types.

use thiserror::Error;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limited by the remote endpoint.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: Option<u64>,
    },

    /// Credentials rejected by the remote endpoint.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Missing or unusable configuration for the call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected response from the remote endpoint.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Remote gateway rejected or failed the operation.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Sync run was cancelled before completion.
    #[error("Sync cancelled")]
    Cancelled,

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] syncfeed_core::CoreError),
}

impl FetchError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Http(_) | FetchError::Timeout(_) | FetchError::RateLimited { .. }
        )
    }
}
