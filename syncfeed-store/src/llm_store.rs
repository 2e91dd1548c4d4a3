//! LLM configuration store.
//!
//! Holds the active text-generation configuration, validates credentials
//! against the vendor before accepting a new one, and persists the accepted
//! configuration as a local JSON document. A rejected configuration leaves
//! both memory and disk untouched.

use std::path::PathBuf;
use std::sync::Arc;
use syncfeed_core::LlmConfig;
use syncfeed_fetch::{FetchError, HttpClient, validate_credentials};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// Store for the active LLM configuration.
pub struct LlmConfigStore {
    path: PathBuf,
    client: HttpClient,
    current: Arc<RwLock<Option<LlmConfig>>>,
}

impl Clone for LlmConfigStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            client: self.client.clone(),
            current: Arc::clone(&self.current),
        }
    }
}

impl LlmConfigStore {
    pub fn new(client: HttpClient, path: PathBuf) -> Self {
        Self {
            path,
            client,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Validates and activates a new configuration.
    ///
    /// Structural validation runs first and never touches the network.
    /// Credential validation then issues an authenticated request to the
    /// vendor's model-listing endpoint. Only a configuration that passes
    /// both is persisted and made current.
    pub async fn configure(&self, config: LlmConfig) -> Result<(), StoreError> {
        config
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        match validate_credentials(&self.client, &config).await {
            Ok(()) => {}
            Err(FetchError::AuthenticationFailed(msg)) => {
                return Err(StoreError::Auth(msg));
            }
            Err(e) if e.is_transient() => {
                return Err(StoreError::Network(format!(
                    "could not reach {}: {e}",
                    config.vendor.display_name()
                )));
            }
            Err(e) => return Err(StoreError::Validation(e.to_string())),
        }

        save_json(&self.path, &config).await?;
        *self.current.write().await = Some(config.clone());
        info!(vendor = %config.vendor, model = %config.model, "LLM configuration updated");
        Ok(())
    }

    /// Returns the active configuration.
    ///
    /// Resolution order: in-memory value, then the local document, then the
    /// built-in default when no document exists. A corrupt document yields
    /// `None` rather than a guess.
    pub async fn get_current(&self) -> Option<LlmConfig> {
        if let Some(config) = self.current.read().await.clone() {
            return Some(config);
        }

        let loaded = match load_json::<LlmConfig>(&self.path).await {
            Ok(config) => Some(config),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Some(LlmConfig::default())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "LLM config document unreadable");
                None
            }
        };

        if let Some(config) = &loaded {
            *self.current.write().await = Some(config.clone());
        }
        loaded
    }

    /// Clears the active configuration and removes the local document.
    pub async fn reset(&self) -> Result<(), StoreError> {
        *self.current.write().await = None;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::LlmVendor;

    fn store_at(dir: &tempfile::TempDir) -> LlmConfigStore {
        LlmConfigStore::new(HttpClient::new().unwrap(), dir.path().join("llm_config.json"))
    }

    #[tokio::test]
    async fn test_default_when_no_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir);

        let config = store.get_current().await.unwrap();
        assert_eq!(config.vendor, LlmVendor::DeepSeek);
        assert_eq!(config.model, "deepseek-coder");
        assert_eq!(config.max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_corrupt_document_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm_config.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = LlmConfigStore::new(HttpClient::new().unwrap(), path);
        assert!(store.get_current().await.is_none());
    }

    #[tokio::test]
    async fn test_document_loaded_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm_config.json");
        let mut config = LlmConfig::default();
        config.model = "deepseek-chat".to_string();
        save_json(&path, &config).await.unwrap();

        let store = LlmConfigStore::new(HttpClient::new().unwrap(), path);
        assert_eq!(store.get_current().await.unwrap().model, "deepseek-chat");
    }

    #[tokio::test]
    async fn test_configure_rejects_short_key_without_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir);

        let mut config = LlmConfig::default();
        config.api_key = "too-short".to_string();
        let err = store.configure(config).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!dir.path().join("llm_config.json").exists());
        // The prior (default) configuration is still served.
        assert_eq!(store.get_current().await.unwrap(), LlmConfig::default());
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir);
        store.reset().await.unwrap();
        store.reset().await.unwrap();
    }
}
