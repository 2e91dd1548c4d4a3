//! File persistence helpers.
//!
//! Local storage is a pair of JSON documents under the platform config
//! directory: the full provider collection and the LLM configuration.
//! Writes are atomic (temp file + rename) and files carry restrictive
//! permissions on Unix because the LLM document holds an API key.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/SyncFeed`
/// - Linux: `~/.config/syncfeed`
/// - Windows: `%APPDATA%\SyncFeed`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("SyncFeed"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("syncfeed"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default path of the provider collection document.
pub fn default_providers_path() -> PathBuf {
    default_config_dir().join("providers.json")
}

/// Returns the default path of the LLM configuration document.
pub fn default_llm_config_path() -> PathBuf {
    default_config_dir().join("llm_config.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Saves data to a JSON file with secure permissions.
///
/// Creates parent directories if they don't exist and writes atomically
/// (temp file + rename).
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    tokio::fs::rename(&temp_path, path).await?;

    set_restrictive_permissions(path).await?;
    Ok(())
}

/// Saves plain text atomically (temp file + rename).
pub async fn save_text(path: &Path, content: &str) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving text file");

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, content).await?;
    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::{Provider, ProviderKind};

    #[test]
    fn test_default_paths() {
        assert!(default_providers_path().ends_with("providers.json"));
        assert!(default_llm_config_path().ends_with("llm_config.json"));
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("providers.json");

        let providers = vec![Provider::new(
            "p1",
            "Acme",
            "https://acme.test/feed",
            ProviderKind::Xml,
        )];
        save_json(&path, &providers).await.unwrap();

        let loaded: Vec<Provider> = load_json(&path).await.unwrap();
        assert_eq!(loaded, providers);
    }

    #[tokio::test]
    async fn test_load_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_json::<Vec<Provider>>(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        save_json(&path, &serde_json::json!({"k": "v"})).await.unwrap();

        let metadata = tokio::fs::metadata(&path).await.unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }
}
