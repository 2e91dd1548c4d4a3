//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use syncfeed_core::models::Provider;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a completed or failed sync run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub provider: String,
    pub status: String,
    pub sync_progress: f32,
    pub product_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutput {
    pub fn from_provider(provider: &Provider, error: Option<String>) -> Self {
        Self {
            provider: provider.id.clone(),
            status: match error {
                Some(_) => "failed".to_string(),
                None => "completed".to_string(),
            },
            sync_progress: provider.sync_progress,
            product_count: provider.product_count,
            last_sync: provider.last_sync,
            error,
        }
    }
}

/// JSON output for a scrape run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutput {
    pub url: String,
    pub success: bool,
    pub message: String,
    pub product_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::models::ProviderKind;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        assert!(formatter.format(&data).unwrap().contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        assert!(!formatter.format(&data).unwrap().contains('\n'));
    }

    #[test]
    fn test_sync_output_status() {
        let provider = Provider::new("p1", "A", "https://a.example", ProviderKind::Api);
        let ok = SyncOutput::from_provider(&provider, None);
        assert_eq!(ok.status, "completed");

        let failed = SyncOutput::from_provider(&provider, Some("timeout".to_string()));
        assert_eq!(failed.status, "failed");
        assert_eq!(failed.error.as_deref(), Some("timeout"));
    }
}
