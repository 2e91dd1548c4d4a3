//! Provider-related types.
//!
//! A provider is a configured external source of product data:
//! - [`ProviderKind`] - Integration method (API, scraping, XML/JSON feed)
//! - [`ProviderStatus`] - Lifecycle status driven by sync outcomes
//! - [`Provider`] - The provider record itself

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Provider Kind
// ============================================================================

/// Integration method for a provider, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Structured HTTP API.
    #[serde(rename = "API")]
    Api,
    /// LLM-assisted site scraping.
    Scraping,
    /// XML feed.
    #[serde(rename = "XML")]
    Xml,
    /// JSON feed.
    #[serde(rename = "JSON")]
    Json,
}

impl ProviderKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Scraping => "Scraping",
            Self::Xml => "XML",
            Self::Json => "JSON",
        }
    }

    /// Returns all provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Api, Self::Scraping, Self::Xml, Self::Json]
    }

    /// Parses a kind from its display name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Some(Self::Api),
            "scraping" => Some(Self::Scraping),
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Provider Status
// ============================================================================

/// Lifecycle status of a provider, set by sync outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    /// Last sync succeeded; the provider participates in the active partition.
    #[default]
    Active,
    /// Provider is configured but not currently serving data.
    Inactive,
    /// The last sync attempt failed.
    Error,
}

impl ProviderStatus {
    /// Returns the display name for this status.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Provider
// ============================================================================

/// A configured external source of product data.
///
/// The full provider set is the unit of persistence: it is serialized as
/// one collection and reconciled against the remote gateway on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// Non-empty display name.
    pub name: String,
    /// Absolute URL of the provider's feed/API/site endpoint.
    pub url: String,
    /// Integration method, fixed at creation.
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// Current lifecycle status.
    #[serde(default)]
    pub status: ProviderStatus,
    /// Timestamp of the last sync; `None` before the first sync.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Last known product count for this provider.
    #[serde(default)]
    pub product_count: u64,
    /// Percentage completion of the most recent or in-flight sync, in [0, 100].
    #[serde(default)]
    pub sync_progress: f32,
    /// Whether automatic periodic sync is enabled. The cadence is only
    /// displayed, never scheduled by this core.
    #[serde(default)]
    pub scheduled_sync: bool,
    /// Optional URL to a small logo image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Provider {
    /// Creates a new provider with defaults for the sync-derived fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        kind: ProviderKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            kind,
            status: ProviderStatus::Active,
            last_sync: None,
            product_count: 0,
            sync_progress: 0.0,
            scheduled_sync: false,
            logo: None,
        }
    }

    /// Validates the provider's intrinsic invariants.
    ///
    /// Checked before any mutation or network call: non-empty id and name,
    /// well-formed absolute URL, progress within [0, 100].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation("provider id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "provider name must not be empty".into(),
            ));
        }
        url::Url::parse(&self.url)
            .map_err(|e| CoreError::Validation(format!("invalid provider URL: {e}")))?;
        if !(0.0..=100.0).contains(&self.sync_progress) {
            return Err(CoreError::Validation(format!(
                "sync progress out of range: {}",
                self.sync_progress
            )));
        }
        Ok(())
    }

    /// Returns true if this provider belongs to the active partition.
    pub fn is_active(&self) -> bool {
        self.status == ProviderStatus::Active
    }

    /// Renders the last sync time, with "Never" as the pre-first-sync sentinel.
    pub fn last_sync_display(&self) -> String {
        match self.last_sync {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "Never".to_string(),
        }
    }
}

// ============================================================================
// Provider Update
// ============================================================================

/// A partial provider update: only set fields are merged in.
///
/// The `id` is deliberately absent; it can never change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New endpoint URL.
    pub url: Option<String>,
    /// New status.
    pub status: Option<ProviderStatus>,
    /// New last-sync timestamp.
    pub last_sync: Option<DateTime<Utc>>,
    /// New product count.
    pub product_count: Option<u64>,
    /// New sync progress.
    pub sync_progress: Option<f32>,
    /// New scheduled-sync flag.
    pub scheduled_sync: Option<bool>,
    /// New logo URL.
    pub logo: Option<String>,
}

impl ProviderUpdate {
    /// Applies this update to a provider, last write wins per field.
    pub fn apply_to(&self, provider: &mut Provider) {
        if let Some(name) = &self.name {
            provider.name = name.clone();
        }
        if let Some(url) = &self.url {
            provider.url = url.clone();
        }
        if let Some(status) = self.status {
            provider.status = status;
        }
        if let Some(last_sync) = self.last_sync {
            provider.last_sync = Some(last_sync);
        }
        if let Some(count) = self.product_count {
            provider.product_count = count;
        }
        if let Some(progress) = self.sync_progress {
            provider.sync_progress = progress.clamp(0.0, 100.0);
        }
        if let Some(scheduled) = self.scheduled_sync {
            provider.scheduled_sync = scheduled;
        }
        if let Some(logo) = &self.logo {
            provider.logo = Some(logo.clone());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in ProviderKind::all() {
            assert_eq!(ProviderKind::parse(kind.display_name()), Some(*kind));
        }
        assert_eq!(ProviderKind::parse("csv"), None);
    }

    #[test]
    fn test_kind_wire_strings() {
        let json = serde_json::to_string(&ProviderKind::Api).unwrap();
        assert_eq!(json, "\"API\"");
        let json = serde_json::to_string(&ProviderKind::Scraping).unwrap();
        assert_eq!(json, "\"Scraping\"");
    }

    #[test]
    fn test_status_wire_strings() {
        let json = serde_json::to_string(&ProviderStatus::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut p = Provider::new("p1", "Acme", "https://acme.test/feed", ProviderKind::Xml);
        assert!(p.validate().is_ok());
        p.name = "  ".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let p = Provider::new("p1", "Acme", "/feed.xml", ProviderKind::Xml);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_update_does_not_clobber() {
        let mut p = Provider::new("p1", "Acme", "https://acme.test/feed", ProviderKind::Api);
        p.product_count = 42;

        let update = ProviderUpdate {
            name: Some("Acme Corp".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut p);

        assert_eq!(p.name, "Acme Corp");
        assert_eq!(p.product_count, 42);
        assert_eq!(p.url, "https://acme.test/feed");
    }

    #[test]
    fn test_update_clamps_progress() {
        let mut p = Provider::new("p1", "Acme", "https://acme.test/feed", ProviderKind::Api);
        let update = ProviderUpdate {
            sync_progress: Some(140.0),
            ..Default::default()
        };
        update.apply_to(&mut p);
        assert_eq!(p.sync_progress, 100.0);
    }

    #[test]
    fn test_last_sync_sentinel() {
        let p = Provider::new("p1", "Acme", "https://acme.test/feed", ProviderKind::Api);
        assert_eq!(p.last_sync_display(), "Never");
    }
}
