//! Log entry types for the application logger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Log Level
// ============================================================================

/// Severity level of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Routine events.
    Info,
    /// Recoverable anomalies.
    Warn,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Returns the display name for this level.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Log Category
// ============================================================================

/// Functional area a log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    /// General application events.
    System,
    /// Authentication and session events.
    Auth,
    /// Provider synchronization.
    Sync,
    /// Outbound API calls.
    Api,
    /// Scraping runs.
    Scraping,
    /// LLM configuration and validation.
    Llm,
}

impl LogCategory {
    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Auth => "auth",
            Self::Sync => "sync",
            Self::Api => "api",
            Self::Scraping => "scraping",
            Self::Llm => "llm",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Log Entry
// ============================================================================

/// A single log entry.
///
/// Entries live in a bounded in-memory buffer and are mirrored best-effort
/// to the remote gateway, where they are unbounded and queryable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Remote row id, assigned by the gateway when persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Severity level.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Free-form context string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Captured error detail for error-level entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Functional area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<LogCategory>,
    /// Acting user, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Related provider, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

impl LogEntry {
    /// Creates a new entry timestamped now.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: None,
            timestamp: Utc::now(),
            level,
            message: message.into(),
            context: None,
            stack: None,
            category: None,
            user_id: None,
            provider_id: None,
        }
    }
}
