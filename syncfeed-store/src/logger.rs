//! Application logger.
//!
//! A bounded in-memory ring of [`LogEntry`] records with optional
//! best-effort mirroring to the remote gateway. Logging never fails:
//! persistence errors are downgraded to warnings on the tracing side and
//! the in-memory record is kept regardless.

use std::collections::VecDeque;
use std::sync::Arc;
use syncfeed_core::models::{LogCategory, LogEntry, LogLevel};
use syncfeed_fetch::{LogQuery, RemoteGateway};
use tokio::sync::RwLock;
use tracing::warn;

/// Default capacity of the in-memory ring.
pub const DEFAULT_MAX_MEMORY_LOGS: usize = 100;

/// Optional attribution fields attached to a log entry.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub context: Option<String>,
    pub category: Option<LogCategory>,
    pub user_id: Option<String>,
    pub provider_id: Option<String>,
}

impl LogOptions {
    pub fn category(category: LogCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

struct LoggerInner {
    buffer: VecDeque<LogEntry>,
    max_memory_logs: usize,
    persistence_enabled: bool,
}

/// Bounded application logger with optional remote persistence.
pub struct Logger {
    inner: Arc<RwLock<LoggerInner>>,
    gateway: Option<Arc<dyn RemoteGateway>>,
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            gateway: self.gateway.clone(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Creates an in-memory-only logger with the default capacity.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LoggerInner {
                buffer: VecDeque::new(),
                max_memory_logs: DEFAULT_MAX_MEMORY_LOGS,
                persistence_enabled: false,
            })),
            gateway: None,
        }
    }

    /// Attaches a remote gateway and enables persistence.
    pub fn with_gateway(mut self, gateway: Arc<dyn RemoteGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Records an informational entry.
    pub async fn info(&self, message: impl Into<String>, options: LogOptions) {
        self.append(LogLevel::Info, message.into(), options, None)
            .await;
    }

    /// Records a warning entry.
    pub async fn warn(&self, message: impl Into<String>, options: LogOptions) {
        self.append(LogLevel::Warn, message.into(), options, None)
            .await;
    }

    /// Records a debug entry.
    pub async fn debug(&self, message: impl Into<String>, options: LogOptions) {
        self.append(LogLevel::Debug, message.into(), options, None)
            .await;
    }

    /// Records an error entry, capturing the source error's debug form.
    pub async fn error(
        &self,
        message: impl Into<String>,
        source: Option<&dyn std::error::Error>,
        options: LogOptions,
    ) {
        let stack = source.map(|e| format!("{e:?}"));
        self.append(LogLevel::Error, message.into(), options, stack)
            .await;
    }

    /// Snapshot of the in-memory ring, oldest first.
    pub async fn get_logs(&self) -> Vec<LogEntry> {
        self.inner.read().await.buffer.iter().cloned().collect()
    }

    /// Queries persisted entries from the gateway.
    ///
    /// Returns an empty collection when no gateway is attached or the
    /// query fails; failures never propagate to callers.
    pub async fn get_persisted_logs(&self, query: &LogQuery) -> Vec<LogEntry> {
        let Some(gateway) = &self.gateway else {
            return Vec::new();
        };
        match gateway.query_logs(query).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to query persisted logs");
                Vec::new()
            }
        }
    }

    /// Enables or disables gateway persistence at runtime.
    pub async fn set_persistence(&self, enabled: bool) {
        self.inner.write().await.persistence_enabled = enabled;
    }

    /// Resizes the in-memory ring, evicting oldest entries immediately.
    pub async fn set_max_memory_logs(&self, max: usize) {
        let mut inner = self.inner.write().await;
        inner.max_memory_logs = max;
        while inner.buffer.len() > inner.max_memory_logs {
            inner.buffer.pop_front();
        }
    }

    async fn append(
        &self,
        level: LogLevel,
        message: String,
        options: LogOptions,
        stack: Option<String>,
    ) {
        let mut entry = LogEntry::new(level, message);
        entry.context = options.context;
        entry.category = options.category;
        entry.user_id = options.user_id;
        entry.provider_id = options.provider_id;
        entry.stack = stack;

        // Mirror to the process-level tracing subscriber.
        match level {
            LogLevel::Debug => tracing::debug!(target: "syncfeed", "{}", entry.message),
            LogLevel::Info => tracing::info!(target: "syncfeed", "{}", entry.message),
            LogLevel::Warn => tracing::warn!(target: "syncfeed", "{}", entry.message),
            LogLevel::Error => tracing::error!(target: "syncfeed", "{}", entry.message),
        }

        let persist = {
            let mut inner = self.inner.write().await;
            inner.buffer.push_back(entry.clone());
            while inner.buffer.len() > inner.max_memory_logs {
                inner.buffer.pop_front();
            }
            inner.persistence_enabled
        };

        if persist {
            if let Some(gateway) = &self.gateway {
                let gateway = Arc::clone(gateway);
                tokio::spawn(async move {
                    if let Err(e) = gateway.insert_log(&entry).await {
                        warn!(error = %e, "Failed to persist log entry");
                    }
                });
            }
        }
    }
}
