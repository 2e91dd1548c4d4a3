//! Remote data gateway.
//!
//! The hosted backend exposes `providers` and `logs` tables over a
//! PostgREST-style REST interface. Everything above this module talks to the
//! [`RemoteGateway`] trait so the hosted service stays an external
//! collaborator: [`RestGateway`] is the real client, [`MemoryGateway`] is the
//! in-process double used by tests and offline runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use syncfeed_core::{LogCategory, LogEntry, LogLevel, Provider};
use tracing::debug;

use crate::client::HttpClient;
use crate::error::FetchError;

/// Default number of rows returned by a log query.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// `Prefer` header value that turns a POST into a merge on primary-key
/// conflict instead of a 409.
const MERGE_DUPLICATES: (&str, &str) = ("Prefer", "resolution=merge-duplicates");

// ============================================================================
// Log Query
// ============================================================================

/// Filter for querying persisted log entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    /// Maximum rows to return; defaults to [`DEFAULT_LOG_LIMIT`].
    pub limit: Option<usize>,
    /// Only entries at this level.
    pub level: Option<LogLevel>,
    /// Only entries in this category.
    pub category: Option<LogCategory>,
    /// Only entries for this user.
    pub user_id: Option<String>,
    /// Only entries for this provider.
    pub provider_id: Option<String>,
    /// Only entries at or after this time.
    pub from_date: Option<DateTime<Utc>>,
    /// Only entries at or before this time.
    pub to_date: Option<DateTime<Utc>>,
}

impl LogQuery {
    /// Effective row limit for this query.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LOG_LIMIT)
    }

    /// Returns true when `entry` satisfies every set filter.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if self.level.is_some_and(|level| entry.level != level) {
            return false;
        }
        if self
            .category
            .is_some_and(|category| entry.category != Some(category))
        {
            return false;
        }
        if self
            .user_id
            .as_deref()
            .is_some_and(|user_id| entry.user_id.as_deref() != Some(user_id))
        {
            return false;
        }
        if self
            .provider_id
            .as_deref()
            .is_some_and(|provider_id| entry.provider_id.as_deref() != Some(provider_id))
        {
            return false;
        }
        if self.from_date.is_some_and(|from| entry.timestamp < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| entry.timestamp > to) {
            return false;
        }
        true
    }
}

// ============================================================================
// Gateway Trait
// ============================================================================

/// Client-side view of the hosted data service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetches the full provider collection.
    async fn fetch_providers(&self) -> Result<Vec<Provider>, FetchError>;

    /// Inserts or replaces one provider row.
    async fn upsert_provider(&self, provider: &Provider) -> Result<(), FetchError>;

    /// Deletes a provider row; deleting an absent row is not an error.
    async fn delete_provider(&self, id: &str) -> Result<(), FetchError>;

    /// Appends one log entry.
    async fn insert_log(&self, entry: &LogEntry) -> Result<(), FetchError>;

    /// Queries persisted log entries, newest first.
    async fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, FetchError>;
}

// ============================================================================
// REST Gateway
// ============================================================================

/// REST client for the hosted gateway.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl RestGateway {
    /// Creates a gateway client for the given REST base URL and bearer key.
    pub fn new(client: HttpClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    fn upsert_url(&self, table: &str) -> String {
        format!("{}?on_conflict=id", self.table_url(table))
    }

    fn log_query_url(&self, query: &LogQuery) -> String {
        let mut params = vec![
            "order=timestamp.desc".to_string(),
            format!("limit={}", query.effective_limit()),
        ];
        if let Some(level) = query.level {
            params.push(format!("level=eq.{level}"));
        }
        if let Some(category) = query.category {
            params.push(format!("category=eq.{category}"));
        }
        if let Some(user_id) = &query.user_id {
            params.push(format!("user_id=eq.{}", encode(user_id)));
        }
        if let Some(provider_id) = &query.provider_id {
            params.push(format!("provider_id=eq.{}", encode(provider_id)));
        }
        if let Some(from) = query.from_date {
            params.push(format!("timestamp=gte.{}", encode(&from.to_rfc3339())));
        }
        if let Some(to) = query.to_date {
            params.push(format!("timestamp=lte.{}", encode(&to.to_rfc3339())));
        }
        format!("{}?{}", self.table_url("logs"), params.join("&"))
    }
}

/// Percent-encodes a caller-supplied value for use in a query string.
fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[async_trait]
impl RemoteGateway for RestGateway {
    async fn fetch_providers(&self) -> Result<Vec<Provider>, FetchError> {
        let url = format!("{}?select=*&order=id.asc", self.table_url("providers"));
        debug!(url = %url, "Fetching providers from gateway");
        let response = self.client.get_with_auth(&url, &self.api_key).await?;
        Ok(response.json().await?)
    }

    async fn upsert_provider(&self, provider: &Provider) -> Result<(), FetchError> {
        let url = self.upsert_url("providers");
        self.client
            .post_json_with_auth_headers(&url, &self.api_key, &[MERGE_DUPLICATES], provider)
            .await?;
        Ok(())
    }

    async fn delete_provider(&self, id: &str) -> Result<(), FetchError> {
        let url = format!("{}?id=eq.{id}", self.table_url("providers"));
        self.client.delete_with_auth(&url, &self.api_key).await?;
        Ok(())
    }

    async fn insert_log(&self, entry: &LogEntry) -> Result<(), FetchError> {
        let url = self.table_url("logs");
        self.client
            .post_json_with_auth(&url, &self.api_key, entry)
            .await?;
        Ok(())
    }

    async fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, FetchError> {
        let url = self.log_query_url(query);
        debug!(url = %url, "Querying persisted logs");
        let response = self.client.get_with_auth(&url, &self.api_key).await?;
        Ok(response.json().await?)
    }
}

// ============================================================================
// In-Memory Gateway
// ============================================================================

/// In-process gateway double used by tests and offline runs.
///
/// Set `fail` to make every operation return a gateway error, for
/// exercising failure paths.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    providers: Mutex<Vec<Provider>>,
    logs: Mutex<Vec<LogEntry>>,
    next_log_id: AtomicU64,
    fail: AtomicBool,
}

impl MemoryGateway {
    /// Creates an empty in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with provider rows.
    pub fn with_providers(providers: Vec<Provider>) -> Self {
        Self {
            providers: Mutex::new(providers),
            ..Self::default()
        }
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of persisted log rows.
    pub fn log_count(&self) -> usize {
        self.logs.lock().unwrap().len()
    }

    /// Snapshot of the provider table.
    pub fn provider_rows(&self) -> Vec<Provider> {
        self.providers.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), FetchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Gateway("simulated gateway outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for MemoryGateway {
    async fn fetch_providers(&self) -> Result<Vec<Provider>, FetchError> {
        self.check()?;
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn upsert_provider(&self, provider: &Provider) -> Result<(), FetchError> {
        self.check()?;
        let mut rows = self.providers.lock().unwrap();
        match rows.iter_mut().find(|p| p.id == provider.id) {
            Some(row) => *row = provider.clone(),
            None => rows.push(provider.clone()),
        }
        Ok(())
    }

    async fn delete_provider(&self, id: &str) -> Result<(), FetchError> {
        self.check()?;
        self.providers.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn insert_log(&self, entry: &LogEntry) -> Result<(), FetchError> {
        self.check()?;
        let mut entry = entry.clone();
        let id = self.next_log_id.fetch_add(1, Ordering::SeqCst);
        entry.id = Some(format!("log-{id}"));
        self.logs.lock().unwrap().push(entry);
        Ok(())
    }

    async fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, FetchError> {
        self.check()?;
        let logs = self.logs.lock().unwrap();
        let mut matched: Vec<LogEntry> = logs.iter().filter(|e| query.matches(e)).cloned().collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched.truncate(query.effective_limit());
        Ok(matched)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::ProviderKind;

    fn provider(id: &str) -> Provider {
        Provider::new(id, "Test", "https://example.test/feed", ProviderKind::Api)
    }

    #[tokio::test]
    async fn test_memory_gateway_upsert_replaces() {
        let gateway = MemoryGateway::new();
        gateway.upsert_provider(&provider("p1")).await.unwrap();

        let mut updated = provider("p1");
        updated.product_count = 7;
        gateway.upsert_provider(&updated).await.unwrap();

        let rows = gateway.fetch_providers().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_count, 7);
    }

    #[tokio::test]
    async fn test_memory_gateway_delete_absent_is_ok() {
        let gateway = MemoryGateway::new();
        assert!(gateway.delete_provider("nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_gateway_fail_flag() {
        let gateway = MemoryGateway::new();
        gateway.set_fail(true);
        assert!(gateway.fetch_providers().await.is_err());
        gateway.set_fail(false);
        assert!(gateway.fetch_providers().await.is_ok());
    }

    #[tokio::test]
    async fn test_log_query_filters_and_orders_newest_first() {
        let gateway = MemoryGateway::new();
        for i in 0..5 {
            let mut entry = LogEntry::new(LogLevel::Info, format!("entry {i}"));
            entry.timestamp = Utc::now() - chrono::Duration::minutes(i);
            entry.provider_id = Some(if i % 2 == 0 { "p1" } else { "p2" }.to_string());
            gateway.insert_log(&entry).await.unwrap();
        }

        let query = LogQuery {
            provider_id: Some("p1".to_string()),
            ..Default::default()
        };
        let logs = gateway.query_logs(&query).await.unwrap();
        assert_eq!(logs.len(), 3);
        assert!(logs.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_log_query_limit() {
        let gateway = MemoryGateway::new();
        for i in 0..10 {
            gateway
                .insert_log(&LogEntry::new(LogLevel::Debug, format!("e{i}")))
                .await
                .unwrap();
        }
        let query = LogQuery {
            limit: Some(4),
            ..Default::default()
        };
        assert_eq!(gateway.query_logs(&query).await.unwrap().len(), 4);
    }

    #[test]
    fn test_rest_gateway_log_query_url() {
        let gateway = RestGateway::new(HttpClient::default(), "https://gw.test/rest/v1/", "key");
        let query = LogQuery {
            level: Some(LogLevel::Error),
            provider_id: Some("p1".to_string()),
            ..Default::default()
        };
        let url = gateway.log_query_url(&query);
        assert!(url.starts_with("https://gw.test/rest/v1/logs?"));
        assert!(url.contains("order=timestamp.desc"));
        assert!(url.contains("limit=100"));
        assert!(url.contains("level=eq.error"));
        assert!(url.contains("provider_id=eq.p1"));
    }

    #[test]
    fn test_rest_gateway_upsert_request_shape() {
        let gateway = RestGateway::new(HttpClient::default(), "https://gw.test/rest/v1", "key");
        assert_eq!(
            gateway.upsert_url("providers"),
            "https://gw.test/rest/v1/providers?on_conflict=id"
        );
        assert_eq!(MERGE_DUPLICATES, ("Prefer", "resolution=merge-duplicates"));
    }

    #[test]
    fn test_rest_gateway_log_query_encodes_filter_values() {
        let gateway = RestGateway::new(HttpClient::default(), "https://gw.test/rest/v1", "key");
        let query = LogQuery {
            provider_id: Some("a&b=c".to_string()),
            user_id: Some("user one".to_string()),
            ..Default::default()
        };
        let url = gateway.log_query_url(&query);
        assert!(url.contains("provider_id=eq.a%26b%3Dc"));
        assert!(url.contains("user_id=eq.user+one"));
        assert!(!url.contains("a&b"));
    }
}
