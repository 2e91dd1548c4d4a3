//! Sync executors.
//!
//! A sync run refreshes one provider's product data. The store drives a
//! [`SyncExecutor`] and observes progress over a watch channel; which
//! executor runs is a configuration choice ([`SyncMode`]), not a flag
//! buried in the call site.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use syncfeed_core::Provider;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::HttpClient;
use crate::error::FetchError;

/// Default tick interval for the simulated executor.
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

/// Largest progress step per simulated tick, in percent.
const MAX_STEP: f32 = 15.0;

// ============================================================================
// Sync Mode
// ============================================================================

/// Which executor implementation a store should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Timer-driven simulation, no network.
    #[default]
    Simulated,
    /// Real fetch of the provider endpoint.
    Real,
}

// ============================================================================
// Sync Report
// ============================================================================

/// Outcome of a completed sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Product count observed during the run; `None` leaves the stored
    /// count unchanged.
    pub product_count: Option<u64>,
    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}

// ============================================================================
// Executor Trait
// ============================================================================

/// Capability for refreshing one provider's data.
///
/// Implementations report progress in [0, 100] over `progress`; the final
/// value sent before returning `Ok` must be 100.
#[async_trait]
pub trait SyncExecutor: Send + Sync {
    /// Runs a sync for `provider`.
    async fn execute(
        &self,
        provider: &Provider,
        progress: watch::Sender<f32>,
    ) -> Result<SyncReport, FetchError>;
}

// ============================================================================
// Simulated Executor
// ============================================================================

/// Executor that simulates a progressive fetch with a repeating tick.
///
/// Progress advances from 0 toward 100 in bounded random increments.
/// Providers whose URL contains `"error"` fail partway through, mirroring
/// the demo scraping endpoint.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    tick: Duration,
}

impl SimulatedExecutor {
    /// Creates an executor with the default tick interval.
    pub fn new() -> Self {
        Self { tick: DEFAULT_TICK }
    }

    /// Overrides the tick interval (tests use a short one).
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncExecutor for SimulatedExecutor {
    async fn execute(
        &self,
        provider: &Provider,
        progress: watch::Sender<f32>,
    ) -> Result<SyncReport, FetchError> {
        debug!(provider = %provider.id, "Starting simulated sync");
        let fail = provider.url.to_lowercase().contains("error");
        let mut current: f32 = 0.0;
        let _ = progress.send(current);

        loop {
            tokio::time::sleep(self.tick).await;
            let step: f32 = rand::thread_rng().gen_range(1.0..MAX_STEP);
            current = (current + step).min(100.0);

            if fail && current >= 50.0 {
                // Leave progress at its last observed value.
                warn!(provider = %provider.id, progress = current, "Simulated sync failed");
                let _ = progress.send(current.min(99.0));
                return Err(FetchError::InvalidResponse(format!(
                    "endpoint {} is unreachable",
                    provider.url
                )));
            }

            let _ = progress.send(current);
            if current >= 100.0 {
                info!(provider = %provider.id, "Simulated sync completed");
                return Ok(SyncReport {
                    product_count: None,
                    completed_at: Utc::now(),
                });
            }
        }
    }
}

// ============================================================================
// HTTP Executor
// ============================================================================

/// Executor that fetches the provider endpoint for real.
///
/// Progress is coarse: request issued, body received, parsed. The product
/// count is taken from the response when it is a JSON array (or an object
/// with a `products` array).
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: HttpClient,
}

impl HttpExecutor {
    /// Creates an executor over the given HTTP client.
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn count_products(body: &Value) -> Option<u64> {
        match body {
            Value::Array(items) => Some(items.len() as u64),
            Value::Object(map) => map
                .get("products")
                .and_then(Value::as_array)
                .map(|items| items.len() as u64),
            _ => None,
        }
    }
}

#[async_trait]
impl SyncExecutor for HttpExecutor {
    async fn execute(
        &self,
        provider: &Provider,
        progress: watch::Sender<f32>,
    ) -> Result<SyncReport, FetchError> {
        info!(provider = %provider.id, url = %provider.url, "Starting sync fetch");
        let _ = progress.send(10.0);

        let response = self.client.get(&provider.url).await?;
        let _ = progress.send(60.0);

        let body: Value = response.json().await?;
        let product_count = Self::count_products(&body);
        let _ = progress.send(100.0);

        info!(provider = %provider.id, count = ?product_count, "Sync fetch completed");
        Ok(SyncReport {
            product_count,
            completed_at: Utc::now(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::ProviderKind;

    fn provider(url: &str) -> Provider {
        Provider::new("p1", "Test", url, ProviderKind::Api)
    }

    #[tokio::test]
    async fn test_simulated_sync_reaches_100() {
        let executor = SimulatedExecutor::new().with_tick(Duration::from_millis(1));
        let (tx, rx) = watch::channel(0.0f32);

        let report = executor
            .execute(&provider("https://ok.example/feed"), tx)
            .await
            .unwrap();

        assert_eq!(*rx.borrow(), 100.0);
        assert!(report.product_count.is_none());
    }

    #[tokio::test]
    async fn test_simulated_sync_progress_stays_bounded() {
        let executor = SimulatedExecutor::new().with_tick(Duration::from_millis(1));
        let (tx, mut rx) = watch::channel(0.0f32);

        let watcher = tokio::spawn(async move {
            let mut last = 0.0f32;
            while rx.changed().await.is_ok() {
                let value = *rx.borrow();
                assert!((0.0..=100.0).contains(&value), "progress {value} out of range");
                assert!(value >= last, "progress regressed from {last} to {value}");
                last = value;
            }
            last
        });

        executor
            .execute(&provider("https://ok.example/feed"), tx)
            .await
            .unwrap();
        let last = watcher.await.unwrap();
        assert_eq!(last, 100.0);
    }

    #[tokio::test]
    async fn test_simulated_sync_error_url_fails_midway() {
        let executor = SimulatedExecutor::new().with_tick(Duration::from_millis(1));
        let (tx, rx) = watch::channel(0.0f32);

        let result = executor
            .execute(&provider("https://error.example/feed"), tx)
            .await;

        assert!(result.is_err());
        assert!(*rx.borrow() < 100.0);
    }

    #[test]
    fn test_count_products_shapes() {
        let array = serde_json::json!([1, 2, 3]);
        assert_eq!(HttpExecutor::count_products(&array), Some(3));

        let wrapped = serde_json::json!({"products": [{}, {}]});
        assert_eq!(HttpExecutor::count_products(&wrapped), Some(2));

        let scalar = serde_json::json!(42);
        assert_eq!(HttpExecutor::count_products(&scalar), None);
    }
}
