//! Provider state store.
//!
//! The central client-side entity cache for providers. The store is the
//! sole writer of the collection; readers get cloned snapshots and can
//! subscribe to a watch channel for change notification.
//!
//! Persistence model: every mutation serializes the full collection to the
//! local JSON document before returning. The remote gateway is written
//! through best-effort (failures are logged, local state stays the source
//! of truth) and [`ProviderStore::hydrate`] authoritatively overwrites the
//! in-memory collection with the gateway rows.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use syncfeed_core::{Provider, ProviderKind, ProviderStatus, ProviderUpdate};
use syncfeed_fetch::{RemoteGateway, SyncExecutor, SyncReport};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// Upper bound on one sync run, simulated or real.
const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(60);

/// Seed collection used when no local document exists yet.
///
/// Mirrors the demo data the dashboard ships with.
pub fn seed_providers() -> Vec<Provider> {
    let mut a = Provider::new(
        "p1",
        "Provider A",
        "https://provider-a.example/api",
        ProviderKind::Api,
    );
    a.product_count = 743;
    a.sync_progress = 100.0;

    let mut b = Provider::new(
        "p2",
        "Provider B",
        "https://provider-b.example/feed.xml",
        ProviderKind::Xml,
    );
    b.status = ProviderStatus::Error;
    b.product_count = 128;
    b.sync_progress = 65.0;

    let mut c = Provider::new(
        "p3",
        "Provider C",
        "https://provider-c.example/products",
        ProviderKind::Scraping,
    );
    c.product_count = 377;
    c.sync_progress = 100.0;

    vec![a, b, c]
}

// ============================================================================
// Inner State
// ============================================================================

struct Inner {
    /// Insertion-ordered provider collection.
    providers: Vec<Provider>,
    /// True while a gateway hydration is in flight.
    loading: bool,
    /// Human-readable gateway load failure, if any.
    load_error: Option<String>,
    /// Generation of the current sync run per provider. A run only applies
    /// progress or completion while its generation is still current, which
    /// guarantees at-most-one completion when a sync is replaced.
    current_syncs: HashMap<String, u64>,
    next_sync_generation: u64,
}

// ============================================================================
// Provider Store
// ============================================================================

/// Central state store for the provider collection.
pub struct ProviderStore {
    inner: Arc<RwLock<Inner>>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
    executor: Arc<dyn SyncExecutor>,
    gateway: Option<Arc<dyn RemoteGateway>>,
    persist_path: Option<PathBuf>,
    sync_timeout: Duration,
    abort_handles: Arc<Mutex<HashMap<String, AbortHandle>>>,
}

impl Clone for ProviderStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            notify: self.notify.clone(),
            version: Arc::clone(&self.version),
            executor: Arc::clone(&self.executor),
            gateway: self.gateway.clone(),
            persist_path: self.persist_path.clone(),
            sync_timeout: self.sync_timeout,
            abort_handles: Arc::clone(&self.abort_handles),
        }
    }
}

impl ProviderStore {
    /// Creates a store seeded with the default demo collection.
    pub fn new(executor: Arc<dyn SyncExecutor>) -> Self {
        Self::with_providers(executor, seed_providers())
    }

    /// Creates a store with an explicit initial collection.
    pub fn with_providers(executor: Arc<dyn SyncExecutor>, providers: Vec<Provider>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                providers,
                loading: false,
                load_error: None,
                current_syncs: HashMap::new(),
                next_sync_generation: 0,
            })),
            notify,
            version: Arc::new(RwLock::new(0)),
            executor,
            gateway: None,
            persist_path: None,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            abort_handles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Enables local persistence at `path`.
    pub fn with_persist_path(mut self, path: PathBuf) -> Self {
        self.persist_path = Some(path);
        self
    }

    /// Attaches a remote gateway for hydration and write-through.
    pub fn with_gateway(mut self, gateway: Arc<dyn RemoteGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Overrides the per-run sync timeout.
    pub fn with_sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    /// Replaces the collection with the local document, if one exists.
    ///
    /// Called once at startup; a missing or unreadable document leaves the
    /// seed collection in place and persists it.
    pub async fn load_local(&self) -> Result<(), StoreError> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        match load_json::<Vec<Provider>>(path).await {
            Ok(providers) => {
                info!(count = providers.len(), "Loaded providers from local storage");
                self.inner.write().await.providers = providers;
                self.notify_change().await;
            }
            Err(StoreError::Io(_)) => {
                // First run: persist the seed so the document exists.
                self.persist().await;
            }
            Err(e) => {
                warn!(error = %e, "Local provider document is unreadable, keeping seed");
            }
        }
        Ok(())
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// Returns the provider collection in insertion order.
    pub async fn list(&self) -> Vec<Provider> {
        self.inner.read().await.providers.clone()
    }

    /// Returns providers with `status == active`.
    pub async fn list_active(&self) -> Vec<Provider> {
        self.inner
            .read()
            .await
            .providers
            .iter()
            .filter(|p| p.is_active())
            .cloned()
            .collect()
    }

    /// Returns providers with any other status.
    pub async fn list_inactive(&self) -> Vec<Provider> {
        self.inner
            .read()
            .await
            .providers
            .iter()
            .filter(|p| !p.is_active())
            .cloned()
            .collect()
    }

    /// Returns one provider by id.
    pub async fn get(&self, id: &str) -> Option<Provider> {
        self.inner
            .read()
            .await
            .providers
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// True while a gateway hydration is in flight.
    pub async fn loading(&self) -> bool {
        self.inner.read().await.loading
    }

    /// The last gateway load failure, if any.
    pub async fn load_error(&self) -> Option<String> {
        self.inner.read().await.load_error.clone()
    }

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Appends a fully-formed provider.
    ///
    /// Fails with a validation error when the id already exists or the
    /// provider's intrinsic invariants don't hold.
    pub async fn add(&self, provider: Provider) -> Result<(), StoreError> {
        provider.validate()?;
        {
            let mut inner = self.inner.write().await;
            if inner.providers.iter().any(|p| p.id == provider.id) {
                return Err(StoreError::ProviderExists(provider.id));
            }
            inner.providers.push(provider.clone());
        }
        self.persist().await;
        self.write_through(&provider).await;
        self.notify_change().await;
        info!(provider = %provider.id, "Provider added");
        Ok(())
    }

    /// Merges a partial update into the matching provider.
    ///
    /// The id itself can never change. Fails with `ProviderNotFound` when
    /// the id is absent.
    pub async fn update(&self, id: &str, update: ProviderUpdate) -> Result<(), StoreError> {
        let updated = {
            let mut inner = self.inner.write().await;
            let provider = inner
                .providers
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| StoreError::ProviderNotFound(id.to_string()))?;

            let mut merged = provider.clone();
            update.apply_to(&mut merged);
            merged.validate()?;
            *provider = merged.clone();
            merged
        };
        self.persist().await;
        self.write_through(&updated).await;
        self.notify_change().await;
        Ok(())
    }

    /// Deletes a provider. Removing an absent id is a no-op.
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let removed = {
            let mut inner = self.inner.write().await;
            let before = inner.providers.len();
            inner.providers.retain(|p| p.id != id);
            inner.current_syncs.remove(id);
            inner.providers.len() != before
        };
        if removed {
            if let Some(handle) = self.abort_handles.lock().await.remove(id) {
                handle.abort();
            }
            self.persist().await;
            if let Some(gateway) = &self.gateway {
                if let Err(e) = gateway.delete_provider(id).await {
                    warn!(provider = %id, error = %e, "Gateway delete failed");
                }
            }
            self.notify_change().await;
            info!(provider = %id, "Provider removed");
        }
        Ok(())
    }

    /// Flips the scheduled-sync flag. No scheduler runs in this core.
    pub async fn toggle_scheduled_sync(&self, id: &str) -> Result<bool, StoreError> {
        let (enabled, updated) = {
            let mut inner = self.inner.write().await;
            let provider = inner
                .providers
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| StoreError::ProviderNotFound(id.to_string()))?;
            provider.scheduled_sync = !provider.scheduled_sync;
            (provider.scheduled_sync, provider.clone())
        };
        self.persist().await;
        self.write_through(&updated).await;
        self.notify_change().await;
        Ok(enabled)
    }

    // ========================================================================
    // Gateway Hydration
    // ========================================================================

    /// Loads the collection from the remote gateway.
    ///
    /// On success the gateway rows authoritatively overwrite the in-memory
    /// collection and are re-persisted locally. On failure `load_error` is
    /// set and the prior snapshot is retained; nothing is thrown past the
    /// store boundary.
    pub async fn hydrate(&self) {
        let Some(gateway) = &self.gateway else {
            return;
        };
        {
            let mut inner = self.inner.write().await;
            inner.loading = true;
            inner.load_error = None;
        }
        self.notify_change().await;

        match gateway.fetch_providers().await {
            Ok(providers) => {
                info!(count = providers.len(), "Hydrated providers from gateway");
                {
                    let mut inner = self.inner.write().await;
                    inner.providers = providers;
                    inner.loading = false;
                }
                self.persist().await;
            }
            Err(e) => {
                warn!(error = %e, "Gateway hydration failed");
                let mut inner = self.inner.write().await;
                inner.loading = false;
                inner.load_error = Some(format!("Failed to load providers: {e}"));
            }
        }
        self.notify_change().await;
    }

    // ========================================================================
    // Sync
    // ========================================================================

    /// Runs a sync for the given provider.
    ///
    /// Progress is observable through [`ProviderStore::list`] /
    /// [`ProviderStore::subscribe`] while the run is in flight. Completion
    /// sets `status = active`, `sync_progress = 100` and `last_sync`;
    /// failure sets `status = error` and leaves the progress at its last
    /// observed value. Starting a new sync for a provider with one already
    /// in flight cancels and replaces the prior run, so exactly one
    /// completion is ever observed per provider.
    pub async fn sync(&self, id: &str) -> Result<(), StoreError> {
        let provider = self
            .get(id)
            .await
            .ok_or_else(|| StoreError::ProviderNotFound(id.to_string()))?;

        // Replace any in-flight run before touching provider state.
        let generation = {
            let mut inner = self.inner.write().await;
            inner.next_sync_generation += 1;
            let generation = inner.next_sync_generation;
            inner.current_syncs.insert(id.to_string(), generation);
            generation
        };
        if let Some(handle) = self.abort_handles.lock().await.remove(id) {
            debug!(provider = %id, "Replacing in-flight sync");
            handle.abort();
        }

        self.apply_progress(id, generation, 0.0).await;

        let (progress_tx, mut progress_rx) = watch::channel(0.0f32);
        let forwarder = {
            let store = self.clone();
            let provider_id = id.to_string();
            tokio::spawn(async move {
                while progress_rx.changed().await.is_ok() {
                    let value = *progress_rx.borrow();
                    store.apply_progress(&provider_id, generation, value).await;
                }
            })
        };

        let executor = Arc::clone(&self.executor);
        let timeout = self.sync_timeout;
        let run = tokio::spawn(async move {
            tokio::time::timeout(timeout, executor.execute(&provider, progress_tx)).await
        });
        self.abort_handles
            .lock()
            .await
            .insert(id.to_string(), run.abort_handle());

        let joined = run.await;
        let _ = forwarder.await;

        let still_current = {
            let mut inner = self.inner.write().await;
            if inner.current_syncs.get(id) == Some(&generation) {
                inner.current_syncs.remove(id);
                true
            } else {
                false
            }
        };
        if still_current {
            self.abort_handles.lock().await.remove(id);
        }

        match joined {
            // Aborted by a replacing sync (or shutdown).
            Err(_) => Err(StoreError::SyncCancelled),
            Ok(Err(_elapsed)) => {
                if still_current {
                    self.finish_with_error(id, "sync timed out").await;
                }
                Err(StoreError::Timeout)
            }
            Ok(Ok(Err(e))) => {
                if still_current {
                    self.finish_with_error(id, &e.to_string()).await;
                }
                Err(StoreError::SyncFailed(e.to_string()))
            }
            Ok(Ok(Ok(report))) => {
                if !still_current {
                    return Err(StoreError::SyncCancelled);
                }
                self.finish_with_success(id, &report).await;
                Ok(())
            }
        }
    }

    /// True while a sync run is in flight for this provider.
    pub async fn is_syncing(&self, id: &str) -> bool {
        self.inner.read().await.current_syncs.contains_key(id)
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Applies a progress value when `generation` is still the current run.
    async fn apply_progress(&self, id: &str, generation: u64, value: f32) {
        {
            let mut inner = self.inner.write().await;
            if inner.current_syncs.get(id) != Some(&generation) {
                return;
            }
            if let Some(provider) = inner.providers.iter_mut().find(|p| p.id == id) {
                provider.sync_progress = value.clamp(0.0, 100.0);
            }
        }
        self.persist().await;
        self.notify_change().await;
    }

    async fn finish_with_success(&self, id: &str, report: &SyncReport) {
        let updated = {
            let mut inner = self.inner.write().await;
            let Some(provider) = inner.providers.iter_mut().find(|p| p.id == id) else {
                return;
            };
            provider.status = ProviderStatus::Active;
            provider.sync_progress = 100.0;
            provider.last_sync = Some(report.completed_at);
            if let Some(count) = report.product_count {
                provider.product_count = count;
            }
            provider.clone()
        };
        self.persist().await;
        self.write_through(&updated).await;
        self.notify_change().await;
        info!(provider = %id, "Sync completed");
    }

    async fn finish_with_error(&self, id: &str, message: &str) {
        let updated = {
            let mut inner = self.inner.write().await;
            let Some(provider) = inner.providers.iter_mut().find(|p| p.id == id) else {
                return;
            };
            // sync_progress deliberately left at its last observed value.
            provider.status = ProviderStatus::Error;
            provider.clone()
        };
        self.persist().await;
        self.write_through(&updated).await;
        self.notify_change().await;
        warn!(provider = %id, error = %message, "Sync failed");
    }

    /// Serializes the full collection to the local document.
    ///
    /// Storage failures are logged, never raised: local persistence is a
    /// cache, the in-memory collection stays authoritative for readers.
    async fn persist(&self) {
        let Some(path) = &self.persist_path else {
            return;
        };
        let providers = self.inner.read().await.providers.clone();
        if let Err(e) = save_json(path, &providers).await {
            warn!(path = %path.display(), error = %e, "Failed to persist providers");
        }
    }

    /// Best-effort gateway write-through for one row.
    async fn write_through(&self, provider: &Provider) {
        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.upsert_provider(provider).await {
                warn!(provider = %provider.id, error = %e, "Gateway write-through failed");
            }
        }
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_fetch::{MemoryGateway, SimulatedExecutor};

    fn fast_executor() -> Arc<dyn SyncExecutor> {
        Arc::new(SimulatedExecutor::new().with_tick(Duration::from_millis(1)))
    }

    fn slow_executor() -> Arc<dyn SyncExecutor> {
        Arc::new(SimulatedExecutor::new().with_tick(Duration::from_millis(15)))
    }

    fn empty_store() -> ProviderStore {
        ProviderStore::with_providers(fast_executor(), Vec::new())
    }

    fn provider(id: &str, name: &str) -> Provider {
        Provider::new(id, name, "https://example.test/feed", ProviderKind::Api)
    }

    #[tokio::test]
    async fn test_new_store_is_seeded() {
        let store = ProviderStore::new(fast_executor());
        let providers = store.list().await;
        assert_eq!(providers.len(), 3);
        assert_eq!(providers[0].id, "p1");
    }

    #[tokio::test]
    async fn test_add_then_list_roundtrip() {
        let store = empty_store();
        let acme = Provider::new("a1", "Acme", "https://acme.test/feed", ProviderKind::Xml);
        store.add(acme.clone()).await.unwrap();

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], acme);
        assert_eq!(listed[0].status, ProviderStatus::Active);
        assert_eq!(listed[0].product_count, 0);
    }

    #[tokio::test]
    async fn test_add_duplicate_id_rejected() {
        let store = empty_store();
        store.add(provider("a1", "First")).await.unwrap();
        let err = store.add(provider("a1", "Second")).await.unwrap_err();
        assert!(matches!(err, StoreError::ProviderExists(_)));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_invalid_provider_rejected() {
        let store = empty_store();
        let bad = Provider::new("a1", "", "https://acme.test", ProviderKind::Api);
        assert!(matches!(
            store.add(bad).await.unwrap_err(),
            StoreError::Validation(_)
        ));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_without_clobbering() {
        let store = empty_store();
        let mut p = provider("a1", "Acme");
        p.product_count = 9;
        store.add(p).await.unwrap();

        store
            .update(
                "a1",
                ProviderUpdate {
                    name: Some("Acme Corp".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let got = store.get("a1").await.unwrap();
        assert_eq!(got.name, "Acme Corp");
        assert_eq!(got.product_count, 9);
        assert_eq!(got.url, "https://example.test/feed");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = empty_store();
        let err = store
            .update("ghost", ProviderUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ProviderNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = empty_store();
        store.add(provider("a1", "Acme")).await.unwrap();

        store.remove("a1").await.unwrap();
        assert!(store.list().await.is_empty());
        // Second removal is a no-op, not an error.
        store.remove("a1").await.unwrap();
    }

    #[tokio::test]
    async fn test_partitions_cover_the_collection() {
        let store = empty_store();
        for i in 0..6 {
            let mut p = provider(&format!("p{i}"), &format!("Provider {i}"));
            p.status = match i % 3 {
                0 => ProviderStatus::Active,
                1 => ProviderStatus::Inactive,
                _ => ProviderStatus::Error,
            };
            store.add(p).await.unwrap();
        }

        let all = store.list().await;
        let active = store.list_active().await;
        let inactive = store.list_inactive().await;

        assert_eq!(active.len() + inactive.len(), all.len());
        assert!(active.iter().all(|p| p.is_active()));
        assert!(inactive.iter().all(|p| !p.is_active()));
    }

    #[tokio::test]
    async fn test_toggle_scheduled_sync_flips_only_the_flag() {
        let store = empty_store();
        store.add(provider("a1", "Acme")).await.unwrap();

        let before = store.get("a1").await.unwrap();
        assert!(store.toggle_scheduled_sync("a1").await.unwrap());
        let after = store.get("a1").await.unwrap();

        assert!(after.scheduled_sync);
        assert_eq!(after.status, before.status);
        assert_eq!(after.product_count, before.product_count);

        assert!(!store.toggle_scheduled_sync("a1").await.unwrap());
    }

    #[tokio::test]
    async fn test_sync_success_sets_status_progress_and_timestamp() {
        let store = empty_store();
        let mut p = provider("a1", "Acme");
        p.status = ProviderStatus::Inactive;
        store.add(p).await.unwrap();

        store.sync("a1").await.unwrap();

        let got = store.get("a1").await.unwrap();
        assert_eq!(got.status, ProviderStatus::Active);
        assert_eq!(got.sync_progress, 100.0);
        assert!(got.last_sync.is_some());
    }

    #[tokio::test]
    async fn test_sync_failure_sets_error_status() {
        let store = empty_store();
        let bad = Provider::new("a1", "Broken", "https://error.test/feed", ProviderKind::Api);
        store.add(bad).await.unwrap();

        let err = store.sync("a1").await.unwrap_err();
        assert!(matches!(err, StoreError::SyncFailed(_)));

        let got = store.get("a1").await.unwrap();
        assert_eq!(got.status, ProviderStatus::Error);
        assert!(got.sync_progress < 100.0);
    }

    #[tokio::test]
    async fn test_sync_missing_provider_is_not_found() {
        let store = empty_store();
        assert!(matches!(
            store.sync("ghost").await.unwrap_err(),
            StoreError::ProviderNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_replacing_sync_yields_single_completion() {
        let store = ProviderStore::with_providers(slow_executor(), Vec::new());
        store.add(provider("a1", "Acme")).await.unwrap();

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.sync("a1").await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        let second = store.sync("a1").await;

        let first = first.await.unwrap();
        assert!(matches!(first.unwrap_err(), StoreError::SyncCancelled));
        second.unwrap();

        let got = store.get("a1").await.unwrap();
        assert_eq!(got.status, ProviderStatus::Active);
        assert_eq!(got.sync_progress, 100.0);
    }

    #[tokio::test]
    async fn test_sync_timeout_marks_error() {
        let store = ProviderStore::with_providers(
            Arc::new(SimulatedExecutor::new().with_tick(Duration::from_secs(5))),
            Vec::new(),
        )
        .with_sync_timeout(Duration::from_millis(20));
        store.add(provider("a1", "Acme")).await.unwrap();

        assert!(matches!(
            store.sync("a1").await.unwrap_err(),
            StoreError::Timeout
        ));
        assert_eq!(
            store.get("a1").await.unwrap().status,
            ProviderStatus::Error
        );
    }

    #[tokio::test]
    async fn test_mutations_persist_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("providers.json");
        let store = ProviderStore::with_providers(fast_executor(), Vec::new())
            .with_persist_path(path.clone());

        store.add(provider("a1", "Acme")).await.unwrap();

        let on_disk: Vec<Provider> = load_json(&path).await.unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].id, "a1");

        store.remove("a1").await.unwrap();
        let on_disk: Vec<Provider> = load_json(&path).await.unwrap();
        assert!(on_disk.is_empty());
    }

    #[tokio::test]
    async fn test_load_local_replaces_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("providers.json");
        save_json(&path, &vec![provider("x1", "Saved")]).await.unwrap();

        let store = ProviderStore::new(fast_executor()).with_persist_path(path);
        store.load_local().await.unwrap();

        let providers = store.list().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "x1");
    }

    #[tokio::test]
    async fn test_hydrate_overwrites_from_gateway() {
        let gateway = Arc::new(MemoryGateway::with_providers(vec![provider(
            "remote-1",
            "Remote",
        )]));
        let store = ProviderStore::new(fast_executor()).with_gateway(gateway);

        store.hydrate().await;

        let providers = store.list().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "remote-1");
        assert!(!store.loading().await);
        assert!(store.load_error().await.is_none());
    }

    #[tokio::test]
    async fn test_hydrate_failure_sets_error_and_keeps_snapshot() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.set_fail(true);
        let store = ProviderStore::new(fast_executor()).with_gateway(gateway);

        store.hydrate().await;

        assert_eq!(store.list().await.len(), 3);
        assert!(!store.loading().await);
        assert!(store.load_error().await.is_some());
    }

    #[tokio::test]
    async fn test_write_through_reaches_gateway() {
        let gateway = Arc::new(MemoryGateway::new());
        let store = ProviderStore::with_providers(fast_executor(), Vec::new())
            .with_gateway(Arc::clone(&gateway) as Arc<dyn RemoteGateway>);

        store.add(provider("a1", "Acme")).await.unwrap();
        assert_eq!(gateway.provider_rows().len(), 1);

        store.remove("a1").await.unwrap();
        assert!(gateway.provider_rows().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_sees_mutations() {
        let store = empty_store();
        let mut rx = store.subscribe();
        store.add(provider("a1", "Acme")).await.unwrap();
        assert!(rx.has_changed().unwrap());
    }
}
