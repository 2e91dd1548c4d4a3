//! CLI command implementations.

pub mod config;
pub mod logs;
pub mod providers;
pub mod scrape;
pub mod sync;

use std::sync::Arc;
use anyhow::Result;
use syncfeed_fetch::{
    HttpClient, HttpExecutor, RemoteGateway, RestGateway, SimulatedExecutor, SyncExecutor,
    SyncMode,
};
use syncfeed_store::{ProviderStore, default_providers_path};

/// Gateway endpoint, e.g. a PostgREST base URL.
pub const GATEWAY_URL_VAR: &str = "SYNCFEED_GATEWAY_URL";
/// API key sent with gateway requests.
pub const GATEWAY_KEY_VAR: &str = "SYNCFEED_GATEWAY_KEY";

/// Builds the remote gateway from the environment, when configured.
pub fn gateway_from_env(client: &HttpClient) -> Option<Arc<dyn RemoteGateway>> {
    let url = std::env::var(GATEWAY_URL_VAR).ok()?;
    let key = std::env::var(GATEWAY_KEY_VAR).unwrap_or_default();
    Some(Arc::new(RestGateway::new(client.clone(), url, key)))
}

/// Opens the provider store backed by the local document.
///
/// `mode` selects how syncs run: `Real` fetches the provider URL over
/// HTTP, `Simulated` runs the timer-driven executor.
pub async fn open_store(mode: SyncMode) -> Result<ProviderStore> {
    let client = HttpClient::new()?;
    let executor: Arc<dyn SyncExecutor> = match mode {
        SyncMode::Real => Arc::new(HttpExecutor::new(client.clone())),
        SyncMode::Simulated => Arc::new(SimulatedExecutor::new()),
    };

    let mut store = ProviderStore::new(executor).with_persist_path(default_providers_path());
    if let Some(gateway) = gateway_from_env(&client) {
        store = store.with_gateway(gateway);
    }
    store.load_local().await?;
    Ok(store)
}
