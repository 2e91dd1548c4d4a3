// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SyncFeed` Store
//!
//! State stores for the `SyncFeed` application:
//!
//! - [`ProviderStore`] - the provider collection, its sync lifecycle and
//!   gateway hydration
//! - [`Logger`] - bounded in-memory log ring with optional remote
//!   persistence
//! - [`LlmConfigStore`] - validated, persisted LLM configuration
//! - [`export`] - CSV and plain-text export rendering
//! - [`persistence`] - atomic JSON documents under the config directory

pub mod error;
pub mod export;
pub mod llm_store;
pub mod logger;
pub mod persistence;
pub mod provider_store;

pub use error::StoreError;
pub use llm_store::LlmConfigStore;
pub use logger::{DEFAULT_MAX_MEMORY_LOGS, LogOptions, Logger};
pub use persistence::{default_config_dir, default_llm_config_path, default_providers_path};
pub use provider_store::{ProviderStore, seed_providers};
