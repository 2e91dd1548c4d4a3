//! Domain models for SyncFeed.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider types (Provider, ProviderKind, ProviderStatus)
//! - [`product`] - Normalized product records
//! - [`log`] - Log entries (LogEntry, LogLevel, LogCategory)
//! - [`llm`] - LLM backend configuration (LlmConfig, LlmVendor)

mod llm;
mod log;
mod product;
mod provider;

// Re-export everything at the models level
pub use llm::{DEFAULT_MAX_TOKENS, LlmConfig, LlmVendor, MIN_API_KEY_LEN};
pub use log::{LogCategory, LogEntry, LogLevel};
pub use product::Product;
pub use provider::{Provider, ProviderKind, ProviderStatus, ProviderUpdate};
#[cfg(test)]
mod serde_tests;
