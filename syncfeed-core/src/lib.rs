// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SyncFeed` Core
//!
//! Core types and models for the `SyncFeed` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `SyncFeed` crates, including:
//!
//! - Domain models (providers, products, log entries, LLM configuration)
//! - Error types
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`Provider`] - A configured external source of product data
//! - [`ProviderKind`] - Integration method (API, scraping, XML/JSON feed)
//! - [`ProviderStatus`] - Lifecycle status driven by sync outcomes
//! - [`ProviderUpdate`] - Partial update merged field-by-field
//!
//! ### Product Types
//! - [`Product`] - Normalized product record from the scraping adapter
//!
//! ### Logging Types
//! - [`LogEntry`] - One log record
//! - [`LogLevel`] / [`LogCategory`] - Severity and functional area
//!
//! ### LLM Configuration
//! - [`LlmConfig`] - Vendor, credentials and token budget
//! - [`LlmVendor`] - Supported text-generation vendors

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Provider types
    Provider,
    ProviderKind,
    ProviderStatus,
    ProviderUpdate,
    // Product types
    Product,
    // Logging types
    LogCategory,
    LogEntry,
    LogLevel,
    // LLM configuration
    DEFAULT_MAX_TOKENS,
    LlmConfig,
    LlmVendor,
    MIN_API_KEY_LEN,
};
