// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SyncFeed` Fetch
//!
//! HTTP infrastructure and external-endpoint adapters for the `SyncFeed`
//! application:
//!
//! - [`client`] - HTTP client with retry and rate-limit handling
//! - [`gateway`] - Remote data gateway (`providers`/`logs` tables) behind
//!   the [`RemoteGateway`] trait, with REST and in-memory implementations
//! - [`llm`] - Live credential validation against LLM vendor endpoints
//! - [`scrape`] - Scraping adapter: extraction, normalization, and
//!   commerce-format adaptation
//! - [`executor`] - Sync executors (simulated and real) behind the
//!   [`SyncExecutor`] capability
//!
//! ## Example
//!
//! ```ignore
//! use syncfeed_fetch::{HttpClient, SimulatedScraper, Scraper, normalize};
//!
//! let outcome = SimulatedScraper.scrape("https://shop.example", &config).await?;
//! let products = normalize(&outcome.products);
//! ```

pub mod client;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod llm;
pub mod retry;
pub mod scrape;

// Re-export key types at crate root
pub use client::HttpClient;
pub use error::FetchError;
pub use executor::{
    DEFAULT_TICK, HttpExecutor, SimulatedExecutor, SyncExecutor, SyncMode, SyncReport,
};
pub use gateway::{DEFAULT_LOG_LIMIT, LogQuery, MemoryGateway, RemoteGateway, RestGateway};
pub use llm::validate_credentials;
pub use retry::RetryStrategy;
pub use scrape::{
    CommerceAttribute, CommerceCategory, CommerceImage, CommerceProduct, HttpScraper,
    ScrapeOutcome, Scraper, SimulatedScraper, adapt_to_commerce_format, normalize,
};
