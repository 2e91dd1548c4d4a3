//! Scraping adapter.
//!
//! Extracts structured product records from a target URL via an external
//! LLM-assisted extraction endpoint, normalizes the raw records into
//! [`Product`]s, and adapts them to the commerce import format.
//!
//! The adapter never propagates failures as errors: every run produces a
//! [`ScrapeOutcome`] tagged success or failure, the way interactive callers
//! expect to consume it.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use syncfeed_core::{LlmConfig, Product};
use tracing::{info, warn};

use crate::client::HttpClient;
use crate::error::FetchError;

// ============================================================================
// Scrape Outcome
// ============================================================================

/// Result of one scraping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    /// Whether extraction produced any products.
    pub success: bool,
    /// Human-readable summary, count-bearing on success.
    pub message: String,
    /// Raw extracted records; empty on failure.
    #[serde(default)]
    pub products: Vec<Value>,
    /// Diagnostic detail on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeOutcome {
    /// A successful outcome carrying `products`.
    pub fn success(products: Vec<Value>) -> Self {
        Self {
            message: format!("Found {} products", products.len()),
            success: true,
            products,
            error: None,
        }
    }

    /// A failed outcome with a summary and diagnostic detail.
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            products: Vec::new(),
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Scraper Trait
// ============================================================================

/// Capability for extracting product records from a URL.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Runs an extraction against `url` using the given LLM configuration.
    ///
    /// Endpoint errors, empty extractions and network failures all come
    /// back as a failed [`ScrapeOutcome`]; only a missing API key is a
    /// hard configuration error.
    async fn scrape(&self, url: &str, config: &LlmConfig) -> Result<ScrapeOutcome, FetchError>;
}

// ============================================================================
// HTTP Scraper
// ============================================================================

/// Request body sent to the extraction endpoint.
#[derive(Debug, Serialize)]
struct ExtractionRequest<'a> {
    url: &'a str,
    model: &'a str,
    max_tokens: u32,
}

/// Response body returned by the extraction endpoint.
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    products: Vec<Value>,
}

/// Scraper backed by a real extraction endpoint.
#[derive(Debug, Clone)]
pub struct HttpScraper {
    client: HttpClient,
    endpoint: String,
}

impl HttpScraper {
    /// Creates a scraper posting to the given extraction endpoint.
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn scrape(&self, url: &str, config: &LlmConfig) -> Result<ScrapeOutcome, FetchError> {
        if config.api_key.is_empty() {
            return Err(FetchError::Config(
                "scraping requires a configured LLM API key".into(),
            ));
        }

        info!(url = %url, vendor = %config.vendor, "Starting scrape");

        let request = ExtractionRequest {
            url,
            model: &config.model,
            max_tokens: config.max_tokens,
        };

        let response = match self
            .client
            .post_json_with_auth(&self.endpoint, &config.api_key, &request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Scrape request failed");
                return Ok(ScrapeOutcome::failure(
                    "Failed to reach the extraction endpoint",
                    e.to_string(),
                ));
            }
        };

        let extracted: ExtractionResponse = match response.json().await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(url = %url, error = %e, "Scrape response was not valid JSON");
                return Ok(ScrapeOutcome::failure(
                    "Extraction endpoint returned malformed data",
                    e.to_string(),
                ));
            }
        };

        if extracted.products.is_empty() {
            return Ok(ScrapeOutcome::failure(
                "No products could be extracted from the site",
                format!("empty extraction for {url}"),
            ));
        }

        info!(url = %url, count = extracted.products.len(), "Scrape completed");
        Ok(ScrapeOutcome::success(extracted.products))
    }
}

// ============================================================================
// Simulated Scraper
// ============================================================================

/// Demo scraper that fabricates a plausible catalog.
///
/// URLs containing `"error"` fail, mirroring the demo behavior of the
/// hosted extraction endpoint.
#[derive(Debug, Clone, Default)]
pub struct SimulatedScraper;

const SAMPLE_CATEGORIES: &[&str] = &["Electronics", "Clothing", "Home", "Sports", "Toys"];
const SAMPLE_COLORS: &[&str] = &["Red", "Blue", "Black", "White"];
const SAMPLE_SIZES: &[&str] = &["S", "M", "L", "XL"];

#[async_trait]
impl Scraper for SimulatedScraper {
    async fn scrape(&self, url: &str, config: &LlmConfig) -> Result<ScrapeOutcome, FetchError> {
        if config.api_key.is_empty() {
            return Err(FetchError::Config(
                "scraping requires a configured LLM API key".into(),
            ));
        }

        info!(url = %url, "Starting simulated scrape");

        if url.to_lowercase().contains("error") {
            return Ok(ScrapeOutcome::failure(
                "Failed to connect to the website",
                "the site is unavailable or refused scraping",
            ));
        }

        let mut rng = rand::thread_rng();
        let count = rng.gen_range(10..60);
        let mut products = Vec::with_capacity(count);

        for i in 0..count {
            let id = format!("prod-{:08x}", rng.r#gen::<u32>());
            let category = SAMPLE_CATEGORIES[rng.gen_range(0..SAMPLE_CATEGORIES.len())];
            products.push(serde_json::json!({
                "id": id,
                "name": format!("Product {} ({category})", i + 1),
                "price": (rng.gen_range(0..1_000_000) as f64) / 100.0,
                "currency": "EUR",
                "sku": format!("SKU-{}", rng.gen_range(0..10_000)),
                "description": format!("Description of product {}. This is a sample item.", i + 1),
                "images": [
                    format!("https://picsum.photos/seed/{id}/300/300"),
                    format!("https://picsum.photos/seed/{id}-1/300/300"),
                ],
                "stock": rng.gen_range(0..100),
                "category": category,
                "attributes": {
                    "color": SAMPLE_COLORS[rng.gen_range(0..SAMPLE_COLORS.len())],
                    "size": SAMPLE_SIZES[rng.gen_range(0..SAMPLE_SIZES.len())],
                },
            }));
        }

        info!(url = %url, count = products.len(), "Simulated scrape completed");
        Ok(ScrapeOutcome::success(products))
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Maps arbitrary extracted records into canonical [`Product`]s.
///
/// Total over any input: missing ids get a generated fallback, currency
/// defaults to `"USD"`, attributes default to empty, and records that are
/// not objects become empty-named zero-priced products rather than errors.
/// Output length always equals input length.
pub fn normalize(raw_items: &[Value]) -> Vec<Product> {
    raw_items.iter().map(normalize_one).collect()
}

fn normalize_one(raw: &Value) -> Product {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("prod-{}", uuid::Uuid::new_v4().simple()));
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let price = raw.get("price").and_then(Value::as_f64).unwrap_or(0.0).max(0.0);
    let currency = raw
        .get("currency")
        .and_then(Value::as_str)
        .unwrap_or("USD")
        .to_string();

    let images = raw
        .get("images")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let attributes = raw
        .get("attributes")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_else(BTreeMap::new);

    Product {
        id,
        name,
        price,
        currency,
        sku: raw.get("sku").and_then(Value::as_str).map(str::to_string),
        description: raw
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        images,
        stock: raw
            .get("stock")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok()),
        category: raw
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string),
        attributes,
    }
}

// ============================================================================
// Commerce Adaptation
// ============================================================================

/// One product in the commerce system's import schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceProduct {
    /// Product name.
    pub name: String,
    /// Commerce product type; always `"simple"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Price formatted with exactly two decimals.
    pub regular_price: String,
    /// Full description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Description truncated to 100 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Category names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CommerceCategory>,
    /// Image sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<CommerceImage>,
    /// Flattened attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<CommerceAttribute>,
    /// Stock-keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Units in stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

/// Category reference in the import schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceCategory {
    /// Category name.
    pub name: String,
}

/// Image reference in the import schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceImage {
    /// Image source URL.
    pub src: String,
}

/// Flattened name/option attribute pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub option: String,
}

/// Maximum length of the short description field.
const SHORT_DESCRIPTION_LEN: usize = 100;

/// Adapts products to the commerce import schema.
///
/// Pure, total and order-preserving: prices carry exactly two decimals,
/// long descriptions are truncated for the short-description field, and
/// attributes flatten to name/option pairs.
pub fn adapt_to_commerce_format(products: &[Product]) -> Vec<CommerceProduct> {
    products
        .iter()
        .map(|product| CommerceProduct {
            name: product.name.clone(),
            kind: "simple".to_string(),
            regular_price: format!("{:.2}", product.price),
            description: product.description.clone(),
            short_description: product.description.as_deref().map(truncate_description),
            categories: product
                .category
                .iter()
                .map(|name| CommerceCategory { name: name.clone() })
                .collect(),
            images: product
                .images
                .iter()
                .map(|src| CommerceImage { src: src.clone() })
                .collect(),
            attributes: product
                .attributes
                .iter()
                .map(|(name, option)| CommerceAttribute {
                    name: name.clone(),
                    option: option.clone(),
                })
                .collect(),
            sku: product.sku.clone(),
            stock_quantity: product.stock,
        })
        .collect()
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() <= SHORT_DESCRIPTION_LEN {
        return description.to_string();
    }
    let truncated: String = description.chars().take(SHORT_DESCRIPTION_LEN).collect();
    format!("{truncated}...")
}

// ============================================================================
// Tests
// ============================================================================
