//! Serde serialization/deserialization tests for core types.
//!
//! These tests verify that the wire strings match the formats the remote
//! gateway and the persisted documents use, and that full records survive
//! a round-trip.

use chrono::Utc;

use crate::{
    LlmConfig, LlmVendor, LogCategory, LogEntry, LogLevel, Product, Provider, ProviderKind,
    ProviderStatus,
};

// ============================================================================
// ProviderKind Serde Tests
// ============================================================================

#[test]
fn test_provider_kind_serde_roundtrip_all_variants() {
    for kind in ProviderKind::all() {
        let json = serde_json::to_string(kind).unwrap();
        let deserialized: ProviderKind = serde_json::from_str(&json).unwrap();
        assert_eq!(*kind, deserialized, "Round-trip failed for {:?}", kind);
    }
}

#[test]
fn test_provider_kind_wire_names() {
    let test_cases = vec![
        (r#""API""#, ProviderKind::Api),
        (r#""Scraping""#, ProviderKind::Scraping),
        (r#""XML""#, ProviderKind::Xml),
        (r#""JSON""#, ProviderKind::Json),
    ];

    for (json, expected) in test_cases {
        let result: ProviderKind = serde_json::from_str(json).unwrap();
        assert_eq!(result, expected, "Failed for {}", json);
    }
}

#[test]
fn test_provider_kind_invalid_deserialize() {
    let result: Result<ProviderKind, _> = serde_json::from_str(r#""CSV""#);
    assert!(result.is_err());
}

// ============================================================================
// Provider Serde Tests
// ============================================================================

#[test]
fn test_provider_full_roundtrip() {
    let mut provider = Provider::new("p1", "Acme", "https://acme.test/feed", ProviderKind::Xml);
    provider.status = ProviderStatus::Error;
    provider.last_sync = Some(Utc::now());
    provider.product_count = 128;
    provider.sync_progress = 65.0;
    provider.scheduled_sync = true;
    provider.logo = Some("https://acme.test/logo.png".to_string());

    let json = serde_json::to_string(&provider).unwrap();
    let parsed: Provider = serde_json::from_str(&json).unwrap();
    assert_eq!(provider, parsed);
}

#[test]
fn test_provider_kind_field_serialized_as_type() {
    let provider = Provider::new("p1", "Acme", "https://acme.test/feed", ProviderKind::Api);
    let json = serde_json::to_value(&provider).unwrap();
    assert_eq!(json["type"], "API");
    assert!(json.get("kind").is_none());
}

#[test]
fn test_provider_defaults_on_sparse_document() {
    // Documents written before a field existed must still load.
    let parsed: Provider = serde_json::from_str(
        r#"{"id":"p1","name":"Acme","url":"https://acme.test","type":"JSON"}"#,
    )
    .unwrap();
    assert_eq!(parsed.status, ProviderStatus::Active);
    assert_eq!(parsed.product_count, 0);
    assert!(parsed.last_sync.is_none());
    assert!(!parsed.scheduled_sync);
}

// ============================================================================
// LogEntry Serde Tests
// ============================================================================

#[test]
fn test_log_entry_full_roundtrip() {
    let mut entry = LogEntry::new(LogLevel::Error, "sync failed");
    entry.context = Some("provider sync".to_string());
    entry.stack = Some("FetchError: timeout".to_string());
    entry.category = Some(LogCategory::Sync);
    entry.provider_id = Some("p2".to_string());

    let json = serde_json::to_string(&entry).unwrap();
    let parsed: LogEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(entry, parsed);
}

#[test]
fn test_log_category_wire_names() {
    assert_eq!(
        serde_json::to_string(&LogCategory::Scraping).unwrap(),
        "\"scraping\""
    );
    assert_eq!(
        serde_json::from_str::<LogCategory>("\"llm\"").unwrap(),
        LogCategory::Llm
    );
}

// ============================================================================
// LlmConfig Serde Tests
// ============================================================================

#[test]
fn test_llm_config_vendor_serialized_as_provider() {
    let config = LlmConfig::default();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["provider"], "deepseek");
    assert!(json.get("vendor").is_none());
}

#[test]
fn test_llm_config_roundtrip() {
    let config = LlmConfig {
        vendor: LlmVendor::OpenRouter,
        api_key: "or-0123456789abcdefghij".to_string(),
        model: "anthropic/claude-3".to_string(),
        max_tokens: 2048,
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: LlmConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, parsed);
}

// ============================================================================
// Product Serde Tests
// ============================================================================

#[test]
fn test_product_roundtrip_with_attributes() {
    let mut product = Product::new("prod-1", "Widget", 19.99);
    product.currency = "EUR".to_string();
    product.sku = Some("SKU-1001".to_string());
    product.images = vec!["https://img.test/1.png".to_string()];
    product
        .attributes
        .insert("color".to_string(), "blue".to_string());

    let json = serde_json::to_string(&product).unwrap();
    let parsed: Product = serde_json::from_str(&json).unwrap();
    assert_eq!(product, parsed);
}
