//! Product records produced by the scraping adapter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A normalized product record extracted from a provider.
///
/// Products are the output of the scraping adapter; this core does not
/// persist them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier; generated when the source lacks one.
    pub id: String,
    /// Product display name.
    pub name: String,
    /// Non-negative unit price.
    pub price: f64,
    /// Currency code, e.g. `"USD"` or `"EUR"`.
    pub currency: String,
    /// Stock-keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Units in stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form attribute map (color, size, ...). Ordered for stable output.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Product {
    /// Creates a minimal product with the required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            currency: "USD".to_string(),
            sku: None,
            description: None,
            images: Vec::new(),
            stock: None,
            category: None,
            attributes: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let product = Product::new("prod-1", "Widget", 19.99);
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("sku").is_none());
        assert!(json.get("images").is_none());
        assert_eq!(json["currency"], "USD");
    }

    #[test]
    fn test_deserialize_with_missing_optionals() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p","name":"n","price":1.0,"currency":"EUR"}"#).unwrap();
        assert!(product.attributes.is_empty());
        assert!(product.stock.is_none());
    }
}
