//! Export helpers.
//!
//! Renders product collections to CSV and log collections to plain text,
//! with filename slugs derived from the provider name.

use std::fmt::Write as _;
use std::path::Path;
use syncfeed_core::models::{LogEntry, Product};

use crate::error::StoreError;

/// Lowercases a name and folds whitespace runs into single hyphens.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Suggested filename for a provider's product export.
pub fn products_filename(provider_name: &str) -> String {
    format!("products-{}.csv", slugify(provider_name))
}

/// Suggested filename for a log export.
pub fn logs_filename() -> String {
    format!("logs-{}.txt", chrono::Utc::now().format("%Y%m%d-%H%M%S"))
}

/// Renders products as CSV with a header row.
///
/// Fields containing commas, quotes or newlines are quoted per RFC 4180.
pub fn products_to_csv(products: &[Product]) -> String {
    let mut out = String::from("id,name,price,currency,sku,category,stock\n");
    for product in products {
        let fields = [
            product.id.clone(),
            product.name.clone(),
            format!("{:.2}", product.price),
            product.currency.clone(),
            product.sku.clone().unwrap_or_default(),
            product.category.clone().unwrap_or_default(),
            product.stock.map(|s| s.to_string()).unwrap_or_default(),
        ];
        let row = fields
            .iter()
            .map(|f| csv_escape(f))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{row}");
    }
    out
}

/// Renders log entries as one timestamped line each, oldest first.
pub fn logs_to_text(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(
            out,
            "[{}] [{}]",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.level
        );
        if let Some(category) = &entry.category {
            let _ = write!(out, " [{category}]");
        }
        let _ = write!(out, " {}", entry.message);
        if let Some(provider_id) = &entry.provider_id {
            let _ = write!(out, " (provider: {provider_id})");
        }
        out.push('\n');
        if let Some(stack) = &entry.stack {
            let _ = writeln!(out, "    {stack}");
        }
    }
    out
}

/// Writes rendered export content to `path` atomically.
pub async fn write_export(path: &Path, content: &str) -> Result<(), StoreError> {
    crate::persistence::save_text(path, content).await
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::models::{LogLevel, Product};

    #[test]
    fn test_slugify_folds_whitespace() {
        assert_eq!(slugify("Proveedor A"), "proveedor-a");
        assert_eq!(slugify("  Multi   Word  Name "), "multi-word-name");
        assert_eq!(slugify("plain"), "plain");
    }

    #[test]
    fn test_products_filename_uses_slug() {
        assert_eq!(products_filename("Provider A"), "products-provider-a.csv");
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let mut product = Product::new("p-1", "Widget", 19.5);
        product.sku = Some("W-100".to_string());
        product.stock = Some(4);

        let csv = products_to_csv(&[product]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "id,name,price,currency,sku,category,stock");
        assert_eq!(lines.next().unwrap(), "p-1,Widget,19.50,USD,W-100,,4");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_escapes_special_fields() {
        let product = Product::new("p-1", "Bolt, 5mm \"coarse\"", 0.10);
        let csv = products_to_csv(&[product]);
        assert!(csv.contains("\"Bolt, 5mm \"\"coarse\"\"\""));
    }

    #[test]
    fn test_logs_render_level_and_attribution() {
        let mut entry = LogEntry::new(LogLevel::Error, "sync failed");
        entry.provider_id = Some("p2".to_string());
        entry.stack = Some("connection refused".to_string());

        let text = logs_to_text(&[entry]);
        assert!(text.contains("[error]"));
        assert!(text.contains("sync failed (provider: p2)"));
        assert!(text.contains("    connection refused"));
    }
}
