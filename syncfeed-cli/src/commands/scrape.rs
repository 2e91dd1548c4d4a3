//! Scrape command - extract products from a URL.

use std::path::PathBuf;
use anyhow::Result;
use clap::Args;
use syncfeed_core::LlmConfig;
use syncfeed_fetch::{HttpClient, HttpScraper, Scraper, SimulatedScraper};
use syncfeed_fetch::scrape::{adapt_to_commerce_format, normalize};
use syncfeed_store::export::{products_filename, products_to_csv, write_export};
use syncfeed_store::{LlmConfigStore, default_llm_config_path};
use tracing::info;

use crate::output::{JsonFormatter, ScrapeOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the scrape command.
#[derive(Args)]
pub struct ScrapeArgs {
    /// URL to extract products from.
    pub url: String,

    /// Extraction endpoint; simulated when omitted.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Emit products in the commerce import schema.
    #[arg(long)]
    pub commerce: bool,

    /// Write products as CSV named after this provider.
    #[arg(long, value_name = "PROVIDER_NAME")]
    pub export: Option<String>,

    /// Directory for exported files.
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,
}

/// Runs the scrape command.
pub async fn run(args: &ScrapeArgs, cli: &Cli) -> Result<()> {
    let client = HttpClient::new()?;
    let config = load_llm_config(&client).await?;

    let scraper: Box<dyn Scraper> = match &args.endpoint {
        Some(endpoint) => Box::new(HttpScraper::new(client, endpoint.clone())),
        None => Box::new(SimulatedScraper),
    };

    let outcome = scraper.scrape(&args.url, &config).await?;
    let products = normalize(&outcome.products);

    if let Some(provider_name) = &args.export {
        let path = args.export_dir.join(products_filename(provider_name));
        write_export(&path, &products_to_csv(&products)).await?;
        info!(path = %path.display(), count = products.len(), "Products exported");
        if !cli.quiet {
            println!("Exported {} products to {}", products.len(), path.display());
        }
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if outcome.success {
                println!("{}", outcome.message);
                for product in &products {
                    println!("{}", formatter.format_product_line(product));
                }
            } else {
                println!(
                    "{}",
                    formatter.format_error(
                        &args.url,
                        outcome.error.as_deref().unwrap_or(&outcome.message)
                    )
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            if args.commerce {
                println!("{}", formatter.format(&adapt_to_commerce_format(&products))?);
            } else {
                let output = ScrapeOutput {
                    url: args.url.clone(),
                    success: outcome.success,
                    message: outcome.message.clone(),
                    product_count: products.len(),
                    error: outcome.error.clone(),
                };
                println!("{}", formatter.format(&output)?);
            }
        }
    }

    if outcome.success {
        Ok(())
    } else {
        anyhow::bail!("Extraction failed for {}", args.url)
    }
}

/// Loads the active LLM configuration, falling back to the default.
async fn load_llm_config(client: &HttpClient) -> Result<LlmConfig> {
    let store = LlmConfigStore::new(client.clone(), default_llm_config_path());
    store
        .get_current()
        .await
        .ok_or_else(|| anyhow::anyhow!("LLM configuration is unreadable; run 'syncfeed config reset'"))
}
