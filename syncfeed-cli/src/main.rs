// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! SyncFeed CLI - product provider management from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List providers
//! syncfeed providers
//!
//! # Only active providers, as JSON
//! syncfeed providers list --active --format json --pretty
//!
//! # Add a provider and run a sync
//! syncfeed providers add p4 "Provider D" https://provider-d.example/api --kind api
//! syncfeed sync p4
//!
//! # Extract products from a URL
//! syncfeed scrape https://shop.example --export "Provider D"
//!
//! # Configure the LLM vendor
//! syncfeed config set deepseek --api-key sk-... --model deepseek-coder
//!
//! # Query persisted logs
//! syncfeed logs --level error --limit 20
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, logs, providers, scrape, sync};

// ============================================================================
// CLI Definition
// ============================================================================

/// SyncFeed CLI - product provider management.
#[derive(Parser)]
#[command(name = "syncfeed")]
#[command(about = "Product provider management CLI")]
#[command(long_about = r#"
SyncFeed manages product providers, their sync lifecycle and product
extraction.

Provider types:
  • REST API (api)
  • Web scraping (scraping)
  • XML feed (xml)
  • JSON feed (json)

Examples:
  syncfeed providers                  # List providers
  syncfeed providers add p4 "Provider D" https://d.example/api
  syncfeed sync p4                    # Run a sync with live progress
  syncfeed scrape https://shop.example --export "Provider D"
  syncfeed config show                # Show LLM configuration
  syncfeed logs --level error         # Query persisted logs
"#)]
#[command(version)]
#[command(author = "SyncFeed Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, lists providers.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage providers (default if no command specified).
    #[command(visible_alias = "p")]
    Providers(providers::ProvidersArgs),

    /// Run a provider sync.
    #[command(visible_alias = "s")]
    Sync(sync::SyncArgs),

    /// Extract products from a URL.
    Scrape(scrape::ScrapeArgs),

    /// Manage the LLM configuration.
    Config(config::ConfigArgs),

    /// Query and export persisted logs.
    #[command(visible_alias = "l")]
    Logs(logs::LogsArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Provider not found.
    ProviderMissing = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("syncfeed=debug,info")
    } else {
        EnvFilter::new("syncfeed=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Providers(args)) => providers::run(args, &cli).await,
        Some(Commands::Sync(args)) => sync::run(args, &cli).await,
        Some(Commands::Scrape(args)) => scrape::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        Some(Commands::Logs(args)) => logs::run(args, &cli).await,
        None => {
            // Default to listing providers
            providers::run(&providers::ProvidersArgs { action: None }, &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        let code = if e
            .downcast_ref::<syncfeed_store::StoreError>()
            .is_some_and(|e| matches!(e, syncfeed_store::StoreError::ProviderNotFound(_)))
        {
            ExitCode::ProviderMissing
        } else {
            ExitCode::Error
        };
        std::process::exit(code as i32);
    }

    Ok(())
}
