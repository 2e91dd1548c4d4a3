//! Sync command - run a provider sync with live progress.

use std::time::Duration;
use anyhow::Result;
use clap::Args;
use syncfeed_fetch::SyncMode;
use syncfeed_store::{ProviderStore, StoreError};
use tracing::debug;

use crate::output::{JsonFormatter, SyncOutput, TextFormatter};
use crate::{Cli, OutputFormat};

use super::open_store;

/// Arguments for the sync command.
#[derive(Args)]
pub struct SyncArgs {
    /// Provider id to sync.
    pub id: String,

    /// Fetch the provider URL instead of simulating the run.
    #[arg(long)]
    pub real: bool,

    /// Per-run timeout in seconds.
    #[arg(long, default_value = "60")]
    pub timeout: u64,
}

/// Runs the sync command.
pub async fn run(args: &SyncArgs, cli: &Cli) -> Result<()> {
    let mode = if args.real {
        SyncMode::Real
    } else {
        SyncMode::Simulated
    };
    let store = open_store(mode)
        .await?
        .with_sync_timeout(Duration::from_secs(args.timeout));

    let show_progress = cli.format == OutputFormat::Text && !cli.quiet;
    let progress = if show_progress {
        Some(spawn_progress_display(&store, &args.id, !cli.no_color))
    } else {
        None
    };

    let outcome = store.sync(&args.id).await;

    if let Some(handle) = progress {
        handle.abort();
        let _ = handle.await;
        // Leave the progress line terminated.
        println!();
    }

    let provider = store.get(&args.id).await;
    match (&outcome, &provider) {
        (Ok(()), Some(provider)) => match cli.format {
            OutputFormat::Text => {
                println!(
                    "Sync completed: {} ({} products, last sync {})",
                    provider.name,
                    provider.product_count,
                    provider.last_sync_display()
                );
            }
            OutputFormat::Json => {
                let formatter = JsonFormatter::new(cli.pretty);
                let output = SyncOutput::from_provider(provider, None);
                println!("{}", formatter.format(&output)?);
            }
        },
        (Err(e), Some(provider)) => {
            if cli.format == OutputFormat::Json {
                let formatter = JsonFormatter::new(cli.pretty);
                let output = SyncOutput::from_provider(provider, Some(e.to_string()));
                println!("{}", formatter.format(&output)?);
            }
            anyhow::bail!("Sync failed: {e}");
        }
        (_, None) => {
            anyhow::bail!(StoreError::ProviderNotFound(args.id.clone()));
        }
    }

    Ok(())
}

/// Redraws a one-line progress bar while the sync is in flight.
fn spawn_progress_display(
    store: &ProviderStore,
    id: &str,
    use_colors: bool,
) -> tokio::task::JoinHandle<()> {
    let store = store.clone();
    let id = id.to_string();
    let mut rx = store.subscribe();

    tokio::spawn(async move {
        use std::io::Write as _;

        let formatter = TextFormatter::new(use_colors);
        while rx.changed().await.is_ok() {
            let Some(provider) = store.get(&id).await else {
                break;
            };
            debug!(progress = provider.sync_progress, "Sync progress");
            print!(
                "\r{} {:>3.0}%  ",
                formatter.progress_bar(f64::from(provider.sync_progress)),
                provider.sync_progress
            );
            let _ = std::io::stdout().flush();
        }
    })
}
