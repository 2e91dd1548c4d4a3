//! Providers command - manage the provider collection.

use anyhow::Result;
use clap::{Args, Subcommand};
use syncfeed_core::models::{Provider, ProviderKind, ProviderUpdate};
use syncfeed_fetch::SyncMode;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::open_store;

/// Arguments for the providers command.
#[derive(Args)]
pub struct ProvidersArgs {
    #[command(subcommand)]
    pub action: Option<ProvidersAction>,
}

/// Providers subcommands.
#[derive(Subcommand)]
pub enum ProvidersAction {
    /// List providers (default).
    List {
        /// Only providers with active status.
        #[arg(long)]
        active: bool,

        /// Only providers with inactive or error status.
        #[arg(long)]
        inactive: bool,
    },

    /// Show one provider in detail.
    Show {
        /// Provider id.
        id: String,
    },

    /// Add a provider.
    Add {
        /// Provider id.
        id: String,

        /// Display name.
        name: String,

        /// Source URL.
        url: String,

        /// Integration type: api, scraping, xml, json.
        #[arg(long, short = 't', default_value = "api")]
        kind: String,
    },

    /// Update fields of a provider. The integration type is fixed at creation.
    Update {
        /// Provider id.
        id: String,

        /// New display name.
        #[arg(long)]
        name: Option<String>,

        /// New source URL.
        #[arg(long)]
        url: Option<String>,

        /// New logo URL.
        #[arg(long)]
        logo: Option<String>,
    },

    /// Remove a provider.
    Remove {
        /// Provider id.
        id: String,
    },

    /// Toggle scheduled sync for a provider.
    Toggle {
        /// Provider id.
        id: String,
    },
}

/// Runs the providers command.
pub async fn run(args: &ProvidersArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        None => list(false, false, cli).await,
        Some(ProvidersAction::List { active, inactive }) => list(*active, *inactive, cli).await,
        Some(ProvidersAction::Show { id }) => show(id, cli).await,
        Some(ProvidersAction::Add {
            id,
            name,
            url,
            kind,
        }) => add(id, name, url, kind, cli).await,
        Some(ProvidersAction::Update { id, name, url, logo }) => {
            update(id, name.clone(), url.clone(), logo.clone(), cli).await
        }
        Some(ProvidersAction::Remove { id }) => remove(id, cli).await,
        Some(ProvidersAction::Toggle { id }) => toggle(id, cli).await,
    }
}

fn parse_kind(s: &str) -> Result<ProviderKind> {
    ProviderKind::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown provider type: {}. Use: api, scraping, xml, json", s))
}

async fn list(active: bool, inactive: bool, cli: &Cli) -> Result<()> {
    let store = open_store(SyncMode::Simulated).await?;
    let providers = if active {
        store.list_active().await
    } else if inactive {
        store.list_inactive().await
    } else {
        store.list().await
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_providers_header());
            for provider in &providers {
                println!("{}", formatter.format_provider_line(provider));
            }
            if providers.is_empty() {
                println!("(no providers)");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&providers)?);
        }
    }

    Ok(())
}

async fn show(id: &str, cli: &Cli) -> Result<()> {
    let store = open_store(SyncMode::Simulated).await?;
    let provider = store
        .get(id)
        .await
        .ok_or_else(|| anyhow::anyhow!("Provider not found: {}", id))?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_provider_detail(&provider));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&provider)?);
        }
    }

    Ok(())
}

async fn add(id: &str, name: &str, url: &str, kind: &str, _cli: &Cli) -> Result<()> {
    let kind = parse_kind(kind)?;
    let store = open_store(SyncMode::Simulated).await?;
    store.add(Provider::new(id, name, url, kind)).await?;

    info!(provider = %id, "Provider added");
    println!("Added: {name} ({id})");
    Ok(())
}

async fn update(
    id: &str,
    name: Option<String>,
    url: Option<String>,
    logo: Option<String>,
    _cli: &Cli,
) -> Result<()> {
    let store = open_store(SyncMode::Simulated).await?;
    store
        .update(
            id,
            ProviderUpdate {
                name,
                url,
                logo,
                ..Default::default()
            },
        )
        .await?;

    println!("Updated: {id}");
    Ok(())
}

async fn remove(id: &str, _cli: &Cli) -> Result<()> {
    let store = open_store(SyncMode::Simulated).await?;
    store.remove(id).await?;

    info!(provider = %id, "Provider removed");
    println!("Removed: {id}");
    Ok(())
}

async fn toggle(id: &str, _cli: &Cli) -> Result<()> {
    let store = open_store(SyncMode::Simulated).await?;
    let enabled = store.toggle_scheduled_sync(id).await?;

    println!(
        "Scheduled sync for {id}: {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
