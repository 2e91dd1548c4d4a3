//! Logs command - query and export persisted logs.

use std::path::PathBuf;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use syncfeed_core::models::{LogCategory, LogLevel};
use syncfeed_fetch::{HttpClient, LogQuery};
use syncfeed_store::export::{logs_filename, logs_to_text, write_export};
use syncfeed_store::Logger;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::gateway_from_env;

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub action: Option<LogsAction>,

    #[command(flatten)]
    pub filter: LogFilterArgs,
}

/// Logs subcommands.
#[derive(Subcommand)]
pub enum LogsAction {
    /// Show persisted logs (default).
    Show,

    /// Export persisted logs to a text file.
    Export {
        /// Output file; generated name when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Shared log query filters.
#[derive(Args)]
pub struct LogFilterArgs {
    /// Maximum entries to return.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Filter by level: debug, info, warn, error.
    #[arg(long)]
    pub level: Option<String>,

    /// Filter by category: system, auth, sync, api, scraping, llm.
    #[arg(long)]
    pub category: Option<String>,

    /// Filter by provider id.
    #[arg(long)]
    pub provider_id: Option<String>,

    /// Filter by user id.
    #[arg(long)]
    pub user_id: Option<String>,

    /// Entries at or after this RFC 3339 timestamp.
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Entries at or before this RFC 3339 timestamp.
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,
}

impl LogFilterArgs {
    fn to_query(&self) -> Result<LogQuery> {
        let level = match &self.level {
            Some(s) => Some(parse_level(s)?),
            None => None,
        };
        let category = match &self.category {
            Some(s) => Some(parse_category(s)?),
            None => None,
        };

        Ok(LogQuery {
            limit: self.limit,
            level,
            category,
            user_id: self.user_id.clone(),
            provider_id: self.provider_id.clone(),
            from_date: self.from,
            to_date: self.to,
        })
    }
}

/// Runs the logs command.
pub async fn run(args: &LogsArgs, cli: &Cli) -> Result<()> {
    let client = HttpClient::new()?;
    let Some(gateway) = gateway_from_env(&client) else {
        anyhow::bail!(
            "No log gateway configured; set {} to query persisted logs",
            super::GATEWAY_URL_VAR
        );
    };

    let logger = Logger::new().with_gateway(gateway);
    let query = args.filter.to_query()?;
    let entries = logger.get_persisted_logs(&query).await;

    match &args.action {
        None | Some(LogsAction::Show) => show(&entries, cli),
        Some(LogsAction::Export { output }) => export(&entries, output.clone(), cli).await,
    }
}

fn show(entries: &[syncfeed_core::models::LogEntry], cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for entry in entries {
                println!("{}", formatter.format_log_line(entry));
            }
            if entries.is_empty() {
                println!("(no log entries)");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&entries)?);
        }
    }
    Ok(())
}

async fn export(
    entries: &[syncfeed_core::models::LogEntry],
    output: Option<PathBuf>,
    cli: &Cli,
) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(logs_filename()));
    write_export(&path, &logs_to_text(entries)).await?;

    info!(path = %path.display(), count = entries.len(), "Logs exported");
    if !cli.quiet {
        println!("Exported {} log entries to {}", entries.len(), path.display());
    }
    Ok(())
}

fn parse_level(s: &str) -> Result<LogLevel> {
    match s.to_lowercase().as_str() {
        "debug" => Ok(LogLevel::Debug),
        "info" => Ok(LogLevel::Info),
        "warn" | "warning" => Ok(LogLevel::Warn),
        "error" => Ok(LogLevel::Error),
        _ => anyhow::bail!("Unknown level: {}. Use: debug, info, warn, error", s),
    }
}

fn parse_category(s: &str) -> Result<LogCategory> {
    match s.to_lowercase().as_str() {
        "system" => Ok(LogCategory::System),
        "auth" => Ok(LogCategory::Auth),
        "sync" => Ok(LogCategory::Sync),
        "api" => Ok(LogCategory::Api),
        "scraping" => Ok(LogCategory::Scraping),
        "llm" => Ok(LogCategory::Llm),
        _ => anyhow::bail!(
            "Unknown category: {}. Use: system, auth, sync, api, scraping, llm",
            s
        ),
    }
}
