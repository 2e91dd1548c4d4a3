//! Config command - manage the LLM configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use syncfeed_core::{LlmConfig, LlmVendor};
use syncfeed_fetch::HttpClient;
use syncfeed_store::{LlmConfigStore, default_config_dir, default_llm_config_path};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Validate and activate a configuration.
    Set {
        /// Vendor: openrouter or deepseek.
        vendor: String,

        /// API key for the vendor.
        #[arg(long)]
        api_key: String,

        /// Model identifier.
        #[arg(long)]
        model: String,

        /// Maximum tokens per request.
        #[arg(long, default_value = "1000")]
        max_tokens: u32,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    let store = LlmConfigStore::new(HttpClient::new()?, default_llm_config_path());

    match &args.action {
        ConfigAction::Show => show_config(&store, cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Set {
            vendor,
            api_key,
            model,
            max_tokens,
        } => set_config(&store, vendor, api_key, model, *max_tokens).await,
        ConfigAction::Reset => reset_config(&store).await,
    }
}

async fn show_config(store: &LlmConfigStore, cli: &Cli) -> Result<()> {
    let config = store
        .get_current()
        .await
        .ok_or_else(|| anyhow::anyhow!("LLM configuration is unreadable; run 'syncfeed config reset'"))?;

    match cli.format {
        OutputFormat::Text => {
            println!("LLM Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Vendor:     {}", config.vendor);
            println!("Model:      {}", config.model);
            println!("Max tokens: {}", config.max_tokens);
            println!("API key:    {}", mask_key(&config.api_key));
        }
        OutputFormat::Json => {
            // The key never reaches structured output.
            let masked = serde_json::json!({
                "provider": config.vendor,
                "model": config.model,
                "maxTokens": config.max_tokens,
                "apiKey": mask_key(&config.api_key),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&masked)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let llm_path = default_llm_config_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:      {}", config_dir.display());
            println!("LLM config file: {}", llm_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "configDir": config_dir.display().to_string(),
                "llmConfigFile": llm_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_config(
    store: &LlmConfigStore,
    vendor: &str,
    api_key: &str,
    model: &str,
    max_tokens: u32,
) -> Result<()> {
    let vendor = LlmVendor::parse(vendor)
        .ok_or_else(|| anyhow::anyhow!("Unknown vendor: {}. Use: openrouter, deepseek", vendor))?;

    let config = LlmConfig {
        vendor,
        api_key: api_key.to_string(),
        model: model.to_string(),
        max_tokens,
    };
    store.configure(config).await?;

    info!(vendor = %vendor, model = %model, "LLM configuration updated");
    println!("Configuration validated and saved for {vendor}");
    Ok(())
}

async fn reset_config(store: &LlmConfigStore) -> Result<()> {
    store.reset().await?;
    println!("Configuration reset to defaults");
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "****".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_hides_middle() {
        let masked = mask_key("sk-c7ccc45b2fb04e0fb291cb99c862ea89");
        assert!(masked.starts_with("sk-c"));
        assert!(masked.ends_with("ea89"));
        assert!(!masked.contains("45b2fb04"));
    }

    #[test]
    fn test_mask_key_short_keys_fully_hidden() {
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_mask_key_multibyte_keys() {
        assert_eq!(mask_key("ключ-аутентификации"), "ключ****ации");
    }
}
