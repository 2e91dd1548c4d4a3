//! LLM configuration types.
//!
//! The scraping assistant is driven by an external text-generation vendor;
//! these types describe which vendor, with what credentials and budget.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Minimum accepted API key length. Shorter keys are rejected before any
/// network call is made.
pub const MIN_API_KEY_LEN: usize = 20;

/// Default token budget when the configured value is unparseable.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Demo key shipped so the scraping adapter always has something to call.
const DEFAULT_DEEPSEEK_API_KEY: &str = "sk-c7ccc45b2fb04e0fb291cb99c862ea89";

// ============================================================================
// LLM Vendor
// ============================================================================

/// Supported text-generation vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmVendor {
    /// OpenRouter aggregator.
    OpenRouter,
    /// DeepSeek.
    DeepSeek,
}

impl LlmVendor {
    /// Returns the display name for this vendor.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenRouter => "OpenRouter",
            Self::DeepSeek => "DeepSeek",
        }
    }

    /// Returns the models-list endpoint used for credential validation.
    pub fn models_url(&self) -> &'static str {
        match self {
            Self::OpenRouter => "https://openrouter.ai/api/v1/models",
            Self::DeepSeek => "https://api.deepseek.com/v1/models",
        }
    }

    /// Parses a vendor from its wire name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openrouter" => Some(Self::OpenRouter),
            "deepseek" => Some(Self::DeepSeek),
            _ => None,
        }
    }
}

impl fmt::Display for LlmVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// LLM Config
// ============================================================================

/// Configuration for the external text-generation backend.
///
/// One configuration is active at a time; the latest successful write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Selected vendor.
    #[serde(rename = "provider")]
    pub vendor: LlmVendor,
    /// Bearer API key.
    pub api_key: String,
    /// Free-form model identifier.
    pub model: String,
    /// Token budget per extraction call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl LlmConfig {
    /// Checks the key format without touching the network.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_key.len() < MIN_API_KEY_LEN {
            return Err(CoreError::Validation(format!(
                "API key must be at least {MIN_API_KEY_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    /// The built-in fallback configuration, used when nothing has been
    /// saved yet.
    fn default() -> Self {
        Self {
            vendor: LlmVendor::DeepSeek,
            api_key: DEFAULT_DEEPSEEK_API_KEY.to_string(),
            model: "deepseek-coder".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_wire_strings() {
        assert_eq!(
            serde_json::to_string(&LlmVendor::DeepSeek).unwrap(),
            "\"deepseek\""
        );
        assert_eq!(LlmVendor::parse("OpenRouter"), Some(LlmVendor::OpenRouter));
    }

    #[test]
    fn test_short_key_rejected() {
        let config = LlmConfig {
            api_key: "short".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(LlmConfig::default().validate().is_ok());
        assert_eq!(LlmConfig::default().max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_max_tokens_defaults_when_absent() {
        let config: LlmConfig = serde_json::from_str(
            r#"{"provider":"deepseek","api_key":"0123456789abcdefghij","model":"m"}"#,
        )
        .unwrap();
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }
}
