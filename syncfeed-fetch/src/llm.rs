//! LLM vendor credential validation.
//!
//! A configuration is accepted only after a live call to the vendor's
//! models-list endpoint succeeds with the supplied bearer key.

use syncfeed_core::LlmConfig;
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::error::FetchError;

/// Validates a configuration against its vendor's models-list endpoint.
///
/// The key format is checked first so malformed keys never reach the
/// network. A non-2xx response maps to `AuthenticationFailed`.
pub async fn validate_credentials(
    client: &HttpClient,
    config: &LlmConfig,
) -> Result<(), FetchError> {
    config.validate()?;

    let url = config.vendor.models_url();
    debug!(vendor = %config.vendor, url = %url, "Validating LLM credentials");

    match client.get_with_auth(url, &config.api_key).await {
        Ok(_) => {
            info!(vendor = %config.vendor, "LLM credentials accepted");
            Ok(())
        }
        Err(FetchError::AuthenticationFailed(_)) => Err(FetchError::AuthenticationFailed(format!(
            "{} rejected the supplied API key",
            config.vendor
        ))),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::LlmVendor;

    #[tokio::test]
    async fn test_short_key_fails_before_network() {
        // An unroutable vendor URL is never hit because validation fails first.
        let client = HttpClient::default();
        let config = LlmConfig {
            vendor: LlmVendor::DeepSeek,
            api_key: "short".to_string(),
            model: "deepseek-coder".to_string(),
            max_tokens: 1000,
        };
        let err = validate_credentials(&client, &config).await.unwrap_err();
        assert!(matches!(err, FetchError::Core(_)));
    }
}
