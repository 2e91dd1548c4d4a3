//! HTTP client abstractions.

use crate::error::FetchError;
use crate::retry::RetryStrategy;
use reqwest::{Client, Response, header};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client with retry capabilities.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("syncfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Performs a GET request with a bearer token.
    pub async fn get_with_auth(&self, url: &str, token: &str) -> Result<Response, FetchError> {
        self.send_with_retry(url, || {
            self.inner.get(url).bearer_auth(token)
        })
        .await
    }

    /// Performs a JSON POST request with a bearer token.
    pub async fn post_json_with_auth<B: Serialize>(
        &self,
        url: &str,
        token: &str,
        body: &B,
    ) -> Result<Response, FetchError> {
        self.send_with_retry(url, || {
            self.inner.post(url).bearer_auth(token).json(body)
        })
        .await
    }

    /// Performs a JSON POST request with a bearer token and extra headers.
    pub async fn post_json_with_auth_headers<B: Serialize>(
        &self,
        url: &str,
        token: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> Result<Response, FetchError> {
        self.send_with_retry(url, || {
            let mut request = self.inner.post(url).bearer_auth(token).json(body);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            request
        })
        .await
    }

    /// Performs a JSON DELETE request with a bearer token.
    pub async fn delete_with_auth(&self, url: &str, token: &str) -> Result<Response, FetchError> {
        self.send_with_retry(url, || {
            self.inner.delete(url).bearer_auth(token)
        })
        .await
    }

    /// Performs a simple GET request without authentication.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        Ok(self.inner.get(url).send().await?)
    }

    /// Sends a request, retrying transient failures and honoring
    /// `Retry-After` on rate limits.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Response, FetchError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempts = 0;
        let max_attempts = self.retry_strategy.max_attempts;

        loop {
            attempts += 1;
            debug!(url = %url, attempt = attempts, "Sending request");

            match build().send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return Ok(response);
                    }

                    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after: Option<u64> = response
                            .headers()
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse().ok());

                        if attempts < max_attempts {
                            let wait = retry_after
                                .map(Duration::from_secs)
                                .unwrap_or(self.retry_strategy.base_delay);
                            warn!(wait_secs = wait.as_secs(), "Rate limited, retrying");
                            tokio::time::sleep(wait).await;
                            continue;
                        }

                        return Err(FetchError::RateLimited { retry_after });
                    }

                    if response.status() == reqwest::StatusCode::UNAUTHORIZED
                        || response.status() == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(FetchError::AuthenticationFailed(
                            "Invalid or expired credentials".to_string(),
                        ));
                    }

                    return Err(FetchError::InvalidResponse(format!(
                        "Unexpected status code: {}",
                        response.status()
                    )));
                }
                Err(e) => {
                    if attempts < max_attempts && self.retry_strategy.should_retry(&e) {
                        let delay = self.retry_strategy.delay_for_attempt(attempts);
                        warn!(
                            error = %e,
                            delay_secs = delay.as_secs(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

impl Default for HttpClient {
    /// Creates a default HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created, which only happens when
    /// the system's TLS configuration is broken.
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            panic!(
                "Failed to create default HTTP client: {e}. \
                This usually indicates a broken TLS/SSL configuration."
            )
        })
    }
}
