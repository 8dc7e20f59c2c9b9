//! HTTP client for the lost-property boards
//!
//! One `reqwest::Client` is built at startup and shared by every page fetch;
//! cloning [`HttpClient`] only clones the connection-pool handle.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::infrastructure::config::HttpConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds; a hung page fails instead of stalling its round
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from the `http` config section
    pub fn from_http_config(http: &HttpConfig) -> Self {
        Self {
            timeout_seconds: http.request_timeout_seconds,
            user_agent: http.user_agent.clone(),
            follow_redirects: http.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// Process-wide client, installed once by [`HttpClient::init_shared`]
static SHARED_CLIENT: OnceLock<HttpClient> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// Build the shared client at startup. Calling it twice is an error.
    pub fn init_shared(config: HttpClientConfig) -> Result<Self> {
        let client = Self::with_config(config)?;
        SHARED_CLIENT
            .set(client.clone())
            .map_err(|_| anyhow!("Shared HTTP client is already initialized"))?;
        info!(
            "🌐 Shared HTTP client initialized (timeout: {}s)",
            client.config.timeout_seconds
        );
        Ok(client)
    }

    /// Handle to the shared client; never builds a new one
    pub fn shared() -> Result<Self> {
        SHARED_CLIENT
            .get()
            .cloned()
            .context("Shared HTTP client used before HttpClient::init_shared")
    }

    /// GET `url` with the given query parameters and return the body text.
    ///
    /// Exactly one request is sent. Non-2xx statuses are errors.
    pub async fn get_text_with_query(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        debug!("Fetching {} with {} query parameters", url, query.len());

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP request failed with status {}: {}", status, url);
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }

    /// GET without query parameters
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.get_text_with_query(url, &[]).await
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
