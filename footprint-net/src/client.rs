//! HTTP transport
//!
//! The scan only needs one capability from the network: fetch a URL and
//! report the final status (and body, for extraction). [`Fetcher`] captures
//! that; [`HttpFetcher`] is the reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::{redirect, Client, Proxy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Descriptive user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; Footprint-OSINT-Research/0.1; ",
    "+https://github.com/footprint-osint/footprint)"
);

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 4;

/// Longest accepted per-request timeout
pub const MAX_TIMEOUT_SECS: u64 = 60;

const MAX_REDIRECTS: usize = 10;

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Optional outbound proxy (http://, https:// or socks5h://)
    pub proxy: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Errors from the transport layer
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// A fetched page after redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub final_url: String,
    pub body: String,
}

/// Network capability used by the prober and extractor
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Final HTTP status for a URL, following redirects
    async fn status(&self, url: &str) -> Result<u16, FetchError>;

    /// Full page for a URL, following redirects
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Create an HTTP client for probing
pub fn create_client(config: &FetchConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .redirect(redirect::Policy::limited(MAX_REDIRECTS));

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy)
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FetchError::ClientBuild(e.to_string()))
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: create_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn status(&self, url: &str) -> Result<u16, FetchError> {
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(FetchedPage {
            status,
            final_url,
            body,
        })
    }
}
