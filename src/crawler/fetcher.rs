//! HTTP fetcher implementation
//!
//! The crawl engine only needs "GET this URL and give me the body". That
//! capability is the [`HttpClient`] trait; [`ReqwestFetcher`] is the production
//! implementation. Status codes are not inspected: any completed round-trip is
//! treated as page content.

use crate::config::CrawlConfig;
use crate::CrawlError;
use async_trait::async_trait;
use reqwest::Client;

/// A completed GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code (informational only)
    pub status: u16,

    /// Decoded response body
    pub body: String,
}

/// Opaque "perform a GET" capability used by the crawl engine
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetches `url` and reads the whole body
    async fn get(&self, url: &str) -> Result<FetchedPage, CrawlError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent and request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use wordcrawl::config::CrawlConfig;
/// use wordcrawl::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout)
        .connect_timeout(config.request_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the underlying client from the crawl configuration
    pub fn from_config(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(config).map_err(|source| CrawlError::Http {
            url: String::new(),
            source,
        })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl HttpClient for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, CrawlError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::debug!("{} answered with status {}", url, status);
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage { status, body })
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> CrawlError {
    if error.is_timeout() {
        CrawlError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
