//! Page fetching
//!
//! Engines never talk to the network directly; they go through a
//! [`PageFetcher`]. [`HttpFetcher`] is the production implementation and
//! [`StaticFetcher`](crate::StaticFetcher) serves canned pages in tests.

use async_trait::async_trait;
use docsift_domain::ExtractionOptions;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Redirect hops followed when redirects are enabled
pub const MAX_REDIRECTS: usize = 10;

/// Errors raised before a response body is available
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request could not be built from the options
    #[error("Invalid request configuration: {0}")]
    Config(String),

    /// Transport failure (DNS, connect, TLS, timeout)
    #[error("Request failed: {0}")]
    Request(String),

    /// The body could not be read as text
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// A fetched page, successful or not
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

impl Page {
    /// Whether the status is an HTTP error (400 and above)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Source of HTML pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` honoring the request-related options
    async fn fetch(&self, url: &Url, options: &ExtractionOptions) -> Result<Page, FetchError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Fetcher backed by `reqwest`
///
/// A client is built per request because user agent, headers, redirect and
/// TLS policy all come from the per-call options.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self
    }

    fn client(options: &ExtractionOptions) -> Result<reqwest::Client, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::Config(format!("header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Config(format!("header value for '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let redirect = if options.follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .default_headers(headers)
            .redirect(redirect)
            .danger_accept_invalid_certs(!options.verify_ssl)
            .timeout(options.engine_timeout())
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, options: &ExtractionOptions) -> Result<Page, FetchError> {
        let client = Self::client(options)?;
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        debug!("Fetched {} ({} bytes, HTTP {})", final_url, body.len(), status);
        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
