//! In-memory page fetcher for deterministic tests
//!
//! ```
//! use docsift_web::StaticFetcher;
//!
//! let fetcher = StaticFetcher::new();
//! fetcher.add_page("https://example.com/a", "<html><body><p>Hello</p></body></html>");
//! fetcher.add_status("https://example.com/gone", 410, "");
//! assert_eq!(fetcher.call_count(), 0);
//! ```

use crate::fetcher::{FetchError, Page, PageFetcher};
use async_trait::async_trait;
use docsift_domain::ExtractionOptions;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
struct StaticPage {
    status: u16,
    body: String,
    delay: Duration,
    error: Option<String>,
}

impl Default for StaticPage {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            delay: Duration::ZERO,
            error: None,
        }
    }
}

/// Serves canned pages keyed by URL; unknown URLs answer 404
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: Arc<Mutex<HashMap<String, StaticPage>>>,
    call_count: Arc<Mutex<usize>>,
}

fn key(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl StaticFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, url: &str, apply: impl FnOnce(&mut StaticPage)) {
        let mut pages = self.pages.lock().unwrap();
        apply(pages.entry(key(url)).or_default());
    }

    /// Serve `body` with status 200 for `url`
    pub fn add_page(&self, url: &str, body: impl Into<String>) {
        self.add_status(url, 200, body);
    }

    /// Serve `body` with `status` for `url`
    pub fn add_status(&self, url: &str, status: u16, body: impl Into<String>) {
        let body = body.into();
        self.update(url, |page| {
            page.status = status;
            page.body = body;
        });
    }

    /// Delay every response for `url`
    pub fn add_delay(&self, url: &str, delay: Duration) {
        self.update(url, |page| page.delay = delay);
    }

    /// Fail every request for `url` with a transport error
    pub fn add_error(&self, url: &str, message: impl Into<String>) {
        let message = message.into();
        self.update(url, |page| page.error = Some(message));
    }

    /// Number of fetches made
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url, _options: &ExtractionOptions) -> Result<Page, FetchError> {
        *self.call_count.lock().unwrap() += 1;

        let entry = self.pages.lock().unwrap().get(url.as_str()).cloned();
        let Some(entry) = entry else {
            return Ok(Page {
                url: url.clone(),
                status: 404,
                body: String::new(),
            });
        };

        if !entry.delay.is_zero() {
            tokio::time::sleep(entry.delay).await;
        }
        if let Some(message) = entry.error {
            return Err(FetchError::Request(message));
        }
        Ok(Page {
            url: url.clone(),
            status: entry.status,
            body: entry.body,
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
