//! Selector cascade over the raw HTML
//!
//! Always compiled in. Picks the first common content container, or the body,
//! and reads title, author, date and meta tags with fixed selector lists.

use super::{fetch_page, require_text, EngineOutput, ExtractionEngine};
use crate::error::ExtractionError;
use crate::fetcher::{Page, PageFetcher};
use crate::html;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docsift_domain::{ExtractionOptions, ExtractionStrategy};
use scraper::{ElementRef, Html};
use std::sync::Arc;
use url::Url;

const CONTENT_SELECTORS: [&str; 8] = [
    "article",
    r#"[role="main"]"#,
    "main",
    ".content",
    "#content",
    ".post-content",
    ".entry-content",
    ".article-content",
];

const AUTHOR_SELECTORS: [&str; 6] = [
    r#"[rel="author"]"#,
    ".author",
    ".byline",
    r#"[itemprop="author"]"#,
    r#"meta[name="author"]"#,
    r#"meta[property="article:author"]"#,
];

const DATE_SELECTORS: [&str; 6] = [
    "time[datetime]",
    r#"[itemprop="datePublished"]"#,
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="date"]"#,
    ".date",
    ".published",
];

/// Engine that reads content through fixed CSS selector lists
pub struct CustomEngine {
    fetcher: Arc<dyn PageFetcher>,
}

impl CustomEngine {
    /// Create an engine fetching through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ExtractionEngine for CustomEngine {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Custom
    }

    async fn extract(
        &self,
        url: &Url,
        options: &ExtractionOptions,
    ) -> Result<EngineOutput, ExtractionError> {
        let page = fetch_page(self.fetcher.as_ref(), self.strategy(), url, options).await?;
        require_text(parse(&page, options), self.strategy(), url)
    }
}

fn element_value(el: ElementRef<'_>) -> Option<String> {
    let value = if el.value().name() == "meta" {
        el.value().attr("content").map(str::trim).map(str::to_string)
    } else {
        Some(html::visible_text(el))
    };
    value.filter(|v| !v.is_empty())
}

fn author(doc: &Html) -> Option<String> {
    AUTHOR_SELECTORS
        .iter()
        .filter_map(|css| html::selector(css))
        .find_map(|sel| doc.select(&sel).find_map(element_value))
}

fn publish_date(doc: &Html) -> Option<DateTime<Utc>> {
    DATE_SELECTORS
        .iter()
        .filter_map(|css| html::selector(css))
        .find_map(|sel| {
            doc.select(&sel).find_map(|el| {
                let raw = el
                    .value()
                    .attr("datetime")
                    .or_else(|| el.value().attr("content"))
                    .map(str::to_string)
                    .unwrap_or_else(|| html::visible_text(el));
                html::parse_date(&raw)
            })
        })
}

fn parse(page: &Page, options: &ExtractionOptions) -> EngineOutput {
    let doc = Html::parse_document(&page.body);

    let container = CONTENT_SELECTORS
        .iter()
        .filter_map(|css| html::selector(css))
        .find_map(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| html::body(&doc));

    let images = if options.include_images {
        html::images(html::body(&doc), &page.url)
    } else {
        Vec::new()
    };
    let links = if options.include_links {
        html::links(container, &page.url)
    } else {
        Vec::new()
    };

    EngineOutput {
        text: html::paragraph_text(container),
        title: html::title(&doc),
        author: author(&doc),
        publish_date: publish_date(&doc),
        images,
        links,
        metadata: html::meta_map(&doc),
    }
}
