//! Readability engine
//!
//! Runs `readabilityrs`, the port of Mozilla Readability, over the fetched
//! page. The article it selects is re-parsed to split paragraphs and to
//! collect images and links relative to the page URL.

use super::{engine_failure, fetch_page, require_text, EngineOutput, ExtractionEngine};
use crate::error::ExtractionError;
use crate::fetcher::{Page, PageFetcher};
use crate::html;
use async_trait::async_trait;
use docsift_domain::{ExtractionOptions, ExtractionStrategy, Metadata};
use readabilityrs::Readability;
use scraper::Html;
use serde_json::json;
use std::sync::Arc;
use url::Url;

/// Mozilla Readability backed engine
pub struct ReadabilityEngine {
    fetcher: Arc<dyn PageFetcher>,
}

impl ReadabilityEngine {
    /// Create an engine fetching through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ExtractionEngine for ReadabilityEngine {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Readability
    }

    async fn extract(
        &self,
        url: &Url,
        options: &ExtractionOptions,
    ) -> Result<EngineOutput, ExtractionError> {
        let page = fetch_page(self.fetcher.as_ref(), self.strategy(), url, options).await?;
        let output =
            parse(&page, options).map_err(|message| engine_failure(self.strategy(), url, message))?;
        require_text(output, self.strategy(), url)
    }
}

fn parse(page: &Page, options: &ExtractionOptions) -> Result<EngineOutput, String> {
    let readability = Readability::new(&page.body, Some(page.url.as_str()), None)
        .map_err(|e| e.to_string())?;
    let Some(article) = readability.parse() else {
        return Ok(EngineOutput::default());
    };

    let doc = Html::parse_document(&page.body);
    let content = Html::parse_fragment(article.content.as_deref().unwrap_or_default());
    let root = content.root_element();

    let text = html::paragraph_text(root);
    let title = article
        .title
        .map(|t| html::collapse_ws(&t))
        .filter(|t| !t.is_empty())
        .or_else(|| html::title(&doc));
    let author = article
        .byline
        .map(|b| html::collapse_ws(&b))
        .filter(|b| !b.is_empty())
        .or_else(|| html::first_attr(&doc, r#"meta[name="author"]"#, "content"));

    let images = if options.include_images {
        html::images(root, &page.url)
    } else {
        Vec::new()
    };
    let links = if options.include_links {
        html::links(root, &page.url)
    } else {
        Vec::new()
    };

    let mut metadata = Metadata::new();
    metadata.insert("article_length".into(), json!(text.chars().count()));
    metadata.insert(
        "description".into(),
        json!(html::first_attr(&doc, r#"meta[name="description"]"#, "content")),
    );

    Ok(EngineOutput {
        text,
        title,
        author,
        publish_date: html::declared_date(&doc),
        images,
        links,
        metadata,
    })
}
