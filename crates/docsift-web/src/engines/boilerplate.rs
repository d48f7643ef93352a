//! jusText boilerplate removal
//!
//! `justext` classifies every paragraph by length, stop-word density and link
//! density, then revises short blocks from their neighbours. The stop-word
//! list follows the language `whatlang` detects in the page text.

use super::{fetch_page, require_text, EngineOutput, ExtractionEngine};
use crate::error::ExtractionError;
use crate::fetcher::{Page, PageFetcher};
use crate::html;
use async_trait::async_trait;
use docsift_domain::{ExtractionOptions, ExtractionStrategy, Metadata};
use justext::Config;
use scraper::Html;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const FALLBACK_STOPLIST: &str = "English";

/// Paragraph classifier backed by `justext`
pub struct BoilerplateEngine {
    fetcher: Arc<dyn PageFetcher>,
    config: Config,
}

impl BoilerplateEngine {
    /// Create an engine fetching through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            config: Config::default(),
        }
    }
}

#[async_trait]
impl ExtractionEngine for BoilerplateEngine {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Boilerplate
    }

    async fn extract(
        &self,
        url: &Url,
        options: &ExtractionOptions,
    ) -> Result<EngineOutput, ExtractionError> {
        let page = fetch_page(self.fetcher.as_ref(), self.strategy(), url, options).await?;
        require_text(parse(&page, &self.config, options), self.strategy(), url)
    }
}

/// Stop-word list for the detected language, English when unknown or unsupported
fn stoplist_for(sample: &str) -> (&'static str, HashSet<String>) {
    let detected = whatlang::detect(sample).map(|info| info.lang().eng_name());
    if let Some(language) = detected {
        if let Ok(stoplist) = justext::get_stoplist(language) {
            return (language, stoplist);
        }
        debug!("No stop-word list for {}, using {}", language, FALLBACK_STOPLIST);
    }
    let stoplist = justext::get_stoplist(FALLBACK_STOPLIST).unwrap_or_default();
    (FALLBACK_STOPLIST, stoplist)
}

fn parse(page: &Page, config: &Config, options: &ExtractionOptions) -> EngineOutput {
    let doc = Html::parse_document(&page.body);
    let body = html::body(&doc);
    let (language, stoplist) = stoplist_for(&html::visible_text(body));

    let paragraphs = justext::justext(&page.body, &stoplist, config);
    let total = paragraphs.len();
    let kept: Vec<String> = paragraphs
        .into_iter()
        .filter(|p| !p.is_boilerplate())
        .map(|p| html::collapse_ws(&p.text))
        .filter(|text| !text.is_empty())
        .collect();

    let title = html::first_attr(&doc, r#"meta[property="og:title"]"#, "content")
        .or_else(|| html::title(&doc));
    let author = html::first_attr(&doc, r#"meta[name="author"]"#, "content");

    let images = if options.include_images {
        html::images(body, &page.url)
    } else {
        Vec::new()
    };
    let links = if options.include_links {
        html::links(body, &page.url)
    } else {
        Vec::new()
    };

    let mut metadata = Metadata::new();
    metadata.insert(
        "sitename".into(),
        json!(html::first_attr(&doc, r#"meta[property="og:site_name"]"#, "content")),
    );
    metadata.insert(
        "description".into(),
        json!(html::first_attr(&doc, r#"meta[name="description"]"#, "content")),
    );
    metadata.insert("stoplist".into(), json!(language));
    metadata.insert("paragraphs_total".into(), json!(total));
    metadata.insert("paragraphs_kept".into(), json!(kept.len()));

    EngineOutput {
        text: kept.join("\n\n"),
        title,
        author,
        publish_date: html::declared_date(&doc),
        images,
        links,
        metadata,
    }
}
