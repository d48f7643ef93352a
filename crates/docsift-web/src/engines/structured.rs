//! Metadata-driven article parser
//!
//! The article body comes from `rs-trafilatura`. Title, author and date
//! prefer what the publisher declares: JSON-LD `Article` objects first, then
//! OpenGraph and `article:*` meta tags, then what trafilatura found.

use super::{engine_failure, fetch_page, require_text, EngineOutput, ExtractionEngine};
use crate::error::ExtractionError;
use crate::fetcher::{Page, PageFetcher};
use crate::html::{self, MAX_IMAGES};
use async_trait::async_trait;
use docsift_domain::{ExtractionOptions, ExtractionStrategy};
use scraper::Html;
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;

const ARTICLE_TYPES: [&str; 6] = [
    "Article",
    "NewsArticle",
    "BlogPosting",
    "ReportageNewsArticle",
    "ScholarlyArticle",
    "TechArticle",
];

const AUTHOR_META: [&str; 2] = [r#"meta[name="author"]"#, r#"meta[property="article:author"]"#];

const AUTHOR_ELEMENTS: [&str; 2] = [r#"[rel="author"]"#, r#"[itemprop="author"]"#];

const DATE_META: [&str; 3] = [
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="date"]"#,
    r#"meta[name="pubdate"]"#,
];

/// Article parser driven by structured page metadata
pub struct StructuredEngine {
    fetcher: Arc<dyn PageFetcher>,
}

impl StructuredEngine {
    /// Create an engine fetching through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ExtractionEngine for StructuredEngine {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Structured
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

fn find_article(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_article),
        Value::Object(map) => {
            if let Some(found) = map.get("@graph").and_then(find_article) {
                return Some(found);
            }
            let is_article = match map.get("@type") {
                Some(Value::String(kind)) => ARTICLE_TYPES.contains(&kind.as_str()),
                Some(Value::Array(kinds)) => kinds
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|kind| ARTICLE_TYPES.contains(&kind)),
                _ => false,
            };
            is_article.then_some(value)
        }
        _ => None,
    }
}

fn json_ld_article(doc: &Html) -> Option<Value> {
    let sel = html::selector(r#"script[type="application/ld+json"]"#)?;
    doc.select(&sel).find_map(|script| {
        let raw: String = script.text().collect();
        let value: Value = serde_json::from_str(&raw).ok()?;
        find_article(&value).cloned()
    })
}

fn ld_string(article: Option<&Value>, key: &str) -> Option<String> {
    article?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn ld_author(article: Option<&Value>) -> Option<String> {
    fn name(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(map) => map.get("name")?.as_str().map(|s| s.trim().to_string()),
            _ => None,
        }
    }

    let names: Vec<String> = match article?.get("author")? {
        Value::Array(items) => items.iter().filter_map(name).collect(),
        other => name(other).into_iter().collect(),
    };
    let names: Vec<String> = names.into_iter().filter(|n| !n.is_empty()).collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn trafilatura_options(options: &ExtractionOptions) -> rs_trafilatura::Options {
    rs_trafilatura::Options {
        include_images: options.include_images,
        include_links: options.include_links,
        ..rs_trafilatura::Options::default()
    }
}

fn parse(page: &Page, options: &ExtractionOptions) -> Result<EngineOutput, String> {
    let extracted = rs_trafilatura::extract_with_options(&page.body, &trafilatura_options(options))
        .map_err(|e| e.to_string())?;

    let doc = Html::parse_document(&page.body);
    let article = json_ld_article(&doc);
    let ld = article.as_ref();

    let title = ld_string(ld, "headline")
        .or_else(|| html::first_attr(&doc, r#"meta[property="og:title"]"#, "content"))
        .or_else(|| extracted.metadata.title.clone())
        .or_else(|| html::title(&doc))
        .or_else(|| html::first_text(&doc, "h1"));

    let author = ld_author(ld)
        .or_else(|| {
            AUTHOR_META
                .iter()
                .find_map(|css| html::first_attr(&doc, css, "content"))
        })
        .or_else(|| AUTHOR_ELEMENTS.iter().find_map(|css| html::first_text(&doc, css)));

    let publish_date = ld_string(ld, "datePublished")
        .and_then(|raw| html::parse_date(&raw))
        .or_else(|| {
            DATE_META
                .iter()
                .filter_map(|css| html::first_attr(&doc, css, "content"))
                .find_map(|raw| html::parse_date(&raw))
        })
        .or_else(|| html::declared_date(&doc));

    let text = html::normalize_paragraphs(&extracted.content_text);

    let top_image = html::first_attr(&doc, r#"meta[property="og:image"]"#, "content")
        .and_then(|src| html::absolutize(&page.url, &src));

    let mut images = Vec::new();
    if options.include_images {
        images.extend(top_image.clone());
        let found = extracted
            .images
            .iter()
            .filter_map(|image| html::absolutize(&page.url, &image.src));
        for src in found {
            if images.len() >= MAX_IMAGES {
                break;
            }
            if !images.contains(&src) {
                images.push(src);
            }
        }
    }

    let links = if options.include_links {
        html::links(html::body(&doc), &page.url)
    } else {
        Vec::new()
    };

    let keywords: Vec<String> = html::first_attr(&doc, r#"meta[name="keywords"]"#, "content")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let description = html::first_attr(&doc, r#"meta[property="og:description"]"#, "content")
        .or_else(|| html::first_attr(&doc, r#"meta[name="description"]"#, "content"));

    let mut metadata = docsift_domain::Metadata::new();
    metadata.insert("top_image".into(), json!(top_image));
    metadata.insert("meta_keywords".into(), json!(keywords));
    metadata.insert("meta_description".into(), json!(description));
    metadata.insert(
        "site_name".into(),
        json!(html::first_attr(&doc, r#"meta[property="og:site_name"]"#, "content")),
    );
    metadata.insert("json_ld".into(), json!(article.is_some()));
    metadata.insert("extraction_warnings".into(), json!(extracted.warnings));

    Ok(EngineOutput {
        text,
        title,
        author,
        publish_date,
        images,
        links,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Page {
        Page {
            url: Url::parse("https://news.example.com/2024/story").unwrap(),
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_json_ld_takes_precedence() {
        let body = r#"<html><head>
            <title>Fallback title</title>
            <script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
              {"@type":"WebSite","name":"Example"},
              {"@type":["NewsArticle"],"headline":"Council approves budget",
               "author":[{"@type":"Person","name":"Ana Ruiz"},{"@type":"Person","name":"Li Wei"}],
               "datePublished":"2024-05-02T08:00:00+02:00"}
            ]}
            </script>
            <meta name="keywords" content="budget, council">
            </head><body><article><p>The council approved the budget on Tuesday.</p></article></body></html>"#;

        let output = parse(&page(body), &ExtractionOptions::default()).unwrap();
        assert_eq!(output.title.as_deref(), Some("Council approves budget"));
        assert_eq!(output.author.as_deref(), Some("Ana Ruiz, Li Wei"));
        assert_eq!(
            output.publish_date.unwrap().to_rfc3339(),
            "2024-05-02T06:00:00+00:00"
        );
        assert_eq!(output.metadata["json_ld"], true);
        assert_eq!(output.metadata["meta_keywords"], json!(["budget", "council"]));
    }

    #[test]
    fn test_meta_fallbacks_and_images() {
        let body = r#"<html><head>
            <meta property="og:title" content="Bridge reopens">
            <meta property="og:image" content="https://cdn.example.com/bridge.jpg">
            <meta property="article:published_time" content="2024-01-15">
            </head><body>
            <div class="author" rel="author">Sam Patel</div>
            <main><p>The bridge reopened after repairs.</p><img src="/img/1.jpg"></main>
            </body></html>"#;

        let options = ExtractionOptions {
            include_images: true,
            ..Default::default()
        };
        let output = parse(&page(body), &options).unwrap();
        assert_eq!(output.title.as_deref(), Some("Bridge reopens"));
        assert_eq!(output.author.as_deref(), Some("Sam Patel"));
        assert!(output.publish_date.is_some());
        assert_eq!(output.images[0], "https://cdn.example.com/bridge.jpg");
        assert!(output.images.len() <= MAX_IMAGES);
        assert!(output.images.iter().all(|src| src.starts_with("https://")));
        assert_eq!(output.metadata["json_ld"], false);
    }

    #[test]
    fn test_images_omitted_unless_requested() {
        let body = r#"<html><body><article><p>Text here.</p><img src="/a.png"></article></body></html>"#;
        let output = parse(&page(body), &ExtractionOptions::default()).unwrap();
        assert!(output.images.is_empty());
        assert!(output.links.is_empty());
    }

    #[test]
    fn test_body_text_from_article() {
        let body = r#"<html><head><title>Harbour report</title></head><body>
            <nav><a href="/">Home</a> <a href="/news">News</a></nav>
            <article>
              <p>Harbour traffic rose during the week as more container ships arrived from Asia, and the
              port authority said that the number of berths in use reached its highest level in years.</p>
              <p>Port officials expect the increase to continue through the end of the month, although
              crane maintenance planned for April could slow the unloading of the largest vessels.</p>
            </article>
            <footer>Copyright Port News</footer>
            </body></html>"#;

        let output = parse(&page(body), &ExtractionOptions::default()).unwrap();
        assert!(output.text.contains("Harbour traffic rose"));
        assert!(output.text.contains("Port officials expect"));
        assert!(!output.text.contains("Copyright"));
        assert!(output.text.lines().all(|line| line.trim() == line));
        assert_eq!(output.title.as_deref(), Some("Harbour report"));
    }
}
