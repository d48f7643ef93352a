//! URL classification
//!
//! Pure and deterministic: the domain is matched against static keyword
//! groups, checked in the order news, academic, wikipedia, social, blog. A
//! later group that matches overrides the category and trust prior of an
//! earlier one, while the `is_*` flags accumulate.

use docsift_domain::ContentType;
use serde::{Deserialize, Serialize};
use url::Url;

const NEWS_INDICATORS: [&str; 8] = [
    "news", "cnn", "bbc", "reuters", "apnews", "nytimes", "guardian", "wsj",
];

const ACADEMIC_INDICATORS: [&str; 6] = [".edu", "arxiv", "scholar", "pubmed", "jstor", "springer"];

const SOCIAL_INDICATORS: [&str; 5] = ["twitter", "facebook", "instagram", "linkedin", "reddit"];

const BLOG_INDICATORS: [&str; 4] = ["blog", "medium.com", "substack", "wordpress"];

/// Path, query and fragment of an analyzed URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlComponents {
    /// URL path, `/` when empty
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    /// Fragment without the leading `#`
    pub fragment: Option<String>,
}

/// Result of classifying a URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlAnalysis {
    /// The analyzed URL
    pub url: String,
    /// Lowercased host, with the port when one is given
    pub domain: String,
    /// Inferred category
    pub content_type: ContentType,
    /// Domain matched a news keyword
    pub is_news_site: bool,
    /// Domain matched an academic keyword
    pub is_academic: bool,
    /// Domain matched a social media keyword
    pub is_social_media: bool,
    /// Prior trust for the category
    pub trust_score: f64,
    /// Remaining URL parts
    pub metadata: UrlComponents,
}

/// Classify `url` by its domain
pub fn analyze_url(url: &Url) -> UrlAnalysis {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let domain = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    };
    let matches = |indicators: &[&str]| indicators.iter().any(|i| domain.contains(i));

    let mut content_type = ContentType::General;
    let mut is_news_site = false;
    let mut is_academic = false;
    let mut is_social_media = false;

    if matches(&NEWS_INDICATORS) {
        content_type = ContentType::NewsArticle;
        is_news_site = true;
    }
    if matches(&ACADEMIC_INDICATORS) {
        content_type = ContentType::AcademicPaper;
        is_academic = true;
    }
    if domain.contains("wikipedia.org") {
        content_type = ContentType::Wikipedia;
    }
    if matches(&SOCIAL_INDICATORS) {
        content_type = ContentType::SocialMedia;
        is_social_media = true;
    }
    if matches(&BLOG_INDICATORS) {
        content_type = ContentType::BlogPost;
    }

    UrlAnalysis {
        url: url.to_string(),
        domain,
        content_type,
        is_news_site,
        is_academic,
        is_social_media,
        trust_score: content_type.trust_prior(),
        metadata: UrlComponents {
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
        },
    }
}
