//! Web content extraction values

use crate::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Extraction engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Let the extractor choose based on the URL
    #[default]
    Auto,
    /// Metadata-driven article parser
    Structured,
    /// Mozilla Readability article selection
    Readability,
    /// jusText boilerplate removal
    Boilerplate,
    /// Selector cascade over the raw HTML
    Custom,
}

impl ExtractionStrategy {
    /// Concrete engines, excluding `Auto`
    pub const ENGINES: [ExtractionStrategy; 4] = [
        ExtractionStrategy::Structured,
        ExtractionStrategy::Readability,
        ExtractionStrategy::Boilerplate,
        ExtractionStrategy::Custom,
    ];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::Auto => "auto",
            ExtractionStrategy::Structured => "structured",
            ExtractionStrategy::Readability => "readability",
            ExtractionStrategy::Boilerplate => "boilerplate",
            ExtractionStrategy::Custom => "custom",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ExtractionStrategy::Auto),
            "structured" => Ok(ExtractionStrategy::Structured),
            "readability" => Ok(ExtractionStrategy::Readability),
            "boilerplate" => Ok(ExtractionStrategy::Boilerplate),
            "custom" => Ok(ExtractionStrategy::Custom),
            other => Err(format!("Unknown extraction strategy: {}", other)),
        }
    }
}

/// Content category inferred from a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    /// News outlet article
    NewsArticle,
    /// Blog platform post
    BlogPost,
    /// Academic or preprint source
    AcademicPaper,
    /// Wikipedia page
    Wikipedia,
    /// Social media post
    SocialMedia,
    /// Forum thread
    ForumPost,
    /// Commercial product page
    ProductPage,
    /// Technical documentation
    Documentation,
    /// Anything else
    General,
}

impl ContentType {
    /// Prior trust score for content of this category
    pub fn trust_prior(&self) -> f64 {
        match self {
            ContentType::NewsArticle => 0.8,
            ContentType::AcademicPaper => 0.9,
            ContentType::Wikipedia => 0.8,
            ContentType::SocialMedia => 0.3,
            ContentType::BlogPost => 0.6,
            _ => 0.5,
        }
    }
}

/// Options controlling a single URL extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Preferred engine
    pub strategy: ExtractionStrategy,
    /// Overall deadline for the call (seconds)
    pub timeout_secs: u64,
    /// Cap for a single engine attempt; defaults to `timeout_secs`
    pub engine_timeout_secs: Option<u64>,
    /// Maximum characters of text kept
    pub max_content_length: usize,
    /// Attach URL analysis, language and engine metadata
    pub include_metadata: bool,
    /// Return image URLs
    pub include_images: bool,
    /// Return outbound links
    pub include_links: bool,
    /// Minimum acceptable quality score
    pub quality_threshold: f64,
    /// User agent sent with page requests
    pub user_agent: String,
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
    /// Follow HTTP redirects
    pub follow_redirects: bool,
    /// Verify TLS certificates
    pub verify_ssl: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::Auto,
            timeout_secs: 30,
            engine_timeout_secs: None,
            max_content_length: 1_000_000,
            include_metadata: true,
            include_images: false,
            include_links: false,
            quality_threshold: 0.3,
            user_agent: "Mozilla/5.0 (compatible; docsift/0.1; +https://github.com/your-org/docsift)"
                .to_string(),
            headers: BTreeMap::new(),
            follow_redirects: true,
            verify_ssl: true,
        }
    }
}

impl ExtractionOptions {
    /// Overall deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Per-engine attempt cap as a Duration
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs.unwrap_or(self.timeout_secs))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(format!(
                "quality_threshold must be within [0, 1], got {}",
                self.quality_threshold
            ));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.engine_timeout_secs == Some(0) {
            return Err("engine_timeout_secs must be greater than 0".to_string());
        }
        if self.max_content_length == 0 {
            return Err("max_content_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Content extracted from a web page by the winning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Source URL
    pub url: String,
    /// Page title
    pub title: Option<String>,
    /// Main text
    pub text: String,
    /// Author line
    pub author: Option<String>,
    /// Publication date
    pub publish_date: Option<DateTime<Utc>>,
    /// Engine that produced the result
    pub strategy_used: ExtractionStrategy,
    /// URL category
    pub content_type: ContentType,
    /// Quality score in [0, 1]
    pub quality_score: f64,
    /// Detected language code
    pub language: Option<String>,
    /// Absolute image URLs
    pub images: Vec<String>,
    /// Outbound links
    pub links: Vec<String>,
    /// Engine metadata plus URL analysis
    pub metadata: Metadata,
    /// Wall-clock extraction time (seconds)
    pub processing_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = ExtractionOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.engine_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_threshold() {
        let options = ExtractionOptions {
            quality_threshold: 1.5,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: ExtractionOptions =
            serde_json::from_str(r#"{"strategy":"readability","quality_threshold":0.6}"#).unwrap();
        assert_eq!(options.strategy, ExtractionStrategy::Readability);
        assert_eq!(options.timeout_secs, 30);
        assert!(options.follow_redirects);
    }

    #[test]
    fn test_content_type_priors() {
        assert_eq!(ContentType::NewsArticle.trust_prior(), 0.8);
        assert_eq!(ContentType::AcademicPaper.trust_prior(), 0.9);
        assert_eq!(ContentType::SocialMedia.trust_prior(), 0.3);
        assert_eq!(ContentType::Documentation.trust_prior(), 0.5);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "Boilerplate".parse::<ExtractionStrategy>().unwrap(),
            ExtractionStrategy::Boilerplate
        );
        assert!("newspaper".parse::<ExtractionStrategy>().is_err());
    }
}
