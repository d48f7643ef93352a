//! Configuration file parsing for the processor
//!
//! One TOML file configures default request options, the web extraction
//! engines, the result cache and the optional converter and OCR endpoints.
//!
//! ```toml
//! [processing]
//! timeout_secs = 120
//! quality_threshold = "medium"
//!
//! [extraction]
//! enabled_engines = ["structured", "custom"]
//! engine_timeout_secs = 15
//!
//! [cache]
//! ttl_secs = 600
//!
//! [ocr]
//! api_key_env = "MISTRAL_API_KEY"
//! ```

use crate::options::ProcessingOptions;
use docsift_domain::{ExtractionOptions, ExtractionStrategy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Web extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Engines the registry may use, in any order
    pub enabled_engines: Vec<ExtractionStrategy>,

    /// Cap for a single engine attempt (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_timeout_secs: Option<u64>,

    /// User agent sent with page requests
    pub user_agent: String,

    /// Follow HTTP redirects
    pub follow_redirects: bool,

    /// Verify TLS certificates
    pub verify_ssl: bool,

    /// Maximum characters of page text kept
    pub max_content_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let defaults = ExtractionOptions::default();
        Self {
            enabled_engines: ExtractionStrategy::ENGINES.to_vec(),
            engine_timeout_secs: None,
            user_agent: defaults.user_agent,
            follow_redirects: defaults.follow_redirects,
            verify_ssl: defaults.verify_ssl,
            max_content_length: defaults.max_content_length,
        }
    }
}

impl ExtractionConfig {
    /// Extraction options carrying these settings
    pub fn base_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            engine_timeout_secs: self.engine_timeout_secs,
            user_agent: self.user_agent.clone(),
            follow_redirects: self.follow_redirects,
            verify_ssl: self.verify_ssl,
            max_content_length: self.max_content_length,
            ..ExtractionOptions::default()
        }
    }
}

/// Result cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Use the cache at all
    pub enabled: bool,

    /// Key prefix
    pub prefix: String,

    /// Entry lifetime (seconds)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: docsift_cache::DEFAULT_PREFIX.to_string(),
            ttl_secs: docsift_cache::DEFAULT_TTL.as_secs(),
        }
    }
}

/// Document converter endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Conversion endpoint URL
    pub endpoint: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts before giving up
    pub max_retries: u32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5001/v1/convert".to_string(),
            timeout_secs: 300,
            max_retries: 3,
        }
    }
}

/// OCR service endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR endpoint URL
    pub endpoint: String,

    /// Model name sent with each request
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts before giving up
    pub max_retries: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.mistral.ai/v1/ocr".to_string(),
            model: "mistral-ocr-latest".to_string(),
            api_key_env: "MISTRAL_API_KEY".to_string(),
            timeout_secs: 300,
            max_retries: 3,
        }
    }
}

/// Complete processor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsiftConfig {
    /// Default request options
    pub processing: ProcessingOptions,

    /// Web extraction settings
    pub extraction: ExtractionConfig,

    /// Result cache settings
    pub cache: CacheConfig,

    /// Document converter; disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converter: Option<ConverterConfig>,

    /// OCR service; disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,
}

impl DocsiftConfig {
    /// Aggressive preset: short deadlines and a short-lived cache
    pub fn aggressive() -> Self {
        Self {
            processing: ProcessingOptions {
                timeout_secs: 30,
                ..ProcessingOptions::default()
            },
            extraction: ExtractionConfig {
                engine_timeout_secs: Some(10),
                ..ExtractionConfig::default()
            },
            cache: CacheConfig {
                ttl_secs: 600,
                ..CacheConfig::default()
            },
            ..Self::default()
        }
    }

    /// Lenient preset: long deadlines and a day-long cache
    pub fn lenient() -> Self {
        Self {
            processing: ProcessingOptions {
                timeout_secs: 600,
                ..ProcessingOptions::default()
            },
            extraction: ExtractionConfig {
                engine_timeout_secs: Some(60),
                ..ExtractionConfig::default()
            },
            cache: CacheConfig {
                ttl_secs: 86_400,
                ..CacheConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.processing
            .validate()
            .map_err(|e| format!("[processing] {}", e))?;

        if self.extraction.enabled_engines.is_empty() {
            return Err("[extraction] enabled_engines cannot be empty".to_string());
        }
        if self
            .extraction
            .enabled_engines
            .contains(&ExtractionStrategy::Auto)
        {
            return Err("[extraction] enabled_engines cannot contain 'auto'".to_string());
        }
        if self.extraction.engine_timeout_secs == Some(0) {
            return Err("[extraction] engine_timeout_secs must be greater than 0".to_string());
        }
        if self.extraction.max_content_length == 0 {
            return Err("[extraction] max_content_length must be greater than 0".to_string());
        }

        if self.cache.enabled {
            if self.cache.ttl_secs == 0 {
                return Err("[cache] ttl_secs must be greater than 0".to_string());
            }
            if self.cache.prefix.is_empty() || self.cache.prefix.contains(':') {
                return Err("[cache] prefix must be non-empty and contain no ':'".to_string());
            }
        }

        if let Some(converter) = &self.converter {
            if converter.endpoint.is_empty() {
                return Err("[converter] endpoint cannot be empty".to_string());
            }
            if converter.timeout_secs == 0 || converter.max_retries == 0 {
                return Err("[converter] timeout_secs and max_retries must be greater than 0".to_string());
            }
        }

        if let Some(ocr) = &self.ocr {
            if ocr.endpoint.is_empty() || ocr.model.is_empty() {
                return Err("[ocr] endpoint and model cannot be empty".to_string());
            }
            if ocr.timeout_secs == 0 || ocr.max_retries == 0 {
                return Err("[ocr] timeout_secs and max_retries must be greater than 0".to_string());
            }
        }

        Ok(())
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: DocsiftConfig = toml::from_str(toml_str)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::QualityLevel;
    use std::io::Write;

    #[test]
    fn test_presets_are_valid() {
        assert!(DocsiftConfig::default().validate().is_ok());
        assert!(DocsiftConfig::aggressive().validate().is_ok());
        assert!(DocsiftConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_aggressive_is_tighter_than_lenient() {
        let aggressive = DocsiftConfig::aggressive();
        let lenient = DocsiftConfig::lenient();
        assert!(aggressive.processing.timeout_secs < lenient.processing.timeout_secs);
        assert!(aggressive.cache.ttl_secs < lenient.cache.ttl_secs);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [processing]
            timeout_secs = 60
            quality_threshold = "high"
            segmentation_strategy = "claim_based"

            [extraction]
            enabled_engines = ["structured", "custom"]
            engine_timeout_secs = 15

            [cache]
            enabled = false

            [ocr]
            model = "ocr-small"
        "#;

        let config = DocsiftConfig::from_toml(toml).unwrap();
        assert_eq!(config.processing.timeout_secs, 60);
        assert_eq!(config.processing.quality_threshold, QualityLevel::High);
        assert!(config.processing.include_tables);
        assert_eq!(
            config.extraction.enabled_engines,
            vec![ExtractionStrategy::Structured, ExtractionStrategy::Custom]
        );
        assert!(!config.cache.enabled);
        assert!(config.converter.is_none());

        let ocr = config.ocr.unwrap();
        assert_eq!(ocr.model, "ocr-small");
        assert_eq!(ocr.api_key_env, "MISTRAL_API_KEY");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(DocsiftConfig::from_toml("").unwrap(), DocsiftConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = DocsiftConfig::from_toml("[extraction]\nenabled_engines = []").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = DocsiftConfig::from_toml("[cache]\nprefix = \"a:b\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = DocsiftConfig::from_toml("[processing]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = DocsiftConfig::aggressive();
        config.converter = Some(ConverterConfig::default());
        let toml = config.to_toml().unwrap();
        assert_eq!(DocsiftConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nttl_secs = 42").unwrap();

        let config = DocsiftConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cache.ttl_secs, 42);

        let missing = DocsiftConfig::from_file("/nonexistent/docsift.toml");
        assert!(matches!(missing, Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_base_extraction_options() {
        let config = DocsiftConfig::aggressive();
        let options = config.extraction.base_options();
        assert_eq!(options.engine_timeout_secs, Some(10));
        assert_eq!(options.strategy, ExtractionStrategy::Auto);
    }
}
