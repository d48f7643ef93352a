//! Error types for web extraction

use docsift_domain::{ErrorKind, ExtractionStrategy};
use thiserror::Error;

/// Errors that can occur while extracting content from a URL
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The URL could not be parsed or is not an absolute http(s) URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected input
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Extraction options failed validation
    #[error("Invalid extraction options: {0}")]
    InvalidOptions(String),

    /// No engine is compiled in and enabled
    #[error("No extraction strategies available")]
    NoEngineAvailable,

    /// A single engine attempt failed
    #[error("{strategy} extraction failed for {url}: {message}")]
    Engine {
        /// Engine that failed
        strategy: ExtractionStrategy,
        /// Requested URL
        url: String,
        /// HTTP status when the page request was rejected
        status_code: Option<u16>,
        /// Failure description
        message: String,
    },

    /// Every attempted engine failed without producing content
    #[error("All {attempts} extraction attempts failed for {url}: {last_error}")]
    AllEnginesFailed {
        /// Requested URL
        url: String,
        /// Number of engine attempts made
        attempts: usize,
        /// Message of the last failure
        last_error: String,
    },

    /// The best result scored under the requested threshold
    #[error("Content quality too low for {url}: {achieved:.2} < {threshold:.2}")]
    QualityBelowThreshold {
        /// Requested URL
        url: String,
        /// Best score reached
        achieved: f64,
        /// Requested minimum
        threshold: f64,
    },

    /// The overall deadline passed
    #[error("Extraction timed out after {timeout_secs}s for {url}")]
    Timeout {
        /// Requested URL
        url: String,
        /// Configured overall timeout
        timeout_secs: u64,
    },
}

impl ExtractionError {
    /// Discriminant shared across the workspace
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::InvalidUrl { .. } | ExtractionError::InvalidOptions(_) => {
                ErrorKind::Validation
            }
            ExtractionError::NoEngineAvailable => ErrorKind::EngineUnavailable,
            ExtractionError::Engine { .. } | ExtractionError::AllEnginesFailed { .. } => {
                ErrorKind::ExtractionFailure
            }
            ExtractionError::QualityBelowThreshold { .. } => ErrorKind::QualityBelowThreshold,
            ExtractionError::Timeout { .. } => ErrorKind::TimeoutExceeded,
        }
    }

    /// HTTP status carried by an engine failure
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ExtractionError::Engine { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err = ExtractionError::QualityBelowThreshold {
            url: "https://example.com/a".to_string(),
            achieved: 0.25,
            threshold: 0.95,
        };
        assert_eq!(err.kind(), ErrorKind::QualityBelowThreshold);
        assert_eq!(
            err.to_string(),
            "Content quality too low for https://example.com/a: 0.25 < 0.95"
        );

        assert_eq!(ExtractionError::NoEngineAvailable.kind(), ErrorKind::EngineUnavailable);
    }

    #[test]
    fn test_status_code() {
        let err = ExtractionError::Engine {
            strategy: ExtractionStrategy::Custom,
            url: "https://example.com/missing".to_string(),
            status_code: Some(404),
            message: "HTTP 404".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.kind(), ErrorKind::ExtractionFailure);
    }
}
