//! Error types for text processing

use docsift_domain::ErrorKind;
use thiserror::Error;

/// Errors that can occur during text processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextError {
    /// Input shorter than the processing minimum
    #[error("Text too short {stage}: {length} chars")]
    TextTooShort {
        /// Length in characters at the failing stage
        length: usize,
        /// `before cleaning` or `after cleaning`
        stage: &'static str,
    },

    /// Claim detection failed
    #[error("Claim detection failed: {0}")]
    ClaimDetection(String),

    /// Options failed validation
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Unexpected processing failure
    #[error("Processing error: {0}")]
    Processing(String),
}

impl TextError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TextError::TextTooShort { .. } => ErrorKind::TextTooShort,
            TextError::ClaimDetection(_) => ErrorKind::ClaimDetection,
            TextError::InvalidOptions(_) => ErrorKind::Validation,
            TextError::Processing(_) => ErrorKind::Internal,
        }
    }
}
