//! Error types for document processing
//!
//! These never leave [`FocusedDocumentProcessor::process_document`]; they are turned
//! into a failed [`ProcessingResult`] at the boundary.
//!
//! [`FocusedDocumentProcessor::process_document`]: crate::FocusedDocumentProcessor::process_document
//! [`ProcessingResult`]: docsift_domain::ProcessingResult

use crate::config::ConfigError;
use docsift_domain::{CollaboratorError, ErrorKind};
use docsift_text::TextError;
use docsift_web::ExtractionError;
use thiserror::Error;

/// Errors that can occur while processing a document
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Payload shape or size is not acceptable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Options failed validation
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A collaborator needed for this input is not configured
    #[error("{0} not available")]
    Unavailable(&'static str),

    /// A collaborator call failed
    #[error("{processor} processing failed: {source}")]
    Collaborator {
        /// Collaborator name
        processor: &'static str,
        /// Underlying failure
        #[source]
        source: CollaboratorError,
    },

    /// Web extraction failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Text processing failed
    #[error(transparent)]
    Text(#[from] TextError),

    /// Every collaborator attempt failed
    #[error("No processor produced a result: {0}")]
    NoResult(String),

    /// The request deadline expired
    #[error("Processing timed out after {0}s")]
    Timeout(u64),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProcessorError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessorError::InvalidInput(_)
            | ProcessorError::InvalidOptions(_)
            | ProcessorError::Config(_) => ErrorKind::Validation,
            ProcessorError::Unavailable(_) => ErrorKind::EngineUnavailable,
            ProcessorError::Collaborator { .. } => ErrorKind::Collaborator,
            ProcessorError::Extraction(e) => e.kind(),
            ProcessorError::Text(e) => e.kind(),
            ProcessorError::NoResult(_) => ErrorKind::ExtractionFailure,
            ProcessorError::Timeout(_) => ErrorKind::TimeoutExceeded,
        }
    }
}
