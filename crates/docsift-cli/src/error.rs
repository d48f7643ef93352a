//! Error types for the CLI application.

use docsift_domain::ErrorKind;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] docsift_processor::ConfigError),

    /// Processor construction error
    #[error(transparent)]
    Processor(#[from] docsift_processor::ProcessorError),

    /// Direct web extraction error
    #[error(transparent)]
    Extraction(#[from] docsift_web::ExtractionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Failure class
    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::Config(_) | CliError::InvalidInput(_) => ErrorKind::Validation,
            CliError::Processor(e) => e.kind(),
            CliError::Extraction(e) => e.kind(),
            CliError::Io(_) | CliError::Serialization(_) => ErrorKind::Internal,
        }
    }
}
