//! Cache errors

use docsift_domain::ErrorKind;
use thiserror::Error;

/// Errors that can occur in cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// A value could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store failed
    #[error("Cache store error: {0}")]
    Store(String),
}

impl CacheError {
    /// Discriminant for callers matching on error kind
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}
