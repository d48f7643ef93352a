//! Document converter over HTTP

use super::{build_client, post_json};
use crate::config::ConverterConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use docsift_domain::{CollaboratorError, ConvertedDocument, DocumentConverter};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Client for a document conversion service
///
/// Posts `{"filename", "content"}` (content base64 encoded) to the endpoint
/// and expects a JSON [`ConvertedDocument`] back. Missing fields default.
pub struct HttpDocumentConverter {
    endpoint: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpDocumentConverter {
    /// Create a client from configuration
    pub fn new(config: &ConverterConfig) -> Result<Self, CollaboratorError> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            max_retries: config.max_retries,
        })
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentConverter for HttpDocumentConverter {
    async fn convert(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ConvertedDocument, CollaboratorError> {
        debug!("Converting {} ({} bytes) via {}", filename, bytes.len(), self.endpoint);
        let body = json!({
            "filename": filename,
            "content": STANDARD.encode(bytes),
        });

        let response = post_json(&self.client, &self.endpoint, &body, None, self.max_retries).await?;
        serde_json::from_value(response).map_err(|e| {
            CollaboratorError::InvalidResponse(format!("Unexpected converter response: {}", e))
        })
    }

    fn name(&self) -> &'static str {
        "http-converter"
    }
}
