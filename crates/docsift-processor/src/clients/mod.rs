//! HTTP clients for the external collaborators
//!
//! Both clients send JSON bodies with base64 payloads and retry transport
//! errors, rate limiting and 5xx answers with exponential backoff (1s, 2s,
//! 4s, ... up to one minute). Other client errors fail at once.

mod converter;
mod ocr;

pub use converter::HttpDocumentConverter;
pub use ocr::{estimate_confidence, estimate_page_count, markdown_tables, HttpOcrService};

use docsift_domain::CollaboratorError;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Wait after the `attempt`-th failed attempt, counting from 1
fn backoff(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, CollaboratorError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CollaboratorError::NotConfigured(format!("Failed to build HTTP client: {}", e)))
}

async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &Value,
    api_key: Option<&str>,
    max_retries: u32,
) -> Result<Value, CollaboratorError> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        let mut request = client.post(url).json(body);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<Value>().await.map_err(|e| {
                        CollaboratorError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                }

                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        return Err(CollaboratorError::NotConfigured(format!(
                            "Authentication failed: {}",
                            error_text
                        )));
                    }
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                        return Err(CollaboratorError::UnsupportedFormat(error_text));
                    }
                    StatusCode::TOO_MANY_REQUESTS => {
                        last_error = Some(CollaboratorError::RateLimited);
                    }
                    s if s.is_server_error() => {
                        last_error = Some(CollaboratorError::Communication(format!(
                            "HTTP {}: {}",
                            s, error_text
                        )));
                    }
                    s => {
                        return Err(CollaboratorError::Failed(format!("HTTP {}: {}", s, error_text)));
                    }
                }
            }
            Err(e) => {
                last_error = Some(CollaboratorError::Communication(format!(
                    "Request failed: {}",
                    e
                )));
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = backoff(attempts);
            warn!("Request to {} failed, retrying in {}s", url, delay.as_secs());
            tokio::time::sleep(delay).await;
        } else {
            debug!("Giving up on {} after {} attempts", url, attempts);
        }
    }

    Err(last_error
        .unwrap_or_else(|| CollaboratorError::Communication("Max retries exceeded".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_bounded() {
        assert_eq!(backoff(7), MAX_BACKOFF);
        assert_eq!(backoff(65), MAX_BACKOFF);
        assert_eq!(backoff(u32::MAX), MAX_BACKOFF);
        assert_eq!(backoff(0), Duration::from_secs(1));
    }
}
