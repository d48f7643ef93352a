//! Processing result cache

use crate::error::CacheError;
use crate::store::CacheStore;
use docsift_domain::{InputPayload, ProcessingResult};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Key prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "docsift";

/// Entry lifetime used when none is configured
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Content-addressed cache of processing results
#[derive(Clone)]
pub struct ProcessingCache {
    store: Arc<dyn CacheStore>,
    prefix: String,
    ttl: Duration,
}

impl ProcessingCache {
    /// Cache over `store` with the default prefix and TTL
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            prefix: DEFAULT_PREFIX.to_string(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Replace the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the default entry lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Key prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Default entry lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Key for `payload` processed with `options`
    ///
    /// Only the payload kind and body take part; file name and caller
    /// metadata do not.
    pub fn key<O: Serialize + ?Sized>(
        &self,
        payload: &InputPayload,
        options: &O,
    ) -> Result<String, CacheError> {
        let options = canonical_json(options)?;
        Ok(format!(
            "{}:{}:{}:{}",
            self.prefix,
            payload.kind,
            sha256_hex(payload.data.as_bytes()),
            sha256_hex(options.as_bytes())
        ))
    }

    /// Cached result under `key`, marked as a cache hit
    ///
    /// Store and decoding failures are logged and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<ProcessingResult> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache get error: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<ProcessingResult>(&raw) {
            Ok(mut result) => {
                debug!("Cache hit for {}", key);
                result.cache_hit = true;
                Some(result)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Store `result` under `key` with the default TTL
    pub async fn set(&self, key: &str, result: &ProcessingResult) -> bool {
        self.set_with_ttl(key, result, self.ttl).await
    }

    /// Store `result` under `key` for `ttl`
    ///
    /// The stored copy always has `cache_hit` cleared. Returns whether the
    /// entry was written.
    pub async fn set_with_ttl(&self, key: &str, result: &ProcessingResult, ttl: Duration) -> bool {
        let stored = ProcessingResult {
            cache_hit: false,
            ..result.clone()
        };
        let encoded = match serde_json::to_string(&stored) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Cache set error: {}", e);
                return false;
            }
        };

        match self.store.set(key, encoded, ttl).await {
            Ok(()) => {
                debug!("Cached {} for {}s", key, ttl.as_secs());
                true
            }
            Err(e) => {
                warn!("Cache set error: {}", e);
                false
            }
        }
    }
}

/// JSON form of `value` with object keys sorted at every level
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CacheError> {
    let value = sort_keys(serde_json::to_value(value)?);
    Ok(serde_json::to_string(&value)?)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCacheStore;
    use async_trait::async_trait;
    use docsift_domain::{InputKind, ProcessingStrategy};
    use serde_json::json;

    fn cache() -> (ProcessingCache, MemoryCacheStore) {
        let store = MemoryCacheStore::new();
        (ProcessingCache::new(Arc::new(store.clone())), store)
    }

    fn sample_result() -> ProcessingResult {
        let mut result = ProcessingResult::new(InputKind::Text, ProcessingStrategy::TextAnalysis);
        result.success = true;
        result.text = "Revenue increased by 12.5% in 2023.".to_string();
        result.processing_stats.processing_time = 0.123456789;
        result.processing_stats.processors_used = vec!["text_processor".to_string()];
        result.metadata.insert("language".into(), json!("en"));
        result.warnings.push("minor".to_string());
        result
    }

    #[test]
    fn test_key_layout() {
        let (cache, _) = cache();
        let key = cache
            .key(&InputPayload::url("https://example.com"), &json!({"a": 1}))
            .unwrap();
        let parts: Vec<&str> = key.split(':').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "docsift");
        assert_eq!(parts[1], "url");
        assert_eq!(parts[2].len(), 64);
        assert_eq!(parts[3].len(), 64);
    }

    #[test]
    fn test_key_depends_on_payload_and_options() {
        let (cache, _) = cache();
        let options = json!({"detect_claims": true});
        let a = cache.key(&InputPayload::text("one"), &options).unwrap();
        let b = cache.key(&InputPayload::text("two"), &options).unwrap();
        let c = cache
            .key(&InputPayload::text("one"), &json!({"detect_claims": false}))
            .unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, cache.key(&InputPayload::text("one"), &options).unwrap());
    }

    #[test]
    fn test_key_ignores_filename() {
        let (cache, _) = cache();
        let a = InputPayload::binary(InputKind::Pdf, vec![1, 2, 3], "a.pdf");
        let b = InputPayload::binary(InputKind::Pdf, vec![1, 2, 3], "b.pdf");
        assert_eq!(
            cache.key(&a, &json!({})).unwrap(),
            cache.key(&b, &json!({})).unwrap()
        );
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        #[derive(Serialize)]
        struct Options {
            zeta: u8,
            alpha: Nested,
        }
        #[derive(Serialize)]
        struct Nested {
            y: bool,
            b: bool,
        }

        let json = canonical_json(&Options {
            zeta: 1,
            alpha: Nested { y: true, b: false },
        })
        .unwrap();
        assert_eq!(json, r#"{"alpha":{"b":false,"y":true},"zeta":1}"#);
    }

    #[test]
    fn test_custom_prefix() {
        let (cache, _) = cache();
        let cache = cache.with_prefix("focused");
        let key = cache.key(&InputPayload::text("x"), &json!(null)).unwrap();
        assert!(key.starts_with("focused:text:"));
    }

    #[tokio::test]
    async fn test_round_trip_flips_cache_hit() {
        let (cache, _) = cache();
        let result = sample_result();
        assert!(cache.set("k", &result).await);

        let cached = cache.get("k").await.unwrap();
        assert!(cached.cache_hit);
        assert_eq!(
            ProcessingResult {
                cache_hit: false,
                ..cached
            },
            result
        );
    }

    #[tokio::test]
    async fn test_stored_copy_never_marked_hit() {
        let (cache, store) = cache();
        let mut result = sample_result();
        result.cache_hit = true;
        cache.set("k", &result).await;

        let raw = store.get("k").await.unwrap().unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["cache_hit"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let (cache, _) = cache();
        let cache = cache.with_ttl(Duration::from_secs(60));
        cache.set("k", &sample_result()).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(cache.get("k").await.is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (cache, store) = cache();
        store
            .set("k", "{not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(cache.get("k").await.is_none());
    }

    struct FailingStore;

    #[async_trait]
    impl CacheStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Store("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Store("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_errors_are_not_fatal() {
        let cache = ProcessingCache::new(Arc::new(FailingStore));
        assert!(cache.get("k").await.is_none());
        assert!(!cache.set("k", &sample_result()).await);
    }
}
