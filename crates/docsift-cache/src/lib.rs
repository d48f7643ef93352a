//! Docsift Processing Cache
//!
//! Content-addressed cache for [`ProcessingResult`] values.
//!
//! # Architecture
//!
//! - [`ProcessingCache`] builds keys and (de)serializes results
//! - [`CacheStore`] is the key/value backend, treated as a concurrent-safe service
//! - [`MemoryCacheStore`] is the in-process backend with per-entry TTL
//!
//! Keys have the form `{prefix}:{kind}:{sha256(payload)}:{sha256(options)}`,
//! where the options are hashed over their canonical JSON form so that field
//! order never changes the key.
//!
//! Read failures are logged and reported as misses. There is no request
//! coalescing: two identical requests racing on a cold key both do the work.
//!
//! # Examples
//!
//! ```
//! use docsift_cache::{MemoryCacheStore, ProcessingCache};
//! use docsift_domain::InputPayload;
//! use std::sync::Arc;
//!
//! let cache = ProcessingCache::new(Arc::new(MemoryCacheStore::new()));
//! let key = cache
//!     .key(&InputPayload::text("hello"), &serde_json::json!({"detect_claims": true}))
//!     .unwrap();
//! assert!(key.starts_with("docsift:text:"));
//! ```
//!
//! [`ProcessingResult`]: docsift_domain::ProcessingResult

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod error;
mod store;

pub use cache::{canonical_json, ProcessingCache, DEFAULT_PREFIX, DEFAULT_TTL};
pub use error::CacheError;
pub use store::{CacheStore, MemoryCacheStore};
