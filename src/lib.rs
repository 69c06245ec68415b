//! Cache Storage - A thread-safe in-process key-value cache
//!
//! Bounded capacity with least-recently-used eviction and a single TTL applied
//! to every write. Expiration is lazy: stale entries disappear when read or
//! when [`Cache::remove_expired`] is called.
//!
//! ```
//! use std::time::Duration;
//! use cache_storage::{Cache, CacheConfig};
//!
//! let cache = Cache::new(CacheConfig::new(2, Duration::from_secs(60))).unwrap();
//!
//! assert!(!cache.put("a", b"1".to_vec()));
//! assert!(!cache.put("b", b"2".to_vec()));
//! assert!(cache.get("a").is_some());
//!
//! // "b" is now least recently used and makes room for "c"
//! cache.put("c", b"3".to_vec());
//! assert!(cache.get("b").is_none());
//! assert_eq!(cache.len(), 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
