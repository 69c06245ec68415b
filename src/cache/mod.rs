//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod handle;
mod recency;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use handle::Cache;
