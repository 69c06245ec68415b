//! Shared Cache Handle
//!
//! Thread-safe front for the cache store. One mutex guards the index, the
//! recency list and the entry count as a single unit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::cache::store::{CacheStore, Lookup};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// In-process key-value cache with LRU eviction and lazy TTL expiration.
///
/// Every operation, reads included, takes the same exclusive lock: a read
/// promotes the entry in the recency order and may drop it if it expired.
/// Share across threads with `Arc<Cache>`.
///
/// Expired entries are only removed when read or when [`Cache::remove_expired`]
/// is called, so [`Cache::len`] can count entries that are already stale.
#[derive(Debug)]
pub struct Cache {
    store: Mutex<CacheStore>,
    config: CacheConfig,
}

impl Cache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// Fails with [`CacheError::InvalidConfig`](crate::CacheError::InvalidConfig)
    /// if the capacity is zero.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        info!(
            capacity = config.capacity,
            ttl_ms = config.ttl.as_millis() as u64,
            "cache initialized"
        );
        Ok(Self {
            store: Mutex::new(CacheStore::new(&config)),
            config,
        })
    }

    /// Creates a cache configured from `CACHE_CAPACITY` and `CACHE_TTL_MS`.
    pub fn from_env() -> Result<Self> {
        Self::new(CacheConfig::from_env()?)
    }

    // == Get ==
    /// Returns the value stored under `key` if present and not expired.
    ///
    /// A hit makes the entry the most recently used one. An expired entry is
    /// removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<Arc<[u8]>> {
        let lookup = {
            let mut store = self.store.lock();
            store.get(key, Instant::now())
        };

        match lookup {
            Lookup::Hit(value) => {
                trace!(key, "cache hit");
                Some(value)
            }
            Lookup::Miss => {
                trace!(key, "cache miss");
                None
            }
            Lookup::Expired => {
                debug!(key, "dropped expired entry on read");
                None
            }
        }
    }

    // == Put ==
    /// Stores `value` under `key`, restarting its TTL.
    ///
    /// Returns `true` if the key already existed. Inserting a new key into a
    /// full cache evicts the least recently used entry first, whether or not
    /// it has expired.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Arc<[u8]>>) -> bool {
        let key = key.into();
        let value = value.into();

        let upsert = {
            let mut store = self.store.lock();
            store.put(key.clone(), value, Instant::now())
        };

        if !upsert.evicted.is_empty() {
            debug!(key = %key, evicted = ?upsert.evicted, "evicted least recently used entries");
        }
        trace!(key = %key, hit = upsert.hit, "cache put");
        upsert.hit
    }

    // == Delete ==
    /// Removes `key` whether or not it has expired.
    ///
    /// Returns `true` if the key existed.
    pub fn delete(&self, key: &str) -> bool {
        let hit = self.store.lock().delete(key);
        trace!(key, hit, "cache delete");
        hit
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        let removed = self.store.lock().clear();
        debug!(removed, "cache cleared");
    }

    // == Length ==
    /// Returns the number of entries held, including expired entries that
    /// have not been read or swept yet.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// TTL applied to every write.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    // == Remove Expired ==
    /// Removes every expired entry and returns how many were removed.
    ///
    /// This is the only way to reclaim entries that expire without being
    /// read again. The cache never schedules it on its own.
    pub fn remove_expired(&self) -> usize {
        let removed = {
            let mut store = self.store.lock();
            store.remove_expired(Instant::now())
        };

        if removed > 0 {
            debug!(removed, "removed expired entries");
        } else {
            trace!("no expired entries found");
        }
        removed
    }
}
