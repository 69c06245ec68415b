//! Cache Store Module
//!
//! Cache engine combining a HashMap index with the recency list and TTL
//! expiration. Not synchronized: `Cache` owns it behind a single lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::recency::{Handle, RecencyList};
use crate::cache::CacheEntry;
use crate::config::CacheConfig;

/// Result of a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Live entry found and promoted to most recently used
    Hit(Arc<[u8]>),
    /// No entry under the key
    Miss,
    /// Entry was present but stale; it has been removed
    Expired,
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Upsert {
    /// The key existed before the call
    pub hit: bool,
    /// Keys evicted to make room, oldest first
    pub evicted: Vec<String>,
}

// == Cache Store ==
/// Index, recency list and policy, mutated together.
///
/// Every key in `index` has exactly one node in `order` and vice versa, so
/// `index.len()` is the live entry count. That count can include entries
/// that already expired but were not read or swept yet.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to node handle
    index: HashMap<String, Handle>,
    /// Entries from most to least recently used
    order: RecencyList,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied on every write
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. The config must already be validated.
    pub fn new(config: &CacheConfig) -> Self {
        debug_assert!(config.capacity > 0, "capacity must be validated before use");
        Self {
            index: HashMap::with_capacity(config.capacity.min(1024)),
            order: RecencyList::new(),
            capacity: config.capacity,
            ttl: config.ttl,
        }
    }

    // == Get ==
    /// Looks a key up as of `now`.
    ///
    /// A live entry moves to the head of the recency list. A stale one is
    /// removed on the spot, which is why reads need exclusive access.
    pub fn get(&mut self, key: &str, now: Instant) -> Lookup {
        let Some(&handle) = self.index.get(key) else {
            return Lookup::Miss;
        };

        if self.order.entry(handle).is_expired_at(now) {
            self.unlink(handle);
            return Lookup::Expired;
        }

        self.order.move_to_front(handle);
        Lookup::Hit(Arc::clone(&self.order.entry(handle).value))
    }

    // == Put ==
    /// Inserts or overwrites a key, restarting its TTL from `now`.
    ///
    /// Overwrites never change the entry count, so capacity is only checked
    /// for new keys. Eviction takes the tail whether or not it has expired.
    pub fn put(&mut self, key: String, value: Arc<[u8]>, now: Instant) -> Upsert {
        if let Some(&handle) = self.index.get(&key) {
            self.order.entry_mut(handle).refresh(value, self.ttl, now);
            self.order.move_to_front(handle);
            return Upsert {
                hit: true,
                evicted: Vec::new(),
            };
        }

        let mut evicted = Vec::new();
        while self.index.len() >= self.capacity {
            let Some((oldest, _)) = self.order.pop_back() else {
                panic!(
                    "cache index holds {} keys but the recency list is empty",
                    self.index.len()
                );
            };
            let removed = self.index.remove(&oldest);
            debug_assert!(removed.is_some(), "evicted key missing from index");
            evicted.push(oldest);
        }

        let entry = CacheEntry::new(value, self.ttl, now);
        let handle = self.order.push_front(key.clone(), entry);
        self.index.insert(key, handle);
        self.check_sync();

        Upsert {
            hit: false,
            evicted,
        }
    }

    // == Delete ==
    /// Removes a key regardless of its expiry state.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&handle) => {
                self.unlink(handle);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry, returning how many were held.
    pub fn clear(&mut self) -> usize {
        let removed = self.index.len();
        self.index.clear();
        self.order.clear();
        debug_assert!(self.order.is_empty());
        removed
    }

    // == Remove Expired ==
    /// Removes every entry stale as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<Handle> = self
            .order
            .iter()
            .filter(|(_, _, entry)| entry.is_expired_at(now))
            .map(|(handle, _, _)| handle)
            .collect();

        let count = expired.len();
        for handle in expired {
            self.unlink(handle);
        }
        count
    }

    // == Length ==
    /// Returns the current number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub fn keys(&self) -> Vec<&str> {
        self.order.keys()
    }

    // Removes a node from both the list and the index.
    fn unlink(&mut self, handle: Handle) {
        let (key, _) = self.order.remove(handle);
        let removed = self.index.remove(&key);
        debug_assert_eq!(removed, Some(handle), "index and recency list disagree");
        self.check_sync();
    }

    fn check_sync(&self) {
        debug_assert_eq!(
            self.index.len(),
            self.order.len(),
            "index and recency list sizes diverged"
        );
        debug_assert!(self.index.len() <= self.capacity);
    }
}
