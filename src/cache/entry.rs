//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with its expiration deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes, shared out on reads and never mutated in place
    pub value: Arc<[u8]>,
    /// Instant at and after which the entry counts as expired
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry written at `now` that lives for `ttl`.
    pub fn new(value: Arc<[u8]>, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: deadline(now, ttl),
        }
    }

    // == Refresh ==
    /// Replaces the value wholesale and restarts the TTL from `now`.
    pub fn refresh(&mut self, value: Arc<[u8]>, ttl: Duration, now: Instant) {
        self.value = value;
        self.expires_at = deadline(now, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry whose deadline equals `now` is expired, so
    /// a zero TTL makes an entry stale from the moment it is written.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

// A TTL too large to represent pins the deadline far enough out to never fire.
fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(u32::MAX as u64))
}
