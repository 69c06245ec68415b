//! Configuration Module
//!
//! Holds the immutable engine configuration and the helpers a host process
//! uses to load it from environment variables or its own config files.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

/// Environment variable holding the maximum number of entries.
pub const ENV_CAPACITY: &str = "CACHE_CAPACITY";
/// Environment variable holding the TTL in milliseconds.
pub const ENV_TTL_MS: &str = "CACHE_TTL_MS";

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache configuration parameters.
///
/// Fixed for the lifetime of a cache. The TTL applies uniformly to every
/// write; a zero TTL is allowed and makes entries expire immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time each written entry stays live
    #[serde(rename = "ttl_ms", with = "duration_ms")]
    pub ttl: Duration,
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
}

impl CacheConfig {
    /// Creates a configuration with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { ttl, capacity }
    }

    /// Checks that the engine can run with this configuration.
    ///
    /// A zero capacity is rejected: there would be no slot to insert into.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - TTL in milliseconds (default: 300000)
    ///
    /// Unset variables fall back to the defaults. Values that do not parse
    /// are an error rather than silently replaced.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let capacity = match lookup(ENV_CAPACITY) {
            Some(raw) => parse_var::<usize>(ENV_CAPACITY, &raw)?,
            None => defaults.capacity,
        };
        let ttl = match lookup(ENV_TTL_MS) {
            Some(raw) => Duration::from_millis(parse_var::<u64>(ENV_TTL_MS, &raw)?),
            None => defaults.ttl,
        };

        let config = Self::new(capacity, ttl);
        config.validate()?;
        Ok(config)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        warn!(variable = name, value = raw, "rejecting unparsable cache setting");
        CacheError::InvalidConfig(format!("{} has invalid value '{}'", name, raw))
    })
}

// TTL is carried as whole milliseconds in serialized configs.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
