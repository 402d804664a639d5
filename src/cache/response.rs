//! TTL cache for rewritten text.
//!
//! Backed by moka's concurrent async map, with no capacity bound. Expiry
//! is checked on read against the entry's own `expires_at`: an expired
//! entry is reported as a miss and stays in the map until the next
//! successful rewrite for that key overwrites it. There is no background
//! sweep.
//!
//! Time is read from [`tokio::time::Instant`], so tests can pause and
//! advance the clock instead of sleeping through the TTL.
//!
//! Concurrent `put`s to the same key race; the last write wins. Concurrent
//! misses on the same key are not coalesced, so identical in-flight
//! requests each reach the upstream API.

use std::time::Duration;

use moka::future::Cache;
use tokio::time::Instant;

use super::key::CacheKey;
use crate::telemetry;

/// Default time-to-live for a cached rewrite: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(600_000);

/// Expiry horizon used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Configuration for the rewrite cache.
///
/// ```rust
/// # use tonepicker::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(60));
/// assert_eq!(config.ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries. Default: 10 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    /// Create a new config with the default TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A cached rewrite and the instant it stops being served.
///
/// Entries are never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Whether the entry may still be served at `now`.
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory rewrite cache.
///
/// Cloning is cheap and yields a handle to the same underlying map.
#[derive(Clone)]
pub struct RewriteCache {
    entries: Cache<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl RewriteCache {
    /// Create an empty cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Cache::builder().build(),
            ttl: config.ttl,
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live rewrite.
    ///
    /// Returns `None` when the key is absent or its entry has expired.
    /// Emits cache hit/miss metrics.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let now = Instant::now();
        match self.entries.get(key).await {
            Some(entry) if entry.is_live(now) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.value)
            }
            _ => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store a rewrite, replacing any previous entry for `key`.
    ///
    /// A TTL too large to represent saturates to roughly a century.
    pub async fn put(&self, key: CacheKey, value: String) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(self.ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.entries.insert(key, CacheEntry { value, expires_at }).await;
    }

    /// Raw entry for `key`, live or expired.
    pub async fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).await
    }
}

impl Default for RewriteCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
