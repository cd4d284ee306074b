//! # TTL Cache
//!
//! In-memory key/value store with per-entry expiration. Memoizes successful
//! API lookups so repeated identical requests short-circuit the queue and
//! pipeline entirely. Expired entries are evicted lazily: on read, or during
//! the full sweep `size()` performs before counting.

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::{Duration, Instant};

/// Default entry lifetime: 5 minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Shorter lifetime used for search-style queries: 2 minutes
pub const SEARCH_TTL: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Concurrent TTL cache, shared by every caller in the process.
///
/// All operations are total: a missing or expired key yields `None`/`false`,
/// never an error. There is no cross-operation atomicity — a `has` followed
/// by a `set` can interleave with other tasks.
#[derive(Debug)]
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    /// A cache whose `set(.., None)` uses `default_ttl` instead of
    /// [`DEFAULT_TTL`].
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Store a value under `key` for `ttl` (or the cache's default when
    /// `None`).
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.entries
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Fetch a live value, evicting it if its TTL has elapsed.
    pub fn get(&self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Whether a live entry exists for `key`. Evicts on expiry like `get`.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a single entry.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Count live entries. Sweeps out everything expired first, so the count
    /// is accurate at the cost of an O(n) scan.
    pub fn size(&self) -> usize {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.len()
    }
}
