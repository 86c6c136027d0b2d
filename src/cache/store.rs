//! Expiring key-value storage.
//!
//! A generic map with a per-key absolute expiry. Expiry is lazy: `get` treats
//! an elapsed entry exactly like a missing one and drops it. The optional
//! sweeper only reclaims memory; correctness never depends on it.

use std::any::Any;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use lru::LruCache;
use metrics::counter;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Upper bound applied when `now + ttl` would overflow the clock.
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Opaque payload stored by the process-wide cache.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// The cache instance shared by every entity facade.
pub type SharedCache = ExpiringCache<CachedValue>;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe map of string keys to values with per-key TTL.
pub struct ExpiringCache<V> {
    entries: RwLock<LruCache<String, Entry<V>>>,
}

impl<V: Clone> ExpiringCache<V> {
    /// Create a cache sized by the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacity(config.capacity_non_zero())
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Return the value for `key` if it was set and has not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");

        let expired = match entries.get(key) {
            Some(entry) if entry.is_live(now) => {
                counter!("folio_cache_hit_total", "key" => key.to_string()).increment(1);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            counter!("folio_cache_expired_total", "key" => key.to_string()).increment(1);
        }
        counter!("folio_cache_miss_total", "key" => key.to_string()).increment(1);
        None
    }

    /// Store `value` under `key`, replacing any previous entry and resetting its expiry.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_TTL.min(ttl));

        let evicted = rw_write(&self.entries, SOURCE, "put")
            .push(key.clone(), Entry { value, expires_at })
            .map(|(evicted_key, _)| evicted_key)
            .filter(|evicted_key| *evicted_key != key);

        if let Some(evicted_key) = evicted {
            debug!(
                target = "folio::cache",
                key = %evicted_key,
                "evicted least recently used cache entry"
            );
            counter!("folio_cache_evict_total", "key" => evicted_key).increment(1);
        }
    }

    /// Remove `key`. Returns whether an entry was present; absent keys are not an error.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = rw_write(&self.entries, SOURCE, "invalidate")
            .pop(key)
            .is_some();
        counter!("folio_cache_invalidate_total", "key" => key.to_string()).increment(1);
        removed
    }

    /// Drop every entry whose expiry has elapsed, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "purge_expired");
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        stale.len()
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Periodically purge expired entries until the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!(target = "folio::cache", purged, "swept expired cache entries");
                }
            }
        })
    }
}
