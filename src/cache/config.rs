//! Cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_LIST_TTL_SECS: u64 = 60;
const DEFAULT_CAPACITY: usize = 64;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

/// Runtime cache configuration derived from `[cache]` settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for the cached review/project/skill lists.
    pub list_ttl: Duration,
    /// Maximum number of keys held before LRU eviction.
    pub capacity: usize,
    /// Background purge cadence. `None` disables the sweeper; expiry stays lazy.
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(DEFAULT_LIST_TTL_SECS),
            capacity: DEFAULT_CAPACITY,
            sweep_interval: Some(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            list_ttl: settings.list_ttl,
            capacity: settings.capacity.get(),
            sweep_interval: settings.sweep_interval,
        }
    }
}

impl CacheConfig {
    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
