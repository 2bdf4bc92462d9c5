//! Shared Cache Module
//!
//! Thread-safe handle around [`CacheStore`]: one mutex guards the whole state,
//! and `close()` drops it for good.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::{duration_millis, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Expiring Cache ==
/// Bounded, expiring, concurrency-safe key/value cache.
///
/// Share it between threads or tasks with `Arc<ExpiringCache<V>>`. Each public
/// call holds the lock for its whole duration, so calls are atomic and observe
/// a single serialization.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use expiring_cache::cache::ExpiringCache;
///
/// let cache = ExpiringCache::new(2, Duration::from_secs(60)).unwrap();
/// cache.set("a", 1).unwrap();
/// cache.set("b", 2).unwrap();
/// cache.set("c", 3).unwrap();
///
/// assert_eq!(cache.get("a").unwrap(), None);
/// assert_eq!(cache.keys().unwrap(), vec!["b", "c"]);
/// ```
#[derive(Debug)]
pub struct ExpiringCache<V> {
    inner: Mutex<Option<CacheStore<V>>>,
    capacity: usize,
    ttl: Duration,
}

impl<V> ExpiringCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries for `ttl` each.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        let store = CacheStore::new(capacity, ttl)?;
        info!(capacity, ttl_ms = duration_millis(ttl), "cache created");

        Ok(Self {
            inner: Mutex::new(Some(store)),
            capacity,
            ttl,
        })
    }

    /// Creates a cache from signed configuration values.
    ///
    /// Zero or negative values fail with the matching error.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.max_entries <= 0 {
            return Err(CacheError::InvalidCapacity(config.max_entries));
        }
        if config.ttl_ms <= 0 {
            return Err(CacheError::InvalidTtl(config.ttl_ms));
        }
        let capacity = usize::try_from(config.max_entries)
            .map_err(|_| CacheError::InvalidCapacity(config.max_entries))?;

        Self::new(capacity, Duration::from_millis(config.ttl_ms as u64))
    }

    // == Set ==
    /// Inserts or refreshes `key`.
    ///
    /// Refreshing resets the TTL but not the eviction position.
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.with_store(|store| store.set(key.into(), value))
    }

    // == Keys ==
    /// Returns keys oldest inserted first, without checking expiry.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.with_store(|store| store.keys())
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was tracked.
    pub fn remove(&self, key: &str) -> Result<Option<V>> {
        self.with_store(|store| store.remove(key))
    }

    // == Purge Expired ==
    /// Removes every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        self.with_store(|store| store.purge_expired())
    }

    // == Stats ==
    pub fn stats(&self) -> Result<CacheStats> {
        self.with_store(|store| store.stats())
    }

    pub fn len(&self) -> Result<usize> {
        self.with_store(|store| store.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.with_store(|store| store.is_empty())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Close ==
    /// Releases the internal state.
    ///
    /// Every later call except `close` and `is_closed` fails with
    /// [`CacheError::Closed`]. Closing twice is a no-op.
    pub fn close(&self) {
        let mut guard = self.lock();
        match guard.take() {
            Some(mut store) => {
                let dropped = store.len();
                store.clear();
                info!(dropped, "cache closed");
            }
            None => debug!("cache already closed"),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    fn with_store<T>(&self, op: impl FnOnce(&mut CacheStore<V>) -> T) -> Result<T> {
        let mut guard = self.lock();
        let store = guard.as_mut().ok_or(CacheError::Closed)?;
        Ok(op(store))
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheStore<V>>> {
        // Store mutations do not panic (the TTL is bounded at construction),
        // so a poisoned lock can only come from a panicking caller-side clone.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> ExpiringCache<V> {
    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// An expired entry is removed as a side effect and reported as `None`.
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        self.with_store(|store| store.get(key).cloned())
    }
}
