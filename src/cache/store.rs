//! Cache Store Module
//!
//! Unsynchronized cache engine: HashMap storage, an insertion-order ledger
//! for FIFO eviction, and lazy TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{duration_millis, CacheEntry, CacheStats, InsertionOrder, MAX_TTL};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Cache state machine with capacity-bounded FIFO eviction and TTL expiry.
///
/// Every method takes `&mut self`; [`ExpiringCache`](crate::cache::ExpiringCache)
/// serializes access behind one lock.
///
/// Invariants after every method returns:
/// - `entries.len() <= capacity`
/// - the keys of `entries` and `order` are the same set
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// First-insertion order, head is the next eviction victim
    order: InsertionOrder,
    stats: CacheStats,
    capacity: usize,
    ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is zero and
    /// [`CacheError::InvalidTtl`] when `ttl` is zero or longer than [`MAX_TTL`].
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(0));
        }
        if ttl.is_zero() || ttl > MAX_TTL || Instant::now().checked_add(ttl).is_none() {
            let ttl_ms = i64::try_from(duration_millis(ttl)).unwrap_or(i64::MAX);
            return Err(CacheError::InvalidTtl(ttl_ms));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            order: InsertionOrder::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl,
        })
    }

    // == Set ==
    /// Inserts or refreshes an entry.
    ///
    /// An existing key (expired or not) gets the new value and a fresh TTL but
    /// keeps its eviction position. A new key at capacity first evicts the
    /// oldest inserted key, whether or not that one has expired.
    pub fn set(&mut self, key: String, value: V) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refresh(value, self.ttl);
            return;
        }

        let entry = CacheEntry::new(value, self.ttl);
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.entries.insert(key.clone(), entry);
        self.order.push(key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a reference to a live value.
    ///
    /// An expired entry is removed from both the map and the ledger, and
    /// reported as absent.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(Instant::now()),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "lazily expired entry");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| &entry.value)
    }

    // == Remove ==
    /// Removes an entry regardless of expiry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|entry| entry.value)
    }

    // == Keys ==
    /// Returns tracked keys, oldest inserted first.
    ///
    /// No expiry check: entries that expired but were never read are listed.
    pub fn keys(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|key| self.entries.contains_key(key.as_str()))
            .cloned()
            .collect()
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .order
            .iter()
            .filter(|key| {
                self.entries
                    .get(key.as_str())
                    .is_some_and(|entry| entry.is_expired_at(now))
            })
            .cloned()
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        let count = expired_keys.len();
        self.stats.record_expirations(count);
        count
    }

    // == Clear ==
    /// Drops every entry and the ledger.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn evict_oldest(&mut self) {
        if let Some(victim) = self.order.pop_oldest() {
            self.entries.remove(&victim);
            self.stats.record_eviction();
            debug!(key = %victim, "evicted oldest entry");
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    #[cfg(test)]
    pub(crate) fn order_keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }
}
