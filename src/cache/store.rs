//! Cache Store Module
//!
//! Unsynchronized storage engine: HashMap entries, size accounting and admission control.
//! Callers serialize access through a single lock (see [`crate::Cache`]).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, DefaultWeigher, EstimateSize, Weigher};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Size-bounded map of expiring entries.
///
/// Invariant: `current_size` is the sum of `size()` over every entry in `entries`,
/// and never exceeds `size_limit`.
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Estimated bytes held by live entries
    current_size: u64,
    /// Ceiling on `current_size`
    size_limit: u64,
    /// Size estimator applied at admission
    weigher: Arc<dyn Weigher<V>>,
    /// Performance counters
    counters: StatsCounters,
}

impl<V: EstimateSize> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store using [`DefaultWeigher`].
    ///
    /// # Arguments
    /// * `size_limit` - Maximum estimated size in bytes
    pub fn new(size_limit: u64) -> Self {
        Self::with_weigher(size_limit, Arc::new(DefaultWeigher))
    }
}

impl<V> CacheStore<V> {
    /// Creates an empty store charging entries with the given weigher.
    pub fn with_weigher(size_limit: u64, weigher: Arc<dyn Weigher<V>>) -> Self {
        Self {
            entries: HashMap::new(),
            current_size: 0,
            size_limit,
            weigher,
            counters: StatsCounters::default(),
        }
    }

    // == Insert ==
    /// Stores a key-value pair expiring after `ttl`.
    ///
    /// Weighs the pair with the store's weigher and hands the entry to
    /// [`admit`](Self::admit).
    ///
    /// # Errors
    /// `CacheError::CapacityExceeded` if the entry does not fit under the limit.
    pub fn insert(&mut self, key: String, value: V, ttl: Duration) -> Result<()> {
        let size = self.weigher.weigh(&key, &value);
        self.admit(key, CacheEntry::new(value, ttl, size))
    }

    // == Admit ==
    /// Stores a prebuilt entry if its size fits under the limit.
    ///
    /// Admission is checked against the size the store would have after the write,
    /// so overwriting a key first releases the old entry's charge. A refused write
    /// leaves the store untouched, including any previous value for `key`. Only
    /// constant-time work happens here, so callers can weigh outside their lock.
    ///
    /// # Errors
    /// `CacheError::CapacityExceeded` if the entry does not fit under the limit.
    pub fn admit(&mut self, key: String, entry: CacheEntry<V>) -> Result<()> {
        let size = entry.size();
        let replaced = self.entries.get(&key).map_or(0, CacheEntry::size);
        let base = self.current_size - replaced;
        let available = self.size_limit.saturating_sub(base);

        if size > available {
            self.counters.record_rejection();
            return Err(CacheError::CapacityExceeded {
                key,
                required: size,
                available,
            });
        }

        self.entries.insert(key, entry);
        self.current_size = base + size;
        Ok(())
    }

    // == Get ==
    /// Looks up an entry, counting a hit or a miss.
    ///
    /// Expired entries are returned as-is; reclaiming them is left to
    /// [`purge_expired`](Self::purge_expired).
    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        let entry = self.entries.get(key);
        match entry {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }
        entry
    }

    /// Looks up an entry without touching the statistics.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Remove ==
    /// Removes an entry by key, releasing its size charge.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.current_size -= entry.size();
        Some(entry.into_value())
    }

    // == Purge Expired ==
    /// Removes every entry whose deadline lies before `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let mut reclaimed = 0;

        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                reclaimed += entry.size();
                false
            } else {
                true
            }
        });

        self.current_size -= reclaimed;
        let removed = before - self.entries.len();
        self.counters.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters
            .snapshot(self.entries.len(), self.current_size, self.size_limit)
    }

    /// Estimated bytes held by live entries.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Configured size ceiling in bytes.
    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn summed_entry_sizes(&self) -> u64 {
        self.entries.values().map(CacheEntry::size).sum()
    }
}

impl<V> fmt::Debug for CacheStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("current_size", &self.current_size)
            .field("size_limit", &self.size_limit)
            .finish()
    }
}
