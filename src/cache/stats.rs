//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, rejections and expirations.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a key
    pub hits: u64,
    /// Number of lookups for absent keys
    pub misses: u64,
    /// Number of writes refused by admission control
    pub rejections: u64,
    /// Number of entries reclaimed by sweeps
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Estimated size in bytes of all live entries
    pub current_size: u64,
    /// Configured size ceiling in bytes
    pub size_limit: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Monotonic counters updated by cache operations.
///
/// Atomic so that lookups holding only the shared lock can still count.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    rejections: AtomicU64,
    expirations: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expirations(&self, count: usize) {
        self.expirations.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Builds a snapshot; entry count and sizes come from the store.
    pub(crate) fn snapshot(
        &self,
        total_entries: usize,
        current_size: u64,
        size_limit: u64,
    ) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            total_entries,
            current_size,
            size_limit,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = StatsCounters::default().snapshot(0, 0, 100);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.rejections, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.size_limit, 100);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let counters = StatsCounters::default();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.snapshot(0, 0, 0).hit_rate(), 0.5);
    }

    #[test]
    fn test_record_rejection_and_expirations() {
        let counters = StatsCounters::default();
        counters.record_rejection();
        counters.record_expirations(3);
        counters.record_expirations(0);

        let stats = counters.snapshot(2, 40, 100);
        assert_eq!(stats.rejections, 1);
        assert_eq!(stats.expirations, 3);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.current_size, 40);
    }
}
