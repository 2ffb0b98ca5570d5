//! Cache Engine Module
//!
//! Thread-safe cache handle: a single readers-writer lock around the store plus
//! the background sweep task that reclaims expired entries.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, CacheStore, DefaultWeigher, EstimateSize, Weigher};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, SweepHandle};

// == Cache ==
/// Size-bounded, time-expiring key/value cache.
///
/// `get` takes the shared lock; `set`, `delete` and sweeps take the exclusive
/// lock. Lookups do not check TTLs: an expired entry stays visible until the
/// next sweep, so reads may be stale by at most one sweep interval.
///
/// # Lifecycle
/// The sweep task starts on construction and stops on [`close`](Self::close)
/// or when the cache is dropped. After `close`, every operation remains safe
/// and keeps size accounting exact, but expired entries are only reclaimed by
/// an explicit [`purge_expired`](Self::purge_expired).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use expiring_cache::Cache;
///
/// # #[tokio::main]
/// # async fn main() -> expiring_cache::Result<()> {
/// let cache = Cache::new(Duration::from_secs(1), 1024)?;
/// cache.set("greeting", "hello".to_string(), Duration::from_secs(60)).await;
/// assert_eq!(cache.get("greeting").await.as_deref(), Some("hello"));
/// cache.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Cache<V> {
    /// Entries and size accounting behind one lock
    store: Arc<RwLock<CacheStore<V>>>,
    /// Size estimator, applied before taking the lock
    weigher: Arc<dyn Weigher<V>>,
    /// Effective period between sweeps
    sweep_interval: Duration,
    /// Running sweep task, None once closed
    sweeper: Mutex<Option<SweepHandle>>,
}

impl<V> Cache<V>
where
    V: EstimateSize + Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and starts its sweep task.
    ///
    /// # Arguments
    /// * `sweep_interval` - Period between sweeps, raised to one second if shorter
    /// * `size_limit` - Ceiling in bytes on the estimated size of all entries
    ///
    /// # Errors
    /// `CacheError::NoRuntime` if called outside a tokio runtime.
    pub fn new(sweep_interval: Duration, size_limit: u64) -> Result<Self> {
        Self::from_config(&CacheConfig::new(sweep_interval, size_limit))
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::with_weigher(config, DefaultWeigher)
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache that charges entries with a custom weigher.
    pub fn with_weigher<W>(config: &CacheConfig, weigher: W) -> Result<Self>
    where
        W: Weigher<V> + 'static,
    {
        let weigher: Arc<dyn Weigher<V>> = Arc::new(weigher);
        let store = Arc::new(RwLock::new(CacheStore::with_weigher(
            config.size_limit,
            weigher.clone(),
        )));
        let sweep_interval = config.effective_sweep_interval();
        let sweeper = spawn_sweep_task(store.clone(), sweep_interval)?;

        debug!(
            "Cache created: sweep_interval={:?}, size_limit={}",
            sweep_interval, config.size_limit
        );

        Ok(Self {
            store,
            weigher,
            sweep_interval,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`.
    ///
    /// Entries whose TTL has elapsed are still returned until a sweep removes them.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store
            .read()
            .await
            .get(key)
            .map(|entry| entry.value().clone())
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// If the write would push the estimated size over the limit it is dropped
    /// silently and any previous value for `key` is kept. Use
    /// [`try_set`](Self::try_set) to observe the rejection.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        if let Err(err) = self.try_set(key, value, ttl).await {
            debug!("Write rejected: {}", err);
        }
    }

    /// Stores `value` under `key` for `ttl`, reporting admission failures.
    ///
    /// The deadline is taken when the call starts and the entry is weighed before
    /// the exclusive lock is acquired; only the admission check runs under it.
    ///
    /// # Errors
    /// `CacheError::CapacityExceeded` if the entry does not fit under the limit.
    pub async fn try_set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now().checked_add(ttl);
        let key = key.into();
        let size = self.weigher.weigh(&key, &value);
        let entry = CacheEntry::with_deadline(value, expires_at, size);

        self.store.write().await.admit(key, entry)
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.remove(key).is_some()
    }

    // == Close ==
    /// Stops the sweep task and waits for it to exit.
    ///
    /// # Errors
    /// - `CacheError::AlreadyClosed` if the cache was already closed
    /// - `CacheError::SweepTask` if the sweep task had panicked
    pub async fn close(&self) -> Result<()> {
        let sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sweeper {
            Some(sweeper) => {
                sweeper.shutdown().await?;
                info!("Cache closed");
                Ok(())
            }
            None => {
                warn!("Close called on an already closed cache");
                Err(CacheError::AlreadyClosed)
            }
        }
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    // == Purge Expired ==
    /// Runs a sweep immediately, returning the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired(Instant::now())
    }

    /// Remaining lifetime of `key`, or None if absent.
    ///
    /// Entries without a representable deadline report `Duration::MAX`.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.store
            .read()
            .await
            .peek(key)
            .map(|entry| entry.ttl_remaining().unwrap_or(Duration::MAX))
    }

    /// Returns the current number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Estimated bytes held by live entries.
    pub async fn current_size(&self) -> u64 {
        self.store.read().await.current_size()
    }

    /// Configured size ceiling in bytes.
    pub async fn size_limit(&self) -> u64 {
        self.store.read().await.size_limit()
    }

    /// Effective period between sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.store)
            .field("sweep_interval", &self.sweep_interval)
            .field("sweeper", &self.sweeper)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ENTRY_OVERHEAD;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_cache_set_get_delete() {
        let cache = Cache::new(Duration::from_secs(1), 1024).unwrap();

        cache.set("key1", "value1".to_string(), MINUTE).await;
        assert_eq!(cache.get("key1").await.as_deref(), Some("value1"));
        assert_eq!(cache.current_size().await, 4 + 6 + ENTRY_OVERHEAD);

        assert!(cache.delete("key1").await);
        assert!(!cache.delete("key1").await);
        assert!(cache.get("key1").await.is_none());
        assert_eq!(cache.current_size().await, 0);

        cache.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_cache_sweep_interval_clamped() {
        let cache: Cache<String> = Cache::new(Duration::from_millis(1), 50).unwrap();
        assert_eq!(cache.sweep_interval(), Duration::from_secs(1));
        assert_eq!(cache.size_limit().await, 50);
        cache.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_try_set_reports_rejection() {
        let cache = Cache::new(Duration::from_secs(1), 50).unwrap();

        let result = cache.try_set("oversized", "x".repeat(100), MINUTE).await;

        assert!(matches!(result, Err(CacheError::CapacityExceeded { .. })));
        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await.rejections, 1);
        cache.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_close_twice_is_an_error() {
        let cache: Cache<String> = Cache::new(Duration::from_secs(1), 50).unwrap();

        assert!(!cache.is_closed());
        cache.close().await.unwrap();
        assert!(cache.is_closed());
        assert!(matches!(cache.close().await, Err(CacheError::AlreadyClosed)));
    }

    #[tokio::test]
    async fn test_operations_after_close() {
        let cache = Cache::new(Duration::from_secs(1), 1024).unwrap();
        cache.set("before", "a".to_string(), Duration::ZERO).await;
        cache.close().await.unwrap();

        cache.set("after", "b".to_string(), MINUTE).await;
        assert_eq!(cache.get("after").await.as_deref(), Some("b"));
        assert!(cache.delete("after").await);

        // Nothing sweeps anymore, but a manual purge still reclaims
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cache.get("before").await.as_deref(), Some("a"));
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.current_size().await, 0);
    }

    #[tokio::test]
    async fn test_ttl_reports_remaining_lifetime() {
        let cache = Cache::new(Duration::from_secs(1), 1024).unwrap();
        cache.set("short", 1u32, MINUTE).await;
        cache.set("forever", 2u32, Duration::MAX).await;

        let remaining = cache.ttl("short").await.unwrap();
        assert!(remaining <= MINUTE && remaining > Duration::from_secs(58));
        assert_eq!(cache.ttl("forever").await, Some(Duration::MAX));
        assert!(cache.ttl("missing").await.is_none());
        cache.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_weigher() {
        let config = CacheConfig::new(Duration::from_secs(1), 3);
        let cache = Cache::with_weigher(&config, |_: &str, _: &Vec<u8>| 1u64).unwrap();

        for key in ["a", "b", "c", "d"] {
            cache.set(key, vec![0; 1024], MINUTE).await;
        }

        assert_eq!(cache.len().await, 3);
        assert!(cache.get("d").await.is_none());
        cache.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_weighing_happens_outside_the_lock() {
        let config = CacheConfig::new(Duration::from_secs(1), 1024);
        let slow = |key: &str, value: &String| {
            if key == "slow" {
                std::thread::sleep(Duration::from_millis(400));
            }
            (key.len() + value.len()) as u64
        };
        let cache = Arc::new(Cache::with_weigher(&config, slow).unwrap());
        cache.set("fast", "x".to_string(), MINUTE).await;

        let writer = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.set("slow", "y".to_string(), MINUTE).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Readers are not held up while the writer is still weighing
        let started = Instant::now();
        assert_eq!(cache.get("fast").await.as_deref(), Some("x"));
        assert!(started.elapsed() < Duration::from_millis(200));

        writer.await.unwrap();

        // The deadline was fixed when set was called, before the slow weighing
        let remaining = cache.ttl("slow").await.unwrap();
        assert!(remaining < MINUTE - Duration::from_millis(300));
        cache.close().await.unwrap();
    }

    #[test]
    fn test_new_without_runtime_fails() {
        let result: Result<Cache<String>> = Cache::new(Duration::from_secs(1), 50);
        assert!(matches!(result, Err(CacheError::NoRuntime)));
    }
}
