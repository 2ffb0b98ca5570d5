//! Cache Traits Module
//!
//! Object-safe interface over the cache operations, so callers can hold a
//! `dyn MemoryCache<V>` and swap in another implementation (or a test double).

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::Cache;
use crate::error::Result;

/// Core operations of an in-memory expiring cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use expiring_cache::{Cache, MemoryCache};
///
/// # #[tokio::main]
/// # async fn main() -> expiring_cache::Result<()> {
/// let cache = Cache::<String>::new(Duration::from_secs(1), 1024)?;
/// let cache: Arc<dyn MemoryCache<String>> = Arc::new(cache);
/// cache.set("key".to_string(), "value".to_string(), Duration::from_secs(60)).await;
/// assert_eq!(cache.get("key").await.as_deref(), Some("value"));
/// cache.close().await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MemoryCache<V>: Send + Sync {
    /// Returns the value stored under `key`, if any
    async fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key` for `ttl`; may be refused silently
    async fn set(&self, key: String, value: V, ttl: Duration);

    /// Removes `key`, returning whether it was present
    async fn delete(&self, key: &str) -> bool;

    /// Stops background work; must be called at most once
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl<V> MemoryCache<V> for Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        Cache::get(self, key).await
    }

    async fn set(&self, key: String, value: V, ttl: Duration) {
        Cache::set(self, key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> bool {
        Cache::delete(self, key).await
    }

    async fn close(&self) -> Result<()> {
        Cache::close(self).await
    }
}
