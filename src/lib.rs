//! Expiring Cache - An in-process, size-bounded key/value cache
//!
//! Entries expire after a per-key TTL and are reclaimed by a background sweep.
//! Writes that would push the estimated size over the configured limit are refused.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, DefaultWeigher, EstimateSize, MemoryCache, Weigher};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
