//! Cache Module
//!
//! Provides an in-memory cache with TTL expiration and size-based admission control.

mod engine;
mod entry;
mod stats;
mod store;
mod traits;
mod weigher;


// Re-export public types
pub use engine::Cache;
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use traits::MemoryCache;
pub use weigher::{DefaultWeigher, EstimateSize, Weigher, ENTRY_OVERHEAD};
