//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! Normal cache traffic never fails: misses, silent admission rejections and
//! deletes of absent keys are ordinary return values. The variants below cover
//! lifecycle misuse and the explicit `try_set` admission path.

use thiserror::Error;
use tokio::task::JoinError;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The engine was constructed outside of a tokio runtime
    #[error("No tokio runtime available to run the sweep task")]
    NoRuntime,

    /// `close` was called on an engine that is already stopped
    #[error("Cache already closed")]
    AlreadyClosed,

    /// Admitting the entry would push the estimated size over the limit
    #[error("Capacity exceeded for key {key}: requires {required} bytes, {available} available")]
    CapacityExceeded {
        key: String,
        required: u64,
        available: u64,
    },

    /// The background sweep task panicked or was cancelled
    #[error("Sweep task failed: {0}")]
    SweepTask(#[from] JoinError),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
