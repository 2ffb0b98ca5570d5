//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored payload paired with its absolute expiration deadline.
///
/// Entries are never mutated after creation: overwriting a key replaces the
/// whole entry, so the deadline and the size charged for it stay fixed.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    /// Monotonic deadline, None = never expires (deadline not representable)
    expires_at: Option<Instant>,
    /// Estimated size charged against the cache limit at admission
    size: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Lifetime of the entry
    /// * `size` - Estimated size in bytes charged for this entry
    pub fn new(value: V, ttl: Duration, size: u64) -> Self {
        Self::with_deadline(value, Instant::now().checked_add(ttl), size)
    }

    pub(crate) fn with_deadline(value: V, expires_at: Option<Instant>, size: u64) -> Self {
        Self {
            value,
            expires_at,
            size,
        }
    }

    /// The stored payload.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning the payload.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Absolute expiration deadline, if any.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Estimated size in bytes charged for this entry.
    pub fn size(&self) -> u64 {
        self.size
    }

    // == Is Expired ==
    /// Checks if the entry had expired at `now`.
    ///
    /// An entry is expired only once its deadline lies strictly before `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => expires < now,
            None => false,
        }
    }

    /// Checks if the entry has expired as of the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the TTL has elapsed
    /// - `Some(remaining)` if the entry has not expired yet
    /// - `None` if the entry has no deadline
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_entry() {
        let entry = CacheEntry::with_deadline("Expired item", Some(Instant::now()), 0);
        std::thread::sleep(Duration::from_millis(1));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_active_entry() {
        let entry = CacheEntry::new("Active item", Duration::from_secs(60), 0);

        assert!(!entry.is_expired());
        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining >= Duration::from_secs(59));
    }

    #[test]
    fn test_expiration_boundary_is_strict() {
        let now = Instant::now();
        let entry = CacheEntry::with_deadline("edge", Some(now), 0);

        assert!(!entry.is_expired_at(now), "deadline == now is not yet expired");
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_unrepresentable_deadline_never_expires() {
        let entry = CacheEntry::new(1u32, Duration::MAX, 4);

        assert!(entry.expires_at().is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = CacheEntry::new("payload".to_string(), Duration::from_secs(1), 23);

        assert_eq!(entry.value(), "payload");
        assert_eq!(entry.size(), 23);
        assert_eq!(entry.into_value(), "payload");
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new("short", Duration::from_millis(50), 0);
        assert!(!entry.is_expired());

        std::thread::sleep(Duration::from_millis(100));

        assert!(entry.is_expired());
    }
}
