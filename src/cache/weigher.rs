//! Size Estimation Module
//!
//! Approximates how many bytes an entry occupies so the cache can enforce its
//! size limit. Estimates are deliberately cheap and deterministic, not exact.

use std::mem::size_of;
use std::rc::Rc;
use std::sync::Arc;

/// Fixed per-entry charge covering the stored expiration deadline.
pub const ENTRY_OVERHEAD: u64 = 16;

// == Estimate Size ==
/// Payload-reported size in bytes.
///
/// Scalars report their inline size, strings their byte length, and
/// containers the sum of their elements.
///
/// # Example
///
/// ```
/// use expiring_cache::EstimateSize;
///
/// struct Blob {
///     name: String,
///     bytes: Vec<u8>,
/// }
///
/// impl EstimateSize for Blob {
///     fn estimate_size(&self) -> u64 {
///         self.name.estimate_size() + self.bytes.estimate_size()
///     }
/// }
///
/// let blob = Blob { name: "a".into(), bytes: vec![0; 10] };
/// assert_eq!(blob.estimate_size(), 11);
/// ```
pub trait EstimateSize {
    fn estimate_size(&self) -> u64;
}

macro_rules! inline_size {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EstimateSize for $ty {
                fn estimate_size(&self) -> u64 {
                    size_of::<$ty>() as u64
                }
            }
        )*
    };
}

inline_size!(bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl EstimateSize for () {
    fn estimate_size(&self) -> u64 {
        0
    }
}

impl EstimateSize for str {
    fn estimate_size(&self) -> u64 {
        self.len() as u64
    }
}

impl EstimateSize for String {
    fn estimate_size(&self) -> u64 {
        self.len() as u64
    }
}

impl<T: EstimateSize> EstimateSize for [T] {
    fn estimate_size(&self) -> u64 {
        self.iter().map(EstimateSize::estimate_size).sum()
    }
}

impl<T: EstimateSize> EstimateSize for Vec<T> {
    fn estimate_size(&self) -> u64 {
        self.as_slice().estimate_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for &T {
    fn estimate_size(&self) -> u64 {
        (**self).estimate_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Box<T> {
    fn estimate_size(&self) -> u64 {
        (**self).estimate_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Arc<T> {
    fn estimate_size(&self) -> u64 {
        (**self).estimate_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Rc<T> {
    fn estimate_size(&self) -> u64 {
        (**self).estimate_size()
    }
}

impl<T: EstimateSize> EstimateSize for Option<T> {
    fn estimate_size(&self) -> u64 {
        self.as_ref().map_or(0, EstimateSize::estimate_size)
    }
}

impl<A: EstimateSize, B: EstimateSize> EstimateSize for (A, B) {
    fn estimate_size(&self) -> u64 {
        self.0.estimate_size() + self.1.estimate_size()
    }
}

// == Weigher ==
/// Computes the size charged for a key/value pair at admission.
///
/// Any `Fn(&str, &V) -> u64` closure is a weigher, so callers can inject
/// their own accounting:
///
/// ```
/// use expiring_cache::Weigher;
///
/// let flat = |_key: &str, _value: &Vec<u8>| 100u64;
/// assert_eq!(flat.weigh("k", &vec![1, 2, 3]), 100);
/// ```
pub trait Weigher<V>: Send + Sync {
    fn weigh(&self, key: &str, value: &V) -> u64;
}

/// Charges key bytes, the payload-reported size and [`ENTRY_OVERHEAD`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWeigher;

impl<V: EstimateSize> Weigher<V> for DefaultWeigher {
    fn weigh(&self, key: &str, value: &V) -> u64 {
        key.len() as u64 + value.estimate_size() + ENTRY_OVERHEAD
    }
}

impl<V, F> Weigher<V> for F
where
    F: Fn(&str, &V) -> u64 + Send + Sync,
{
    fn weigh(&self, key: &str, value: &V) -> u64 {
        self(key, value)
    }
}
