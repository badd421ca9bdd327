pub mod cache_impl;
pub mod clock;
pub mod entry;
pub mod error;
pub mod sweeper;
pub mod validate;

pub use cache_impl::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use error::CacheError;
pub use sweeper::Sweeper;
pub use validate::{validate_key, validate_value, Blank};

/// Capability surface of a key-value cache.
///
/// `get` and `put` refresh an entry's last-access time; `contains_key` does not.
/// Each call is atomic on its own, but sequences of calls are not.
pub trait Cache<K, V>: Send + Sync {
    fn contains_key(&self, key: &K) -> Result<bool, CacheError>;

    /// Returns `Ok(None)` when the key is not present.
    fn get(&self, key: &K) -> Result<Option<V>, CacheError>;

    /// Inserts or replaces the value stored under `key`.
    fn put(&self, key: K, value: V) -> Result<(), CacheError>;

    /// Returns the removed value, or `Ok(None)` if nothing was stored.
    fn remove(&self, key: &K) -> Result<Option<V>, CacheError>;

    /// Evicts every expired entry and returns how many were removed.
    fn cleanup(&self) -> usize;

    fn clear(&self);

    fn size(&self) -> usize;
}
