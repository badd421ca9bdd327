use std::time::{Duration, Instant};

/// A cached value together with the instant it was last read or written.
///
/// The cache only ever mutates an entry while holding that key's shard lock,
/// so `value` and `last_accessed` are always observed as a pair.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            last_accessed: now,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn last_accessed(&self) -> Instant {
        self.last_accessed
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
    }

    /// Idle time since the last touch. Saturates at zero if `now` is behind.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accessed)
    }

    /// An entry expires once it has been idle for strictly longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) > ttl
    }
}
