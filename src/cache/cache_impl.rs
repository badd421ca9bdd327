use dashmap::DashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::error::CacheError;
use super::sweeper::Sweeper;
use super::validate::{validate_key, validate_value, Blank};
use super::Cache;
use crate::config::{CacheConfig, ConfigError};

// State shared between callers and the sweeper thread. The sweeper only holds
// a weak reference, so dropping the cache frees it even if the thread lags.
struct Shared<K, V>
where
    K: Eq + Hash,
{
    store: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> Shared<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn cleanup(&self) -> usize {
        let now = self.clock.now();

        // Snapshot the doomed keys first; no shard lock is held past this point.
        let expired: Vec<K> = self
            .store
            .iter()
            .filter(|item| item.value().is_expired(self.ttl, now))
            .map(|item| item.key().clone())
            .collect();

        // Re-check under the shard lock so an entry touched since the snapshot survives.
        let mut evicted = 0;
        for key in expired {
            if self
                .store
                .remove_if(&key, |_, entry| entry.is_expired(self.ttl, now))
                .is_some()
            {
                debug!("Evicted expired key: {:?}", key);
                evicted += 1;
            }
        }

        if evicted > 0 {
            info!("Cleaned up {} expired entries", evicted);
        } else {
            debug!("Cleanup found no expired entries");
        }
        evicted
    }
}

/// A thread-safe key-value cache with sliding expiration.
///
/// Every `get` or `put` resets an entry's idle clock. A background sweeper
/// wakes every `cleanup_interval` and evicts entries idle for longer than
/// `ttl`. Eviction is eventually consistent: an expired entry stays visible
/// until the next sweep (or an explicit [`cleanup`](TtlCache::cleanup)).
///
/// The sweeper runs until [`close`](TtlCache::close) is called or the cache is
/// dropped. Share a cache between threads with `Arc<TtlCache<K, V>>`.
///
/// ```
/// use std::time::Duration;
/// use ttl_cache::TtlCache;
///
/// let cache: TtlCache<String, String> =
///     TtlCache::with_ttl(Duration::from_secs(5), Duration::from_secs(1)).unwrap();
/// cache.put("94107".to_string(), "Sunny".to_string()).unwrap();
/// assert_eq!(cache.get(&"94107".to_string()).unwrap(), Some("Sunny".to_string()));
/// assert!(cache.put(" ".to_string(), "Foggy".to_string()).is_err());
/// ```
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    shared: Arc<Shared<K, V>>,
    cleanup_interval: Duration,
    sweeper: Sweeper,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Blank + Send + Sync + 'static,
    V: Clone + Blank + Send + Sync + 'static,
{
    /// A cache with the default 15 minute TTL and one minute cleanup interval.
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_ttl(ttl: Duration, cleanup_interval: Duration) -> Result<Self, ConfigError> {
        Ok(Self::with_config(&CacheConfig::new(ttl, cleanup_interval)?))
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::new(Shared {
            store: DashMap::new(),
            ttl: config.ttl(),
            clock,
        });

        info!(
            "Starting cache cleanup task (ttl: {:?}, interval: {:?})",
            config.ttl(),
            config.cleanup_interval()
        );
        let weak = Arc::downgrade(&shared);
        let sweeper = Sweeper::spawn(
            "ttl-cache-sweeper",
            config.cleanup_interval(),
            move || match weak.upgrade() {
                Some(shared) => {
                    shared.cleanup();
                    true
                }
                None => false,
            },
        );

        TtlCache {
            shared,
            cleanup_interval: config.cleanup_interval(),
            sweeper,
        }
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.shared.store.contains_key(key))
    }

    pub fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        validate_key(key)?;
        let now = self.shared.clock.now();

        match self.shared.store.get_mut(key) {
            Some(mut item) => {
                let entry = item.value_mut();
                entry.touch(now);
                debug!("Get hit for key: {:?}", key);
                Ok(Some(entry.value().clone()))
            }
            None => {
                debug!("Get miss for key: {:?}", key);
                Ok(None)
            }
        }
    }

    pub fn put(&self, key: K, value: V) -> Result<(), CacheError> {
        validate_key(&key)?;
        validate_value(&value)?;

        debug!("Put key: {:?}", key);
        let entry = CacheEntry::new(value, self.shared.clock.now());
        self.shared.store.insert(key, entry);
        Ok(())
    }

    pub fn remove(&self, key: &K) -> Result<Option<V>, CacheError> {
        validate_key(key)?;

        let removed = self.shared.store.remove(key).map(|(_, entry)| entry.into_value());
        debug!("Remove key: {:?} (present: {})", key, removed.is_some());
        Ok(removed)
    }

    /// Evicts every entry idle for longer than the TTL. Returns the number evicted.
    pub fn cleanup(&self) -> usize {
        self.shared.cleanup()
    }

    pub fn clear(&self) {
        self.shared.store.clear();
        info!("Cache cleared");
    }

    pub fn size(&self) -> usize {
        self.shared.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.shared
            .store
            .iter()
            .map(|item| item.key().clone())
            .collect()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    pub fn is_running(&self) -> bool {
        self.sweeper.is_running()
    }

    /// Stops the background sweeper and waits for it to exit.
    ///
    /// The cache stays usable afterwards, but expired entries are only removed
    /// by explicit calls to `cleanup`. Calling this more than once is harmless.
    pub fn close(&self) {
        if self.sweeper.is_running() {
            debug!("Closing cache and stopping {}...", self.sweeper.name());
        }
        self.sweeper.stop();
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Blank + Send + Sync + 'static,
    V: Clone + Blank + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        self.close();
    }
}

impl<K, V> Debug for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("size", &self.shared.store.len())
            .field("ttl", &self.shared.ttl)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("running", &self.sweeper.is_running())
            .finish()
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Blank + Send + Sync + 'static,
    V: Clone + Blank + Send + Sync + 'static,
{
    fn contains_key(&self, key: &K) -> Result<bool, CacheError> {
        TtlCache::contains_key(self, key)
    }

    fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        TtlCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Result<(), CacheError> {
        TtlCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Result<Option<V>, CacheError> {
        TtlCache::remove(self, key)
    }

    fn cleanup(&self) -> usize {
        TtlCache::cleanup(self)
    }

    fn clear(&self) {
        TtlCache::clear(self)
    }

    fn size(&self) -> usize {
        TtlCache::size(self)
    }
}
