//! Memoization of an expensive keyed lookup behind a cache.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheError};

/// An expensive keyed lookup, e.g. a call to a remote weather API.
#[async_trait]
pub trait Lookup: Send + Sync {
    type Key: Send + Sync;
    type Value: Send;

    async fn fetch(&self, key: &Self::Key) -> Result<Self::Value>;
}

/// Decorates a [`Lookup`] so repeated fetches for a key are served from a cache.
pub struct CachingLookup<L, C>
where
    L: Lookup,
{
    inner: L,
    cache: Arc<C>,
}

impl<L, C> CachingLookup<L, C>
where
    L: Lookup,
    L::Key: Clone + Debug,
    L::Value: Clone,
    C: Cache<L::Key, L::Value>,
{
    pub fn new(inner: L, cache: Arc<C>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Empties the backing cache. See [`clear_cache`].
    pub fn bust(&self) -> bool {
        clear_cache::<L::Key, L::Value, C>(&self.cache)
    }
}

#[async_trait]
impl<L, C> Lookup for CachingLookup<L, C>
where
    L: Lookup,
    L::Key: Clone + Debug,
    L::Value: Clone,
    C: Cache<L::Key, L::Value>,
{
    type Key = L::Key;
    type Value = L::Value;

    async fn fetch(&self, key: &Self::Key) -> Result<Self::Value> {
        if let Some(value) = self
            .cache
            .get(key)
            .with_context(|| format!("Invalid lookup key: {:?}", key))?
        {
            info!("Found {:?} in cache", key);
            return Ok(value);
        }

        debug!("Cache miss for {:?}, fetching", key);
        let value = self.inner.fetch(key).await?;

        match self.cache.put(key.clone(), value.clone()) {
            Ok(()) => {}
            Err(CacheError::InvalidValue) => {
                warn!("Not caching blank result for {:?}", key);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to cache {:?}", key)),
        }
        Ok(value)
    }
}

/// The cache-busting admin operation: clears the cache and reports whether it
/// ended up empty. Entries put concurrently with the clear can make this false.
pub fn clear_cache<K, V, C>(cache: &C) -> bool
where
    C: Cache<K, V> + ?Sized,
{
    cache.clear();
    let emptied = cache.size() == 0;
    info!("Cache bust requested, empty afterwards: {}", emptied);
    emptied
}

/// A [`Lookup`] backed by a plain function. Handy for wiring and tests.
pub struct FnLookup<K, V, F> {
    f: F,
    _phantom: PhantomData<fn(&K) -> V>,
}

impl<K, V, F> FnLookup<K, V, F>
where
    F: Fn(&K) -> Result<V> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<K, V, F> Lookup for FnLookup<K, V, F>
where
    K: Send + Sync,
    V: Send,
    F: Fn(&K) -> Result<V> + Send + Sync,
{
    type Key = K;
    type Value = V;

    async fn fetch(&self, key: &K) -> Result<V> {
        (self.f)(key)
    }
}
