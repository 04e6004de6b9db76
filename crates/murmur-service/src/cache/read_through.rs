//! Read-through population and invalidation-on-write for entity caches.
//!
//! The cache is an optimization only. Reads degrade to the store when the
//! cache misbehaves, and writes never fail because an invalidation did.

use super::CacheInterface;
use crate::metrics::{key_kind, CacheMetrics};
use murmur_core::MurmurResult;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache consistency controller for single-entity keys.
#[derive(Clone)]
pub struct ReadThroughCache {
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
}

impl ReadThroughCache {
    /// Creates a controller with a default entity TTL.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Default entity TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key`, or loads and caches it.
    ///
    /// A miss, a read failure, or an undecodable entry all fall through to
    /// `loader`. The value is written back only after the loader succeeds;
    /// loader errors propagate and leave the cache untouched.
    pub async fn read_through<T, F, Fut>(&self, key: &str, ttl: Duration, loader: F) -> MurmurResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = MurmurResult<T>> + Send,
    {
        let kind = key_kind(key);

        match self.cache.get_raw(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!("Serving '{}' from {} cache", key, self.cache.backend());
                    CacheMetrics::hit(kind);
                    return Ok(value);
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry '{}': {}", key, e);
                    CacheMetrics::error("decode");
                }
            },
            Ok(None) => CacheMetrics::miss(kind),
            Err(e) => {
                warn!("Cache read failed for '{}', loading from store: {}", key, e);
                CacheMetrics::error("get");
            }
        }

        let value = loader().await?;

        match serde_json::to_string(&value) {
            Ok(json) => match self.cache.set_raw(key, &json, ttl).await {
                Ok(()) => CacheMetrics::fill(kind),
                Err(e) => {
                    warn!("Cache write failed for '{}': {}", key, e);
                    CacheMetrics::error("set");
                }
            },
            Err(e) => warn!("Failed to serialize '{}' for caching: {}", key, e),
        }

        Ok(value)
    }

    /// [`read_through`](Self::read_through) with the default entity TTL.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, loader: F) -> MurmurResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = MurmurResult<T>> + Send,
    {
        self.read_through(key, self.ttl, loader).await
    }

    /// Removes `key` so the next read reloads it.
    ///
    /// Absence is not an error. Failures are logged and swallowed.
    pub async fn invalidate(&self, key: &str) {
        match self.cache.delete(key).await {
            Ok(existed) => {
                debug!("Invalidated '{}' (present: {})", key, existed);
                CacheMetrics::invalidation(key_kind(key));
            }
            Err(e) => {
                warn!("Cache invalidation failed for '{}': {}", key, e);
                CacheMetrics::error("delete");
            }
        }
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("backend", &self.cache.backend())
            .field("ttl", &self.ttl)
            .finish()
    }
}
