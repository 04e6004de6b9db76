//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use murmur_core::{Interface, MurmurResult};
use std::time::Duration;

/// Key-value cache with per-entry TTL.
///
/// Values are JSON strings so the trait stays dyn-compatible. Every call is
/// fallible with `MurmurError::Cache`; callers decide whether a failure is
/// absorbed or surfaced.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> MurmurResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> MurmurResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> MurmurResult<bool>;

    /// Check if a key exists in the cache.
    async fn exists(&self, key: &str) -> MurmurResult<bool>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> MurmurResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> MurmurResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
