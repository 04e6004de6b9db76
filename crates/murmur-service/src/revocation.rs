//! Session revocation registry.
//!
//! Logged-out tokens are denylisted until they would have expired anyway,
//! so the registry never holds more than the currently valid sessions.

use crate::cache::{cache_keys, CacheInterface};
use crate::metrics::SessionMetrics;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_core::{Interface, MurmurResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Denylist of session tokens.
#[async_trait]
pub trait RevocationRegistry: Interface + Send + Sync {
    /// Revokes `token` until `expires_at`.
    ///
    /// A token that has already expired needs no entry and succeeds
    /// without touching the cache.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> MurmurResult<()>;

    /// Checks whether `token` has been revoked.
    ///
    /// Errors mean the registry could not answer; callers must treat them
    /// as a rejection.
    async fn is_revoked(&self, token: &str) -> MurmurResult<bool>;
}

/// Revocation registry stored as TTL-bounded cache markers.
pub struct CacheRevocationRegistry {
    cache: Arc<dyn CacheInterface>,
}

impl CacheRevocationRegistry {
    /// Creates a registry over the given cache.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }

    async fn revoke_at(&self, token: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> MurmurResult<()> {
        let Ok(ttl) = (expires_at - now).to_std() else {
            debug!("Token already expired, nothing to revoke");
            return Ok(());
        };
        if ttl.is_zero() {
            debug!("Token already expired, nothing to revoke");
            return Ok(());
        }

        self.cache
            .set_raw(&cache_keys::revoked_token(token), "1", ttl)
            .await?;

        SessionMetrics::revoked();
        info!("Session revoked for {:?}", ttl);
        Ok(())
    }
}

#[async_trait]
impl RevocationRegistry for CacheRevocationRegistry {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> MurmurResult<()> {
        self.revoke_at(token, expires_at, Utc::now()).await
    }

    async fn is_revoked(&self, token: &str) -> MurmurResult<bool> {
        self.cache.exists(&cache_keys::revoked_token(token)).await
    }
}

impl std::fmt::Debug for CacheRevocationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRevocationRegistry")
            .field("backend", &self.cache.backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheService;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn registry() -> (Arc<MemoryCacheService>, CacheRevocationRegistry) {
        let cache = Arc::new(MemoryCacheService::new());
        let registry = CacheRevocationRegistry::new(cache.clone());
        (cache, registry)
    }

    #[tokio::test]
    async fn test_ttl_bounded_by_remaining_lifetime() {
        let (cache, registry) = registry();
        let expires_at = Utc::now() + ChronoDuration::seconds(30);

        registry.revoke("tok", expires_at).await.unwrap();

        let ttl = cache.remaining_ttl("revoked-tok").unwrap();
        assert!(ttl <= Duration::from_secs(30));
        assert!(ttl > Duration::from_secs(28));
        assert!(registry.is_revoked("tok").await.unwrap());
        assert!(!registry.is_revoked("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_is_noop() {
        let (cache, registry) = registry();

        registry
            .revoke("old", Utc::now() - ChronoDuration::seconds(1))
            .await
            .unwrap();

        let now = Utc::now();
        registry.revoke_at("edge", now, now).await.unwrap();

        assert!(cache.is_empty());
        assert!(!registry.is_revoked("old").await.unwrap());
    }

    #[tokio::test]
    async fn test_entry_gone_after_token_expiry() {
        let (_cache, registry) = registry();

        registry
            .revoke("short", Utc::now() + ChronoDuration::milliseconds(50))
            .await
            .unwrap();
        assert!(registry.is_revoked("short").await.unwrap());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!registry.is_revoked("short").await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_tracks_only_unexpired_revocations() {
        let (cache, registry) = registry();

        for i in 0..1000 {
            registry
                .revoke(&format!("tok-{i}"), Utc::now() + ChronoDuration::milliseconds(20))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(100)).await;

        registry
            .revoke("fresh", Utc::now() + ChronoDuration::seconds(30))
            .await
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert!(registry.is_revoked("fresh").await.unwrap());
    }
}
