//! Shared fixtures for service tests.

use crate::cache::{CacheInterface, MemoryCacheService, ReadThroughCache};
use crate::r#impl::{
    AuthServiceImpl, FollowServiceImpl, NotificationServiceImpl, PostServiceImpl, ProfileServiceImpl,
};
use crate::revocation::CacheRevocationRegistry;
use async_trait::async_trait;
use murmur_config::SecurityConfig;
use murmur_core::{AccountId, Email, MurmurError, MurmurResult, NewAccount};
use murmur_repository::{AccountRepository, InMemoryStore};
use murmur_security::{PasswordHasher, TokenProvider};
use std::sync::Arc;
use std::time::Duration;

pub const ENTITY_TTL: Duration = Duration::from_secs(10);

/// Cache whose every call fails, as when Redis is down.
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl CacheInterface for FailingCache {
    async fn get_raw(&self, _key: &str) -> MurmurResult<Option<String>> {
        Err(MurmurError::Cache("connection refused".to_string()))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> MurmurResult<()> {
        Err(MurmurError::Cache("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> MurmurResult<bool> {
        Err(MurmurError::Cache("connection refused".to_string()))
    }

    async fn exists(&self, _key: &str) -> MurmurResult<bool> {
        Err(MurmurError::Cache("connection refused".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

pub fn security_config() -> Arc<SecurityConfig> {
    Arc::new(SecurityConfig {
        jwt_secret: "test-secret-key-for-testing-only-0123456789".to_string(),
        jwt_expiration_secs: 3600,
        ..SecurityConfig::default()
    })
}

/// Wires every service over one in-memory store and one cache.
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<dyn CacheInterface>,
    pub auth: AuthServiceImpl,
    pub profiles: ProfileServiceImpl,
    pub follows: FollowServiceImpl,
    pub posts: PostServiceImpl,
    pub notifications: NotificationServiceImpl,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryCacheService::new()))
    }

    pub fn with_cache(cache: Arc<dyn CacheInterface>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let read_through = ReadThroughCache::new(cache.clone(), ENTITY_TTL);

        Self {
            auth: AuthServiceImpl::new(
                store.clone(),
                Arc::new(PasswordHasher::with_cost(1)),
                Arc::new(TokenProvider::new(security_config())),
                Arc::new(CacheRevocationRegistry::new(cache.clone())),
            ),
            profiles: ProfileServiceImpl::new(store.clone(), read_through.clone()),
            follows: FollowServiceImpl::new(store.clone(), store.clone()),
            posts: PostServiceImpl::new(store.clone(), read_through),
            notifications: NotificationServiceImpl::new(store.clone()),
            store,
            cache,
        }
    }

    /// Inserts an account directly, bypassing password hashing.
    pub async fn account(&self, email: &str, fullname: &str) -> AccountId {
        self.store
            .create(&NewAccount {
                email: Email::new(email).unwrap(),
                password_hash: "unused".to_string(),
                fullname: fullname.to_string(),
            })
            .await
            .unwrap()
            .id
    }
}
