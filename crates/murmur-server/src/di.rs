//! Component graph for the server.
//!
//! [`AppModuleBuilder`] takes the infrastructure handles created at startup
//! (database pool, cache backend, configuration) and wires every repository
//! and service on top of them. The result is an [`AppModule`] that can hand
//! out an [`AppState`] for the router.

use murmur_config::{CacheConfig, SecurityConfig};
use murmur_core::{MurmurError, MurmurResult};
use murmur_repository::{
    DatabasePoolInterface, PgAccountRepository, PgFollowRepository, PgNotificationRepository, PgPostRepository,
    PgProfileRepository,
};
use murmur_rest::AppState;
use murmur_security::{PasswordHasher, TokenProvider, TokenProviderInterface};
use murmur_service::{
    AuthService, AuthServiceImpl, CacheInterface, CacheRevocationRegistry, FollowService, FollowServiceImpl,
    NotificationService, NotificationServiceImpl, PostService, PostServiceImpl, ProfileService, ProfileServiceImpl,
    ReadThroughCache,
};
use std::sync::Arc;

/// Fully wired services plus the handles they share.
#[derive(Clone)]
pub struct AppModule {
    database: Arc<dyn DatabasePoolInterface>,
    cache: Arc<dyn CacheInterface>,
    token_provider: Arc<dyn TokenProviderInterface>,
    auth_service: Arc<dyn AuthService>,
    profile_service: Arc<dyn ProfileService>,
    follow_service: Arc<dyn FollowService>,
    post_service: Arc<dyn PostService>,
    notification_service: Arc<dyn NotificationService>,
}

impl AppModule {
    /// Database pool shared by every repository.
    pub fn database(&self) -> Arc<dyn DatabasePoolInterface> {
        self.database.clone()
    }

    /// Cache backend shared by the read-through cache and the revocation registry.
    pub fn cache(&self) -> Arc<dyn CacheInterface> {
        self.cache.clone()
    }

    /// Issuer and verifier of session tokens.
    pub fn token_provider(&self) -> Arc<dyn TokenProviderInterface> {
        self.token_provider.clone()
    }

    pub fn auth_service(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn profile_service(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    pub fn follow_service(&self) -> Arc<dyn FollowService> {
        self.follow_service.clone()
    }

    pub fn post_service(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    pub fn notification_service(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }

    /// Builds the router state.
    pub fn app_state(&self) -> AppState {
        AppState {
            auth_service: self.auth_service(),
            profile_service: self.profile_service(),
            follow_service: self.follow_service(),
            post_service: self.post_service(),
            notification_service: self.notification_service(),
            database: self.database(),
        }
    }
}

impl std::fmt::Debug for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModule")
            .field("cache_backend", &self.cache.backend())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppModule`].
#[derive(Default)]
pub struct AppModuleBuilder {
    database: Option<Arc<dyn DatabasePoolInterface>>,
    cache: Option<Arc<dyn CacheInterface>>,
    security_config: SecurityConfig,
    cache_config: CacheConfig,
}

impl AppModuleBuilder {
    /// Creates a builder with default security and cache settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database pool.
    pub fn with_database_pool(mut self, pool: Arc<dyn DatabasePoolInterface>) -> Self {
        self.database = Some(pool);
        self
    }

    /// Sets the cache backend.
    pub fn with_cache(mut self, cache: Arc<dyn CacheInterface>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the security configuration.
    pub fn with_security_config(mut self, config: SecurityConfig) -> Self {
        self.security_config = config;
        self
    }

    /// Sets the entity cache configuration.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Wires repositories and services.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the pool or cache is missing.
    pub fn build(self) -> MurmurResult<AppModule> {
        let database = self
            .database
            .ok_or_else(|| MurmurError::Configuration("Database pool is required".to_string()))?;
        let cache = self
            .cache
            .ok_or_else(|| MurmurError::Configuration("Cache backend is required".to_string()))?;

        let accounts = Arc::new(PgAccountRepository::new(database.clone()));
        let profiles = Arc::new(PgProfileRepository::new(database.clone()));
        let follows = Arc::new(PgFollowRepository::new(database.clone()));
        let posts = Arc::new(PgPostRepository::new(database.clone()));
        let notifications = Arc::new(PgNotificationRepository::new(database.clone()));

        let read_through = ReadThroughCache::new(cache.clone(), self.cache_config.entity_ttl());
        let password_hasher = Arc::new(PasswordHasher::with_cost(self.security_config.password_hash_cost));
        let token_provider: Arc<dyn TokenProviderInterface> =
            Arc::new(TokenProvider::new(Arc::new(self.security_config)));
        let revocations = Arc::new(CacheRevocationRegistry::new(cache.clone()));

        Ok(AppModule {
            auth_service: Arc::new(AuthServiceImpl::new(
                accounts,
                password_hasher,
                token_provider.clone(),
                revocations,
            )),
            profile_service: Arc::new(ProfileServiceImpl::new(profiles.clone(), read_through.clone())),
            follow_service: Arc::new(FollowServiceImpl::new(follows, profiles)),
            post_service: Arc::new(PostServiceImpl::new(posts, read_through)),
            notification_service: Arc::new(NotificationServiceImpl::new(notifications)),
            database,
            cache,
            token_provider,
        })
    }
}
