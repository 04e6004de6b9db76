//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use murmur_config::RedisConfig;
use murmur_core::{MurmurError, MurmurResult};
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Create a Redis connection pool and check it with a PING.
pub async fn create_redis_pool(config: &RedisConfig) -> MurmurResult<Arc<Pool>> {
    info!("Creating Redis connection pool...");

    let pool = Config::from_url(&config.url)
        .builder()
        .map_err(|e| MurmurError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size as usize)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| MurmurError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

    let mut conn = pool
        .get()
        .await
        .map_err(|e| MurmurError::Cache(format!("Failed to get Redis connection: {}", e)))?;
    redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| MurmurError::Cache(format!("Redis PING failed: {}", e)))?;

    info!("Redis connection pool created successfully");
    Ok(Arc::new(pool))
}

/// Redis-based cache service.
///
/// TTLs are set with millisecond precision so revocation markers expire
/// together with their token.
pub struct RedisCacheService {
    pool: Arc<Pool>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> MurmurResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| MurmurError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> MurmurResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| MurmurError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> MurmurResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        conn.pset_ex::<_, _, ()>(key, value, ttl_ms)
            .await
            .map_err(|e| MurmurError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}ms", key, ttl_ms);
        Ok(())
    }

    async fn delete(&self, key: &str) -> MurmurResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| MurmurError::Cache(format!("Failed to delete key '{}': {}", key, e)))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> MurmurResult<bool> {
        let mut conn = self.get_conn().await?;
        conn.exists(key)
            .await
            .map_err(|e| MurmurError::Cache(format!("Failed to check key '{}': {}", key, e)))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("status", &self.pool.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_redis_fails_pool_check() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 1,
            enabled: true,
        };

        let result = create_redis_pool(&config).await;
        assert!(matches!(result, Err(MurmurError::Cache(_))));
    }
}
