//! Caching infrastructure for the service layer.
//!
//! [`CacheInterface`] abstracts the key-value store (Redis, or process
//! memory for single-node setups); [`ReadThroughCache`] layers the
//! read-through and invalidation policy over it.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod read_through;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::MemoryCacheService;
pub use read_through::ReadThroughCache;
pub use redis_cache::{create_redis_pool, RedisCacheService};
