//! Prometheus metrics for the cache layer and session revocation.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    /// Cache reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "murmur_cache_hits_total";
    /// Cache reads that fell through to the store.
    pub const CACHE_MISSES_TOTAL: &str = "murmur_cache_misses_total";
    /// Values written back after a successful load.
    pub const CACHE_FILLS_TOTAL: &str = "murmur_cache_fills_total";
    /// Keys deleted after a write.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "murmur_cache_invalidations_total";
    /// Cache failures absorbed by the read-through path.
    pub const CACHE_ERRORS_TOTAL: &str = "murmur_cache_errors_total";

    /// Tokens added to the revocation registry.
    pub const SESSIONS_REVOKED_TOTAL: &str = "murmur_sessions_revoked_total";
    /// Requests rejected because their token was revoked or unverifiable.
    pub const SESSIONS_REJECTED_TOTAL: &str = "murmur_sessions_rejected_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(
        names::CACHE_FILLS_TOTAL,
        "Total number of values written back to the cache"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of cache invalidations"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of absorbed cache failures"
    );
    describe_counter!(
        names::SESSIONS_REVOKED_TOTAL,
        "Total number of revoked session tokens"
    );
    describe_counter!(
        names::SESSIONS_REJECTED_TOTAL,
        "Total number of requests rejected by the revocation check"
    );
}

/// Cache metrics helper.
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a hit for an entity kind.
    pub fn hit(kind: &str) {
        counter!(names::CACHE_HITS_TOTAL, "kind" => kind.to_string()).increment(1);
    }

    /// Record a miss for an entity kind.
    pub fn miss(kind: &str) {
        counter!(names::CACHE_MISSES_TOTAL, "kind" => kind.to_string()).increment(1);
    }

    /// Record a write-back.
    pub fn fill(kind: &str) {
        counter!(names::CACHE_FILLS_TOTAL, "kind" => kind.to_string()).increment(1);
    }

    /// Record an invalidation.
    pub fn invalidation(kind: &str) {
        counter!(names::CACHE_INVALIDATIONS_TOTAL, "kind" => kind.to_string()).increment(1);
    }

    /// Record an absorbed failure.
    pub fn error(operation: &'static str) {
        counter!(names::CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }
}

/// Session revocation metrics helper.
pub struct SessionMetrics;

impl SessionMetrics {
    /// Record a revoked token.
    pub fn revoked() {
        counter!(names::SESSIONS_REVOKED_TOTAL).increment(1);
    }

    /// Record a rejected request.
    pub fn rejected(reason: &'static str) {
        counter!(names::SESSIONS_REJECTED_TOTAL, "reason" => reason).increment(1);
    }
}

/// Entity kind of a cache key: the part before the trailing `-{id}`.
#[must_use]
pub fn key_kind(key: &str) -> &str {
    key.rsplit_once('-').map_or(key, |(kind, _)| kind)
}
