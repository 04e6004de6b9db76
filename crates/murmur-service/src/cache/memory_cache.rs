//! In-process cache for single-node deployments and tests.

use super::CacheInterface;
use async_trait::async_trait;
use murmur_core::MurmurResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Lifetime used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn expiry_after(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// In-memory cache with per-entry expiry.
///
/// Expired entries are dropped on access and swept on every write, so the
/// map only holds entries that are still live.
#[derive(Default)]
pub struct MemoryCacheService {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCacheService {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of a live entry.
    #[must_use]
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .lock()
            .get(key)
            .and_then(|entry| entry.expires_at.checked_duration_since(now))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl CacheInterface for MemoryCacheService {
    async fn get_raw(&self, key: &str) -> MurmurResult<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> MurmurResult<()> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: expiry_after(now, ttl),
        };

        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        let swept = before - entries.len();
        entries.insert(key.to_string(), entry);

        debug!("Cached key '{}' in memory for {:?} (swept {} expired)", key, ttl, swept);
        Ok(())
    }

    async fn delete(&self, key: &str) -> MurmurResult<bool> {
        let removed = self.entries.lock().remove(key);
        Ok(removed.is_some_and(|entry| entry.expires_at > Instant::now()))
    }

    async fn exists(&self, key: &str) -> MurmurResult<bool> {
        Ok(self.live_value(key).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheService")
            .field("entries", &self.len())
            .finish()
    }
}
