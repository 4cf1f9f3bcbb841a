use dashmap::DashMap;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// How long a fetched payload stays usable.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Raw bytes of a cached artifact.
pub type Payload = Arc<[u8]>;

/// Value of the cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Payload,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) <= ttl
    }
}

/// In-memory store of fetched artifacts.
///
/// The key of this map is the URL each payload was fetched from. Entries older
/// than the freshness window are treated as absent and evicted lazily on the
/// next lookup; there is no background sweep and nothing is persisted.
#[derive(Debug)]
pub struct Cache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl Cache {
    /// Create an empty cache using [`FRESHNESS_WINDOW`].
    pub fn new() -> Self {
        Cache::with_ttl(FRESHNESS_WINDOW)
    }

    /// Create an empty cache with a custom freshness window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Cache { entries: DashMap::new(), ttl }
    }

    /// Look up `key` against the monotonic clock.
    pub fn get(&self, key: &str) -> Option<Payload> {
        self.get_at(key, Instant::now())
    }

    /// Store `payload` under `key`, stamped with the monotonic clock.
    pub fn set(&self, key: impl Into<String>, payload: impl Into<Payload>) {
        self.set_at(key, payload, Instant::now())
    }

    /// Look up `key` as if the current time were `now`.
    ///
    /// A stale entry is removed before returning `None`. The removal re-checks
    /// the age under the shard lock, so an entry refreshed by a concurrent
    /// [`Cache::set_at`] survives.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Payload> {
        let ttl = self.ttl;
        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(now, ttl) {
                tracing::debug!(target: "crx::cache", ?key, "Hit");
                return Some(Arc::clone(&entry.payload));
            }
        } else {
            return None;
        }

        if self.entries.remove_if(key, |_, entry| !entry.is_fresh(now, ttl)).is_some() {
            tracing::debug!(target: "crx::cache", ?key, "Evict stale entry");
        }
        None
    }

    /// Store `payload` under `key` as if it were fetched at `now`.
    pub fn set_at(&self, key: impl Into<String>, payload: impl Into<Payload>, now: Instant) {
        let entry = CacheEntry { payload: payload.into(), fetched_at: now };
        self.entries.insert(key.into(), entry);
    }

    /// Number of stored entries, stale ones included until they are evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Cache::new()
    }
}
