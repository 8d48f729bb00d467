//! In-memory TTL cache for synthesis results.
//!
//! Two instances live in `AppState`: one for per-question quiz items and one
//! for per-tag aggregate sets. Keeping them as separate instances means the
//! key spaces cannot collide. Expiry is lazy: an expired entry is evicted by
//! the `get` that observes it, there is no background sweeper.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

struct CacheEntry<T> {
    value: T,
    created_at: Instant,
}

/// Key-value store with a fixed time-to-live per entry.
///
/// Lifetime is the process lifetime; nothing is persisted. Shared across
/// concurrent requests, so all access goes through an async `RwLock`.
pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch a live entry, or evict and miss if the entry has expired.
    pub async fn get(&self, key: &str) -> Option<T> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(e) if e.created_at.elapsed() <= self.ttl => {
                    return Some(e.value.clone());
                }
                Some(_) => {} // expired; fall through to evict
            }
        }

        let mut entries = self.entries.write().await;
        // Re-check under the write lock: a concurrent set may have refreshed
        // the entry between the two lock acquisitions.
        match entries.get(key) {
            Some(e) if e.created_at.elapsed() > self.ttl => {
                entries.remove(key);
                debug!(target: "quiz", key, "Cache entry expired, evicted");
                None
            }
            Some(e) => Some(e.value.clone()),
            None => None,
        }
    }

    /// Insert or overwrite, stamping the current time.
    pub async fn set(&self, key: &str, value: T) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Drop every entry. Intended for process-startup reset only.
    #[allow(dead_code)]
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
