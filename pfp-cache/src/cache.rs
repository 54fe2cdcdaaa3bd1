//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// Cache entry with TTL.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

/// Keyed store whose entries expire after a TTL.
///
/// Thread-safe. An entry is returned by [`get`](Self::get) only while less
/// than its TTL has elapsed since it was set; expired entries read as absent
/// and are purged on access or by [`cleanup_expired`](Self::cleanup_expired).
/// There is no capacity bound. Concurrent writes to one key are
/// last-writer-wins.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache whose `set` uses `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Gets a live value by key.
    ///
    /// Returns None if never set or expired. Expired entries are removed.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Re-check under the write lock: another writer may have refreshed it.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(CacheEntry::is_expired) {
            entries.remove(key);
        }
        None
    }

    /// Stores a value with the default TTL, replacing any previous entry.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value with a custom TTL, replacing any previous entry.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        self.entries.write().insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Removes a cached entry.
    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Spawns a task that calls [`cleanup_expired`](Self::cleanup_expired)
    /// every `period`. The task ends once the last `Arc` to the cache is gone.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        let period = period.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.cleanup_expired();
                if removed > 0 {
                    debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                }
            }
        })
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Expired entries
    pub expired_entries: usize,
    /// Valid (non-expired) entries
    pub valid_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<String> {
        TtlCache::new(Duration::from_secs(60))
    }

    #[test]
    fn test_cache_set_get() {
        let cache = cache();
        cache.set("discord:1", "nelly".to_string());
        assert_eq!(cache.get("discord:1").as_deref(), Some("nelly"));
    }

    #[test]
    fn test_cache_miss() {
        assert!(cache().get("discord:404").is_none());
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = cache();
        cache.set("k", "old".to_string());
        cache.set("k", "new".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_remove() {
        let cache = cache();
        cache.set("k", "v".to_string());
        cache.remove("k");
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_cache_clear() {
        let cache = cache();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = cache();
        cache.set_with_ttl("k", "v".to_string(), Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.get("k").is_none());
        // The expired entry is purged by the read.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_is_never_visible() {
        let cache = cache();
        cache.set_with_ttl("k", "v".to_string(), Duration::ZERO);
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_cache_stats() {
        let cache = cache();
        cache.set("a", "1".to_string());
        cache.set_with_ttl("b", "2".to_string(), Duration::ZERO);
        assert_eq!(
            cache.stats(),
            CacheStats {
                total_entries: 2,
                expired_entries: 1,
                valid_entries: 1,
            }
        );
    }

    #[test]
    fn test_cache_cleanup_expired() {
        let cache = cache();
        cache.set_with_ttl("a", "1".to_string(), Duration::from_millis(1));
        cache.set("b", "2".to_string());
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(cache());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        cache.set(&format!("k{}", j % 10), format!("{i}-{j}"));
                        let _ = cache.get(&format!("k{}", (j + 1) % 10));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
    }

    #[tokio::test]
    async fn test_sweeper_purges_expired() {
        let cache = Arc::new(cache());
        cache.set_with_ttl("a", "1".to_string(), Duration::from_millis(5));
        cache.set("b", "2".to_string());

        let handle = cache.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.len(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_cache_dropped() {
        let cache = Arc::new(cache());
        let handle = cache.spawn_sweeper(Duration::from_millis(5));
        drop(cache);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should exit")
            .unwrap();
    }
}
