//! Cached-fetch coordination.

use std::future::Future;

use tracing::debug;

use crate::cache::TtlCache;

impl<V: Clone> TtlCache<V> {
    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// success under `key` with the default TTL.
    ///
    /// A hit never invokes `fetch`. A failed fetch is returned as-is and
    /// leaves the cache untouched, so the next call goes upstream again.
    ///
    /// There is no single-flight: concurrent misses on one key each run their
    /// own `fetch`, and the last one to finish wins the slot.
    pub async fn cached_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            debug!(key, "Cache hit");
            return Ok(value);
        }

        debug!(key, "Cache miss, fetching");
        let value = fetch().await?;
        self.set(key, value.clone());
        Ok(value)
    }
}
