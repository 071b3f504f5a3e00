//! In-memory query cache.
//!
//! [`InMemoryQueryCache`] stores JSON query results keyed by [`QueryKey`] in
//! a [`DashMap`]. Invalidation marks every entry under a path prefix stale and
//! announces each key that *became* stale on a broadcast channel; consumers
//! subscribed through [`InMemoryQueryCache::subscribe`] refetch on receipt and
//! write the fresh value back with [`InMemoryQueryCache::set`].
//!
//! # Idempotence
//!
//! An entry that is already stale is not announced again, so repeated
//! invalidation of the same path schedules no extra refetches until the entry
//! has been refreshed.
//!
//! # Examples
//!
//! ```
//! use pact_mutation::cache::{InMemoryQueryCache, QueryCache};
//! use pact_mutation::{query_key, QueryKey};
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let cache = InMemoryQueryCache::new();
//! let mut refetch = cache.subscribe();
//!
//! cache.set(query_key!["services", 1], json!({"id": 1}));
//! cache.invalidate(&QueryKey::from(["services"])).await;
//!
//! assert_eq!(cache.is_stale(&query_key!["services", 1]), Some(true));
//! assert_eq!(refetch.recv().await.unwrap(), query_key!["services", 1]);
//! # });
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;

use super::QueryCache;
use crate::types::QueryKey;

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A cached query result and its freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedQuery {
    /// Last value written for the key.
    pub value: Value,
    /// `true` once invalidated and until the next [`InMemoryQueryCache::set`].
    pub stale: bool,
}

/// Thread-safe query cache with prefix invalidation.
#[derive(Debug)]
pub struct InMemoryQueryCache {
    entries: DashMap<QueryKey, CachedQuery>,
    stale_tx: broadcast::Sender<QueryKey>,
    invalidations: AtomicU64,
}

impl InMemoryQueryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates an empty cache whose stale-key channel buffers `capacity`
    /// announcements per lagging subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (stale_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            entries: DashMap::new(),
            stale_tx,
            invalidations: AtomicU64::new(0),
        }
    }

    /// Stores a fresh value, replacing any previous (possibly stale) one.
    pub fn set(&self, key: QueryKey, value: Value) {
        let entry = CachedQuery {
            value,
            stale: false,
        };
        self.entries.insert(key, entry);
    }

    /// Returns the cached entry for an exact key.
    pub fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Returns whether the entry is stale, or `None` if the key is not cached.
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.entries.get(key).map(|entry| entry.stale)
    }

    /// Removes an entry, returning it if it was present.
    pub fn remove(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Keys of all stale entries, in no particular order.
    pub fn stale_keys(&self) -> Vec<QueryKey> {
        self.entries
            .iter()
            .filter(|entry| entry.stale)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Subscribes to keys that transition from fresh to stale.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.stale_tx.subscribe()
    }

    /// Total number of `invalidate` calls received.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn mark_stale(&self, path: &QueryKey) -> Vec<QueryKey> {
        let mut newly_stale = Vec::new();
        for mut entry in self.entries.iter_mut() {
            if !entry.stale && path.is_prefix_of(entry.key()) {
                entry.stale = true;
                newly_stale.push(entry.key().clone());
            }
        }
        newly_stale
    }
}

impl Default for InMemoryQueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryCache for InMemoryQueryCache {
    async fn invalidate(&self, path: &QueryKey) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        let newly_stale = self.mark_stale(path);
        tracing::debug!(
            path = %path,
            stale = newly_stale.len(),
            "invalidated cached queries"
        );
        for key in newly_stale {
            // No subscribers is fine: the entry stays stale until the next read.
            let _ = self.stale_tx.send(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_key;
    use serde_json::json;

    #[tokio::test]
    async fn invalidate_marks_prefix_matches_only() {
        let cache = InMemoryQueryCache::new();
        cache.set(query_key!["services"], json!([]));
        cache.set(query_key!["services", 2], json!({"id": 2}));
        cache.set(query_key!["news"], json!([]));

        cache.invalidate(&query_key!["services"]).await;

        assert_eq!(cache.is_stale(&query_key!["services"]), Some(true));
        assert_eq!(cache.is_stale(&query_key!["services", 2]), Some(true));
        assert_eq!(cache.is_stale(&query_key!["news"]), Some(false));
        assert_eq!(cache.stale_keys().len(), 2);
    }

    #[tokio::test]
    async fn unknown_path_is_a_no_op() {
        let cache = InMemoryQueryCache::new();
        cache.invalidate(&query_key!["missing"]).await;
        assert!(cache.is_empty());
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[tokio::test]
    async fn set_clears_staleness() {
        let cache = InMemoryQueryCache::new();
        cache.set(query_key!["projects"], json!([1]));
        cache.invalidate(&query_key!["projects"]).await;
        cache.set(query_key!["projects"], json!([1, 2]));

        let entry = cache.get(&query_key!["projects"]).unwrap();
        assert!(!entry.stale);
        assert_eq!(entry.value, json!([1, 2]));
    }

    #[tokio::test]
    async fn repeated_invalidation_announces_once() {
        let cache = InMemoryQueryCache::new();
        let mut rx = cache.subscribe();
        cache.set(query_key!["team_members"], json!([]));

        cache.invalidate(&query_key!["team_members"]).await;
        cache.invalidate(&query_key!["team_members"]).await;

        assert_eq!(rx.recv().await.unwrap(), query_key!["team_members"]);
        assert!(rx.try_recv().is_err());
        assert_eq!(cache.invalidation_count(), 2);
    }
}
