//! Query cache interface used by the mutation coordinator.
//!
//! The coordinator only ever *commands* the cache: it calls
//! [`QueryCache::invalidate`] for each configured path after a confirmed
//! write and never reads cache state. Any read-side behaviour (refetching,
//! subscription fan-out) belongs to the implementation.
//!
//! # Implementations
//!
//! - [`InMemoryQueryCache`](memory::InMemoryQueryCache) -- `DashMap`-backed
//!   cache with prefix invalidation and a broadcast channel announcing keys
//!   that went stale.
//!
//! Front-ends with their own query client implement [`QueryCache`] as a thin
//! adapter over it.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::QueryKey;

pub use memory::{CachedQuery, InMemoryQueryCache};

/// Marks cached query results stale.
///
/// # Contract
///
/// - Every stored entry whose key starts with `path` becomes stale.
/// - Idempotent: invalidating an already-stale or unknown path is a no-op.
/// - Infallible: implementations log their own failures and return.
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Marks all entries matching `path` stale.
    async fn invalidate(&self, path: &QueryKey);
}

#[async_trait]
impl<T: QueryCache + ?Sized> QueryCache for Arc<T> {
    async fn invalidate(&self, path: &QueryKey) {
        (**self).invalidate(path).await;
    }
}
