//! The remote write a mutation wraps.
//!
//! [`RemoteWrite`] is the one seam between the coordinator and the Content
//! Store: an async call from input variables to a result or an error. The
//! coordinator imposes nothing on the variable, output, or error types beyond
//! thread-safety; they are passed through unmodified.
//!
//! Plain async closures are adapted with [`write_fn`]:
//!
//! ```
//! use pact_mutation::mutation::{write_fn, RemoteWrite};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let save_title = write_fn(|title: String| async move {
//!     if title.is_empty() {
//!         Err("title is required")
//!     } else {
//!         Ok(title.len())
//!     }
//! });
//!
//! assert_eq!(save_title.perform(&"Strategy".to_string()).await, Ok(8));
//! assert!(save_title.perform(&String::new()).await.is_err());
//! # });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// An asynchronous write against the Content Store.
#[async_trait]
pub trait RemoteWrite<V: Send + Sync>: Send + Sync {
    /// Value produced by a successful write (e.g. the saved record).
    type Output: Send;

    /// Error produced by a failed write.
    type Error: Send;

    /// Performs the write. Called exactly once per `execute`.
    async fn perform(&self, variables: &V) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<V, W> RemoteWrite<V> for Arc<W>
where
    V: Send + Sync,
    W: RemoteWrite<V> + ?Sized,
{
    type Output = W::Output;
    type Error = W::Error;

    async fn perform(&self, variables: &V) -> Result<Self::Output, Self::Error> {
        (**self).perform(variables).await
    }
}

/// A [`RemoteWrite`] backed by a closure returning a future.
///
/// Created with [`write_fn`]. The closure receives its own clone of the
/// variables so the returned future can be `'static`.
#[derive(Clone)]
pub struct FnWrite<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnWrite<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnWrite").finish_non_exhaustive()
    }
}

/// Adapts an async closure into a [`RemoteWrite`].
pub fn write_fn<F>(f: F) -> FnWrite<F> {
    FnWrite { f }
}

#[async_trait]
impl<V, F, Fut, R, E> RemoteWrite<V> for FnWrite<F>
where
    V: Clone + Send + Sync,
    F: Fn(V) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    type Output = R;
    type Error = E;

    async fn perform(&self, variables: &V) -> Result<R, E> {
        (self.f)(variables.clone()).await
    }
}
