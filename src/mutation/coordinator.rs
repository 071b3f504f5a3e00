//! The mutation coordinator.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::config::MutationConfig;
use super::state::{CallGuard, CallTracker};
use super::write::RemoteWrite;
use crate::cache::QueryCache;
use crate::error::MutationError;
use crate::notify::NotificationSink;
use crate::types::{MutationStatus, Notification, Outcome};

/// Outcome type produced by a [`Mutation`] wrapping `W`.
pub type MutationOutcome<V, W> =
    Outcome<<W as RemoteWrite<V>>::Output, <W as RemoteWrite<V>>::Error, V>;

/// A callable mutation handle.
///
/// Wraps a [`RemoteWrite`] and drives the fixed post-processing sequence for
/// every call:
///
/// 1. await the write;
/// 2. on success, invalidate every configured path (concurrently, each once);
/// 3. emit the success notification (if configured) or the error
///    notification (always);
/// 4. run `on_success` / `on_error`.
///
/// The cache and the sink are injected; the handle never reaches for global
/// state. Each call runs on its own Tokio task, so once started it always
/// finishes. Calls may overlap freely: each keeps its own state, and
/// [`status`](Self::status) reports the most recently started call.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pact_mutation::cache::InMemoryQueryCache;
/// use pact_mutation::mutation::{write_fn, Mutation, MutationConfig};
/// use pact_mutation::notify::CollectingSink;
/// use pact_mutation::{query_key, MutationStatus, Severity};
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let cache = Arc::new(InMemoryQueryCache::new());
/// let sink = Arc::new(CollectingSink::new());
/// cache.set(query_key!["news"], json!([]));
///
/// let publish = Mutation::new(
///     "publish_news",
///     write_fn(|headline: String| async move { Ok::<_, String>(headline.len()) }),
///     MutationConfig::new()
///         .with_invalidation(["news"])
///         .with_success_message("News item published"),
///     cache.clone(),
///     sink.clone(),
/// )
/// .unwrap();
///
/// let outcome = publish.execute("PACT wins award".to_string()).await.unwrap();
/// assert!(outcome.is_success());
/// assert_eq!(publish.status(), MutationStatus::Succeeded);
/// assert_eq!(cache.is_stale(&query_key!["news"]), Some(true));
/// assert_eq!(sink.snapshot()[0].severity, Severity::Info);
/// # });
/// ```
pub struct Mutation<V, W>
where
    V: Send + Sync,
    W: RemoteWrite<V>,
{
    shared: Arc<Shared<V, W>>,
}

/// State shared between the handle and the tasks running its calls.
struct Shared<V, W>
where
    V: Send + Sync,
    W: RemoteWrite<V>,
{
    name: String,
    write: W,
    config: MutationConfig<W::Output, W::Error, V>,
    cache: Arc<dyn QueryCache>,
    sink: Arc<dyn NotificationSink>,
    tracker: Arc<CallTracker>,
}

impl<V, W> Mutation<V, W>
where
    V: Send + Sync,
    W: RemoteWrite<V>,
{
    /// Creates a handle after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::EmptyInvalidationPath`] or
    /// [`MutationError::BlankMessage`] for invalid configuration.
    pub fn new(
        name: impl Into<String>,
        write: W,
        config: MutationConfig<W::Output, W::Error, V>,
        cache: Arc<dyn QueryCache>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, MutationError> {
        let name = name.into();
        config.validate()?;
        tracing::debug!(
            mutation = %name,
            paths = config.invalidation_paths().len(),
            "mutation configured"
        );
        Ok(Self {
            shared: Arc::new(Shared {
                name,
                write,
                config,
                cache,
                sink,
                tracker: Arc::new(CallTracker::new()),
            }),
        })
    }

    /// The operation name used in logs.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// The handle's configuration.
    pub fn config(&self) -> &MutationConfig<W::Output, W::Error, V> {
        &self.shared.config
    }

    /// Status of the most recently started call. Never blocks.
    pub fn status(&self) -> MutationStatus {
        self.shared.tracker.status()
    }

    /// Subscribes to status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<MutationStatus> {
        self.shared.tracker.subscribe()
    }

    /// Number of calls currently awaiting their remote write or
    /// post-processing.
    pub fn in_flight(&self) -> usize {
        self.shared.tracker.in_flight()
    }

    /// Returns the status to `Idle`. Calls still in flight complete normally
    /// but no longer update the status.
    pub fn reset(&self) {
        self.shared.tracker.reset();
    }
}

impl<V, W> Mutation<V, W>
where
    V: Send + Sync + 'static,
    W: RemoteWrite<V> + 'static,
    W::Output: 'static,
    W::Error: 'static,
{
    /// Runs the mutation and waits for its outcome.
    ///
    /// The call runs on its own Tokio task. Dropping the returned future (a
    /// timeout, a lost `select!` branch) only stops the caller from waiting:
    /// the write, the invalidations, the notification and the callback still
    /// run to completion.
    ///
    /// A rejected write is not an error of this method: it comes back as
    /// [`Outcome::Failure`] after the error notification and `on_error` ran.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::Callback`] if `on_success` or `on_error`
    /// fails. Invalidation and notification have already happened by then.
    /// Returns [`MutationError::Cancelled`] if the runtime shut down before
    /// the call finished.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, and re-raises a panic from
    /// the write or a callback.
    pub async fn execute(&self, variables: V) -> Result<MutationOutcome<V, W>, MutationError> {
        match self.spawn(variables, false).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(MutationError::Cancelled),
        }
    }

    /// Fire-and-forget variant of [`execute`](Self::execute).
    ///
    /// The outcome is still observable through the returned handle, through
    /// [`status`](Self::status), and through the collaborators. A failing
    /// callback is logged.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn mutate(&self, variables: V) -> JoinHandle<Result<MutationOutcome<V, W>, MutationError>> {
        self.spawn(variables, true)
    }

    fn spawn(
        &self,
        variables: V,
        log_callback_error: bool,
    ) -> JoinHandle<Result<MutationOutcome<V, W>, MutationError>> {
        let guard = self.shared.tracker.begin();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = shared.run(guard, variables).await;
            if log_callback_error {
                if let Err(err) = &outcome {
                    tracing::error!(
                        mutation = %shared.name,
                        error = %err,
                        "mutation callback failed"
                    );
                }
            }
            outcome
        })
    }
}

impl<V, W> Shared<V, W>
where
    V: Send + Sync,
    W: RemoteWrite<V>,
{
    async fn run(
        &self,
        mut guard: CallGuard,
        variables: V,
    ) -> Result<MutationOutcome<V, W>, MutationError> {
        let call = guard.call();
        tracing::debug!(mutation = %self.name, call, "mutation started");

        match self.write.perform(&variables).await {
            Ok(result) => {
                self.invalidate(call).await;
                if let Some(message) = self.config.success_message() {
                    self.sink.notify(&Notification::success(message));
                }
                guard.settle(MutationStatus::Succeeded);
                tracing::info!(mutation = %self.name, call, "mutation succeeded");

                if let Some(callback) = self.config.success_callback() {
                    callback(&result, &variables).map_err(MutationError::Callback)?;
                }
                Ok(Outcome::Success { result, variables })
            }
            Err(error) => {
                self.sink
                    .notify(&Notification::error(self.config.error_message()));
                guard.settle(MutationStatus::Failed);
                tracing::warn!(mutation = %self.name, call, "mutation failed");

                if let Some(callback) = self.config.error_callback() {
                    callback(&error, &variables).map_err(MutationError::Callback)?;
                }
                Ok(Outcome::Failure { error, variables })
            }
        }
    }

    async fn invalidate(&self, call: u64) {
        let paths = self.config.invalidation_paths();
        if paths.is_empty() {
            return;
        }
        join_all(paths.iter().map(|path| self.cache.invalidate(path))).await;
        tracing::debug!(
            mutation = %self.name,
            call,
            paths = paths.len(),
            "invalidated cached queries"
        );
    }
}

impl<V, W> fmt::Debug for Mutation<V, W>
where
    V: Send + Sync,
    W: RemoteWrite<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("name", &self.shared.name)
            .field("config", &self.shared.config)
            .field("status", &self.status())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}
