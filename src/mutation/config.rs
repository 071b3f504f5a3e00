//! Per-mutation configuration.

use std::fmt;

use crate::constants::DEFAULT_ERROR_MESSAGE;
use crate::error::MutationError;
use crate::settings::MutationProfile;
use crate::types::QueryKey;

/// Callback run after a successful write, with the result and the variables.
pub type SuccessCallback<R, V> = Box<dyn Fn(&R, &V) -> anyhow::Result<()> + Send + Sync>;

/// Callback run after a failed write, with the error and the variables.
pub type ErrorCallback<E, V> = Box<dyn Fn(&E, &V) -> anyhow::Result<()> + Send + Sync>;

/// What a [`Mutation`](super::Mutation) does around its remote write.
///
/// | Option               | Default               |
/// |----------------------|-----------------------|
/// | `invalidation_paths` | empty                 |
/// | `success_message`    | none (no notification)|
/// | `error_message`      | `"An error occurred"` |
/// | `on_success`         | none                  |
/// | `on_error`           | none                  |
///
/// `R`, `E` and `V` are the write's output, error, and variable types; they
/// only matter for the callbacks.
///
/// # Examples
///
/// ```
/// use pact_mutation::mutation::MutationConfig;
/// use pact_mutation::{query_key, QueryKey};
///
/// let config = MutationConfig::<u64, String, String>::new()
///     .with_invalidation(["services"])
///     .with_invalidation(query_key!["admin", "services"])
///     .with_success_message("Service saved")
///     .on_success(|id, title| {
///         println!("saved {title} as {id}");
///         Ok(())
///     });
///
/// assert_eq!(config.invalidation_paths().len(), 2);
/// assert_eq!(config.error_message(), "An error occurred");
/// assert!(config.validate().is_ok());
/// ```
pub struct MutationConfig<R, E, V> {
    invalidation_paths: Vec<QueryKey>,
    success_message: Option<String>,
    error_message: Option<String>,
    on_success: Option<SuccessCallback<R, V>>,
    on_error: Option<ErrorCallback<E, V>>,
}

impl<R, E, V> MutationConfig<R, E, V> {
    /// Creates a configuration with every option at its default.
    pub fn new() -> Self {
        Self {
            invalidation_paths: Vec::new(),
            success_message: None,
            error_message: None,
            on_success: None,
            on_error: None,
        }
    }

    /// Builds the data-only part of a configuration from a settings profile.
    pub fn from_profile(profile: &MutationProfile) -> Self {
        Self {
            invalidation_paths: profile.invalidate.clone(),
            success_message: profile.success_message.clone(),
            error_message: profile.error_message.clone(),
            on_success: None,
            on_error: None,
        }
    }

    /// Adds a path to invalidate after a successful write.
    #[must_use]
    pub fn with_invalidation(mut self, path: impl Into<QueryKey>) -> Self {
        self.invalidation_paths.push(path.into());
        self
    }

    /// Adds several paths to invalidate after a successful write.
    #[must_use]
    pub fn with_invalidations<I, K>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<QueryKey>,
    {
        self.invalidation_paths
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the message of the success notification.
    #[must_use]
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Sets the message of the error notification.
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Sets the success callback, replacing any previous one.
    #[must_use]
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&R, &V) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Sets the error callback, replacing any previous one.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&E, &V) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Paths invalidated after a successful write, in configured order.
    pub fn invalidation_paths(&self) -> &[QueryKey] {
        &self.invalidation_paths
    }

    /// The success notification text, if any.
    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    /// The error notification text, falling back to
    /// [`DEFAULT_ERROR_MESSAGE`].
    pub fn error_message(&self) -> &str {
        self.error_message
            .as_deref()
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
    }

    pub(crate) fn success_callback(&self) -> Option<&SuccessCallback<R, V>> {
        self.on_success.as_ref()
    }

    pub(crate) fn error_callback(&self) -> Option<&ErrorCallback<E, V>> {
        self.on_error.as_ref()
    }

    /// Checks that every path is non-empty and no message is blank.
    ///
    /// Duplicate paths are allowed.
    pub fn validate(&self) -> Result<(), MutationError> {
        if let Some(index) = self.invalidation_paths.iter().position(QueryKey::is_empty) {
            return Err(MutationError::EmptyInvalidationPath { index });
        }
        if is_blank(self.success_message.as_deref()) {
            return Err(MutationError::BlankMessage {
                field: "success_message",
            });
        }
        if is_blank(self.error_message.as_deref()) {
            return Err(MutationError::BlankMessage {
                field: "error_message",
            });
        }
        Ok(())
    }
}

fn is_blank(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.trim().is_empty())
}

impl<R, E, V> Default for MutationConfig<R, E, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E, V> fmt::Debug for MutationConfig<R, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationConfig")
            .field("invalidation_paths", &self.invalidation_paths)
            .field("success_message", &self.success_message)
            .field("error_message", &self.error_message)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
