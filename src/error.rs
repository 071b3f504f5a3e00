//! Error types for mutation coordination and settings loading.
//!
//! Remote write failures are *not* represented here: they travel back to the
//! caller untouched inside [`Outcome::Failure`](crate::types::Outcome). The
//! errors below cover what the coordinator itself can reject (bad
//! configuration) and what it refuses to swallow (callback errors).

use thiserror::Error;

/// Errors raised by a [`Mutation`](crate::mutation::Mutation) handle.
///
/// # Examples
///
/// ```
/// use pact_mutation::MutationError;
///
/// let err = MutationError::EmptyInvalidationPath { index: 2 };
/// assert_eq!(
///     err.to_string(),
///     "invalidation path at index 2 is empty"
/// );
/// assert!(err.is_config());
/// ```
#[derive(Debug, Error)]
pub enum MutationError {
    /// An invalidation path had no segments.
    ///
    /// An empty path would match every cached query, which is never what a
    /// single content write means.
    #[error("invalidation path at index {index} is empty")]
    EmptyInvalidationPath {
        /// Position of the offending path in the configured set.
        index: usize,
    },

    /// A configured notification message was empty or whitespace only.
    #[error("{field} must not be blank")]
    BlankMessage {
        /// Which option carried the blank text.
        field: &'static str,
    },

    /// The caller-supplied `on_success` or `on_error` callback failed.
    ///
    /// Returned after invalidation and notification already ran.
    #[error("mutation callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    /// The task running the call was cancelled before it finished, which
    /// only happens when the runtime shuts down.
    #[error("mutation task was cancelled")]
    Cancelled,
}

impl MutationError {
    /// Returns `true` for errors detected while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::EmptyInvalidationPath { .. } | Self::BlankMessage { .. }
        )
    }
}

/// Errors raised while loading [`Settings`](crate::settings::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the expected structure.
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// A named mutation profile failed validation.
    #[error("invalid mutation profile '{profile}': {source}")]
    Invalid {
        /// Profile name as written in the settings file.
        profile: String,
        /// The validation failure.
        #[source]
        source: MutationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = MutationError::BlankMessage {
            field: "success_message",
        };
        assert_eq!(err.to_string(), "success_message must not be blank");

        let err = MutationError::Callback(anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "mutation callback failed: boom");
        assert!(!err.is_config());
        assert!(!MutationError::Cancelled.is_config());
    }

    #[test]
    fn settings_error_wraps_profile_name() {
        let err = SettingsError::Invalid {
            profile: "update_service".to_string(),
            source: MutationError::EmptyInvalidationPath { index: 0 },
        };
        let text = err.to_string();
        assert!(text.contains("update_service"));
        assert!(text.contains("index 0"));
    }
}
