//! User-facing notification type emitted after each mutation.
//!
//! A [`Notification`] is handed to a
//! [`NotificationSink`](crate::notify::NotificationSink) and never stored by
//! the coordinator. It serializes with `camelCase` fields so it can be passed
//! straight to a front-end toast component.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ERROR_TITLE, SUCCESS_TITLE};

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; used for successful mutations.
    Info,
    /// Error; used for failed mutations.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the person who triggered a mutation.
///
/// # Examples
///
/// ```
/// use pact_mutation::{Notification, Severity};
///
/// let n = Notification::success("Saved");
/// assert_eq!(n.severity, Severity::Info);
/// assert_eq!(n.title, "Success");
///
/// let json = serde_json::to_value(&n).unwrap();
/// assert_eq!(json["severity"], "info");
/// assert_eq!(json["message"], "Saved");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// How the message should be styled.
    pub severity: Severity,
    /// Short heading.
    pub title: String,
    /// Human-readable body.
    pub message: String,
}

impl Notification {
    /// Creates a notification with an explicit severity and title.
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }

    /// The notification emitted after a successful mutation.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, SUCCESS_TITLE, message)
    }

    /// The notification emitted after a failed mutation.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, ERROR_TITLE, message)
    }

    /// Returns `true` for error notifications.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.title, self.message)
    }
}
