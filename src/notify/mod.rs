//! Notification sinks.
//!
//! The coordinator hands each [`Notification`] to a [`NotificationSink`] and
//! moves on: sinks are fire-and-forget and return nothing. Three sinks are
//! provided:
//!
//! - [`TracingSink`] -- writes notifications to the `tracing` pipeline.
//! - [`CollectingSink`] -- keeps notifications in memory, for tests and for
//!   server-side rendering of flash messages.
//! - [`ChannelSink`] -- forwards notifications to a Tokio channel feeding a
//!   toast queue.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::types::{Notification, Severity};

/// Receives user-facing notifications.
///
/// Implementations must not block and must not fail the caller: any
/// delivery problem is logged and dropped.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: &Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification);
    }
}

/// Logs notifications through `tracing`.
///
/// Info notifications are logged at `INFO`, error notifications at `WARN`
/// (the failure itself is the caller's to report at `ERROR`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(
                title = %notification.title,
                "{}",
                notification.message
            ),
            Severity::Error => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.message
            ),
        }
    }
}

/// Records every notification in memory.
///
/// # Examples
///
/// ```
/// use pact_mutation::notify::{CollectingSink, NotificationSink};
/// use pact_mutation::Notification;
///
/// let sink = CollectingSink::new();
/// sink.notify(&Notification::success("Saved"));
/// assert_eq!(sink.len(), 1);
///
/// let drained = sink.take();
/// assert_eq!(drained[0].message, "Saved");
/// assert!(sink.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    received: Mutex<Vec<Notification>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the notifications received so far.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    /// Drains and returns the notifications received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock())
    }

    /// Number of notifications held.
    pub fn len(&self) -> usize {
        self.received.lock().len()
    }

    /// Returns `true` if no notifications are held.
    pub fn is_empty(&self) -> bool {
        self.received.lock().is_empty()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: &Notification) {
        self.received.lock().push(notification.clone());
    }
}

/// Forwards notifications to an unbounded Tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    /// Creates a sink together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Wraps an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: &Notification) {
        if self.tx.send(notification.clone()).is_err() {
            tracing::debug!(
                message = %notification.message,
                "notification receiver closed, dropping notification"
            );
        }
    }
}
