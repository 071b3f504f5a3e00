//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use pact_mutation::cache::QueryCache;
use pact_mutation::notify::NotificationSink;
use pact_mutation::{Notification, QueryKey};

/// Everything a coordinator call did to the outside world, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Invalidated(QueryKey),
    Notified(Notification),
    Callback(String),
}

/// Shared, ordered event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    pub fn invalidations(&self) -> Vec<QueryKey> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Invalidated(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notified(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Position of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events().iter().position(pred)
    }
}

/// Cache that records every invalidation and yields once inside it, so
/// concurrent invalidations actually interleave.
#[derive(Debug, Clone)]
pub struct RecordingCache {
    log: EventLog,
}

impl RecordingCache {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl QueryCache for RecordingCache {
    async fn invalidate(&self, path: &QueryKey) {
        tokio::task::yield_now().await;
        self.log.push(Event::Invalidated(path.clone()));
    }
}

/// Sink that records every notification.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    log: EventLog,
}

impl RecordingSink {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) {
        self.log.push(Event::Notified(notification.clone()));
    }
}

/// A log plus collaborators writing to it.
pub fn recorders() -> (EventLog, Arc<RecordingCache>, Arc<RecordingSink>) {
    let log = EventLog::new();
    (
        log.clone(),
        Arc::new(RecordingCache::new(log.clone())),
        Arc::new(RecordingSink::new(log)),
    )
}
