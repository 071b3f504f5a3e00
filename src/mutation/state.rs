//! Observable status tracking for a mutation handle.
//!
//! Every call gets a number from a counter. Only the most recently started
//! call may publish its settled status; earlier calls that finish later
//! still run their own invalidation and notification but leave the status
//! alone. The counter and the publish happen under one lock so a late settle
//! can never overwrite a newer `InFlight`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::types::MutationStatus;

#[derive(Debug)]
pub(crate) struct CallTracker {
    latest: Mutex<u64>,
    in_flight: AtomicUsize,
    status: watch::Sender<MutationStatus>,
}

impl CallTracker {
    pub(crate) fn new() -> Self {
        let (status, _) = watch::channel(MutationStatus::Idle);
        Self {
            latest: Mutex::new(0),
            in_flight: AtomicUsize::new(0),
            status,
        }
    }

    pub(crate) fn begin(self: &Arc<Self>) -> CallGuard {
        let call = {
            let mut latest = self.latest.lock();
            *latest += 1;
            self.status.send_replace(MutationStatus::InFlight);
            *latest
        };
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        CallGuard {
            tracker: Arc::clone(self),
            call,
            settled: false,
        }
    }

    pub(crate) fn status(&self) -> MutationStatus {
        *self.status.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns to `Idle` and disowns every call still in flight.
    pub(crate) fn reset(&self) {
        let mut latest = self.latest.lock();
        *latest += 1;
        self.status.send_replace(MutationStatus::Idle);
    }

    fn publish_if_latest(&self, call: u64, status: MutationStatus) -> bool {
        let latest = self.latest.lock();
        if *latest == call {
            self.status.send_replace(status);
            true
        } else {
            false
        }
    }
}

/// One in-flight call, moved into the task that runs it. Dropping an
/// unsettled guard (the task panicked or the runtime shut down) returns an
/// owned status to `Idle`.
#[derive(Debug)]
pub(crate) struct CallGuard {
    tracker: Arc<CallTracker>,
    call: u64,
    settled: bool,
}

impl CallGuard {
    pub(crate) fn call(&self) -> u64 {
        self.call
    }

    /// Publishes the settled status if this is still the latest call.
    pub(crate) fn settle(&mut self, status: MutationStatus) -> bool {
        self.settled = true;
        self.tracker.publish_if_latest(self.call, status)
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
        if !self.settled {
            self.tracker
                .publish_if_latest(self.call, MutationStatus::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_call_owns_status() {
        let tracker = Arc::new(CallTracker::new());
        let mut first = tracker.begin();
        let mut second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);

        assert!(second.settle(MutationStatus::Succeeded));
        assert!(!first.settle(MutationStatus::Failed));
        assert_eq!(tracker.status(), MutationStatus::Succeeded);

        drop(first);
        drop(second);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn abandoned_call_returns_to_idle() {
        let tracker = Arc::new(CallTracker::new());
        let guard = tracker.begin();
        assert_eq!(tracker.status(), MutationStatus::InFlight);
        drop(guard);
        assert_eq!(tracker.status(), MutationStatus::Idle);
    }

    #[test]
    fn reset_disowns_in_flight_calls() {
        let tracker = Arc::new(CallTracker::new());
        let mut guard = tracker.begin();
        tracker.reset();
        assert!(!guard.settle(MutationStatus::Succeeded));
        assert_eq!(tracker.status(), MutationStatus::Idle);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let tracker = Arc::new(CallTracker::new());
        let mut rx = tracker.subscribe();
        let mut guard = tracker.begin();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), MutationStatus::InFlight);

        guard.settle(MutationStatus::Failed);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), MutationStatus::Failed);
    }
}
