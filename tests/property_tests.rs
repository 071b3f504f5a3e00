//! Property-based tests using proptest.
//!
//! Verifies the coordinator's invariants under arbitrary invalidation sets
//! and outcomes: each configured path is invalidated exactly once per
//! successful call and never on failure, and every call produces the
//! expected number of notifications. Also checks prefix-matching and
//! idempotence of the in-memory cache.

mod common;

use std::collections::HashMap;

use proptest::prelude::*;
use serde_json::json;

use common::recorders;
use pact_mutation::cache::{InMemoryQueryCache, QueryCache};
use pact_mutation::mutation::{write_fn, Mutation, MutationConfig};
use pact_mutation::{KeySegment, QueryKey, Severity};

// ─── Arbitrary Strategies ───────────────────────────────────────────────────

fn arb_segment() -> impl Strategy<Value = KeySegment> {
    prop_oneof![
        "[a-z_]{1,12}".prop_map(KeySegment::Str),
        (0i64..1000).prop_map(KeySegment::Num),
    ]
}

fn arb_key() -> impl Strategy<Value = QueryKey> {
    prop::collection::vec(arb_segment(), 1..4).prop_map(QueryKey::from)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn counts(keys: &[QueryKey]) -> HashMap<QueryKey, usize> {
    let mut map = HashMap::new();
    for key in keys {
        *map.entry(key.clone()).or_insert(0) += 1;
    }
    map
}

// ─── Property Tests: Coordinator Invariants ─────────────────────────────────

proptest! {
    /// A successful call invalidates exactly the configured multiset of paths.
    #[test]
    fn success_invalidates_each_path_once(paths in prop::collection::vec(arb_key(), 0..8)) {
        let rt = runtime();
        let (log, cache, sink) = recorders();
        let mutation = Mutation::new(
            "prop_success",
            write_fn(|_: u8| async { Ok::<_, ()>(()) }),
            MutationConfig::new().with_invalidations(paths.clone()),
            cache,
            sink,
        )
        .unwrap();

        rt.block_on(mutation.execute(0)).unwrap();
        prop_assert_eq!(counts(&log.invalidations()), counts(&paths));
    }

    /// A failed call never invalidates and always emits exactly one error.
    #[test]
    fn failure_never_invalidates(
        paths in prop::collection::vec(arb_key(), 0..8),
        message in proptest::option::of("[A-Za-z ]{1,30}[A-Za-z]"),
    ) {
        let rt = runtime();
        let (log, cache, sink) = recorders();
        let mut config = MutationConfig::new().with_invalidations(paths);
        if let Some(message) = &message {
            config = config.with_error_message(message.clone());
        }
        let mutation = Mutation::new(
            "prop_failure",
            write_fn(|_: u8| async { Err::<(), _>("rejected") }),
            config,
            cache,
            sink,
        )
        .unwrap();

        rt.block_on(mutation.execute(0)).unwrap();
        prop_assert!(log.invalidations().is_empty());
        let notifications = log.notifications();
        prop_assert_eq!(notifications.len(), 1);
        prop_assert_eq!(notifications[0].severity, Severity::Error);
        let expected = message.unwrap_or_else(|| "An error occurred".to_string());
        prop_assert_eq!(&notifications[0].message, &expected);
    }

    /// Notification count per call is 1 on failure, and 0 or 1 on success
    /// depending on whether a success message is configured.
    #[test]
    fn one_notification_per_call(
        outcomes in prop::collection::vec(any::<bool>(), 1..10),
        with_message in any::<bool>(),
    ) {
        let rt = runtime();
        let (log, cache, sink) = recorders();
        let mut config = MutationConfig::new().with_invalidation(["items"]);
        if with_message {
            config = config.with_success_message("Saved");
        }
        let mutation = Mutation::new(
            "prop_count",
            write_fn(|ok: bool| async move { if ok { Ok(()) } else { Err(()) } }),
            config,
            cache,
            sink,
        )
        .unwrap();

        rt.block_on(async {
            for ok in &outcomes {
                mutation.execute(*ok).await.unwrap();
            }
        });

        let successes = outcomes.iter().filter(|ok| **ok).count();
        let failures = outcomes.len() - successes;
        let expected = failures + if with_message { successes } else { 0 };
        prop_assert_eq!(log.notifications().len(), expected);
        prop_assert_eq!(log.invalidations().len(), successes);
    }
}

// ─── Property Tests: Cache Semantics ────────────────────────────────────────

proptest! {
    /// Invalidation marks exactly the entries the path is a prefix of.
    #[test]
    fn invalidation_matches_prefixes(
        stored in prop::collection::vec(arb_key(), 0..12),
        path in arb_key(),
    ) {
        let rt = runtime();
        let cache = InMemoryQueryCache::new();
        for key in &stored {
            cache.set(key.clone(), json!(null));
        }

        rt.block_on(cache.invalidate(&path));

        for key in &stored {
            prop_assert_eq!(cache.is_stale(key), Some(path.is_prefix_of(key)));
        }
    }

    /// Invalidating twice leaves the same state and announces nothing new.
    #[test]
    fn invalidation_is_idempotent(
        stored in prop::collection::vec(arb_key(), 0..12),
        path in arb_key(),
    ) {
        let rt = runtime();
        let cache = InMemoryQueryCache::new();
        for key in &stored {
            cache.set(key.clone(), json!(null));
        }
        let mut rx = cache.subscribe();

        rt.block_on(cache.invalidate(&path));
        let mut after_once = cache.stale_keys();
        let mut first_announced = 0;
        while rx.try_recv().is_ok() {
            first_announced += 1;
        }

        rt.block_on(cache.invalidate(&path));
        let mut after_twice = cache.stale_keys();
        after_once.sort_by_key(|k| k.to_string());
        after_twice.sort_by_key(|k| k.to_string());

        prop_assert_eq!(after_once.len(), first_announced);
        prop_assert_eq!(after_once, after_twice);
        prop_assert!(rx.try_recv().is_err());
    }
}
