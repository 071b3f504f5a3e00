//! Mutation coordination for the PACT Consultancy site.
//!
//! The public pages (home, services, clients, contact, news) and the admin
//! panel read content through a query cache. This crate keeps those cached
//! reads in step with admin writes: a [`Mutation`](mutation::Mutation) wraps a
//! remote write and, once the write is confirmed, invalidates the configured
//! cache paths and tells the user how it went.
//!
//! # Overview
//!
//! For every `execute` call the coordinator runs a fixed sequence:
//!
//! ```text
//! perform(variables) ──ok──> invalidate paths ─> info notification ─> on_success
//!                    └─err─> error notification ─> on_error
//! ```
//!
//! Nothing is invalidated before the write is confirmed and nothing is
//! rolled back: there is no prediction, only prompt reaction.
//!
//! # Module Organization
//!
//! - [`mutation`] - The coordinator, its configuration, and the write seam
//! - [`cache`] - Query cache interface and an in-memory implementation
//! - [`notify`] - Notification sinks
//! - [`types`] - Query keys, notifications, outcomes, status
//! - [`content`] - PACT content kinds with their standard keys and messages
//! - [`settings`] - TOML and environment configuration
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pact_mutation::cache::InMemoryQueryCache;
//! use pact_mutation::content::{content_config, ContentKind, CrudAction};
//! use pact_mutation::mutation::{write_fn, Mutation};
//! use pact_mutation::notify::TracingSink;
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let cache = Arc::new(InMemoryQueryCache::new());
//! cache.set(ContentKind::Services.list_key(), json!([]));
//!
//! let create_service = Mutation::new(
//!     "create_service",
//!     write_fn(|title: String| async move {
//!         Ok::<_, String>(json!({ "id": 1, "title": title }))
//!     }),
//!     content_config(ContentKind::Services, CrudAction::Create),
//!     cache.clone(),
//!     Arc::new(TracingSink),
//! )
//! .unwrap();
//!
//! create_service.execute("Risk advisory".to_string()).await.unwrap();
//! assert_eq!(cache.is_stale(&ContentKind::Services.list_key()), Some(true));
//! # });
//! ```

pub mod cache;
pub mod constants;
pub mod content;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod mutation;
pub mod notify;
pub mod settings;
pub mod types;

pub use constants::*;
pub use error::{MutationError, SettingsError};
pub use types::*;
