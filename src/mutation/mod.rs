//! Mutation coordination: wrap a remote write, then keep cached reads and the
//! user in step with its outcome.
//!
//! - [`RemoteWrite`] / [`write_fn`] -- the write being wrapped.
//! - [`MutationConfig`] -- invalidation paths, messages, callbacks.
//! - [`Mutation`] -- the handle that runs calls and exposes their status.

pub mod config;
pub mod coordinator;
mod state;
pub mod write;

pub use config::{ErrorCallback, MutationConfig, SuccessCallback};
pub use coordinator::{Mutation, MutationOutcome};
pub use write::{write_fn, FnWrite, RemoteWrite};
