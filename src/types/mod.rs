//! Value types shared by the coordinator and its collaborators.

pub mod key;
pub mod notification;
pub mod outcome;

pub use key::{KeySegment, QueryKey};
pub use notification::{Notification, Severity};
pub use outcome::{MutationStatus, Outcome};
