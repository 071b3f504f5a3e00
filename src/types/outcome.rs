//! Mutation outcomes and the observable status of a mutation handle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a [`Mutation`](crate::mutation::Mutation) handle.
///
/// ```text
/// Idle -> InFlight -> Succeeded | Failed
/// Succeeded | Failed -> InFlight   (next execute)
/// any -> Idle                      (reset)
/// ```
///
/// # Examples
///
/// ```
/// use pact_mutation::MutationStatus;
///
/// assert!(!MutationStatus::InFlight.is_settled());
/// assert!(MutationStatus::Failed.is_settled());
/// assert_eq!(MutationStatus::InFlight.to_string(), "in_flight");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    /// No call has been made since creation or the last reset.
    #[default]
    Idle,
    /// The latest call is waiting on the remote write.
    InFlight,
    /// The latest call succeeded.
    Succeeded,
    /// The latest call failed.
    Failed,
}

impl MutationStatus {
    /// Returns `true` once the latest call has produced an outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for MutationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::InFlight => write!(f, "in_flight"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The result of one `execute` call.
///
/// Both arms carry the variables the call was made with, so callers that
/// fire several mutations can tell outcomes apart.
///
/// # Examples
///
/// ```
/// use pact_mutation::Outcome;
///
/// let ok: Outcome<u32, String, &str> = Outcome::Success { result: 1, variables: "a" };
/// assert!(ok.is_success());
/// assert_eq!(ok.variables(), &"a");
///
/// let failed: Outcome<u32, String, &str> = Outcome::Failure {
///     error: "network down".to_string(),
///     variables: "b",
/// };
/// assert_eq!(failed.into_result(), Err("network down".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R, E, V> {
    /// The remote write resolved.
    Success {
        /// Value returned by the remote write.
        result: R,
        /// Input the call was made with.
        variables: V,
    },
    /// The remote write rejected.
    Failure {
        /// Error returned by the remote write, unmodified.
        error: E,
        /// Input the call was made with.
        variables: V,
    },
}

impl<R, E, V> Outcome<R, E, V> {
    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns `true` for [`Outcome::Failure`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The variables the call was made with.
    pub fn variables(&self) -> &V {
        match self {
            Self::Success { variables, .. } | Self::Failure { variables, .. } => variables,
        }
    }

    /// The status this outcome settles a handle into.
    pub fn status(&self) -> MutationStatus {
        if self.is_success() {
            MutationStatus::Succeeded
        } else {
            MutationStatus::Failed
        }
    }

    /// Discards the variables and converts into a plain `Result`.
    pub fn into_result(self) -> Result<R, E> {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// Splits into the `Result` and the variables.
    pub fn into_parts(self) -> (Result<R, E>, V) {
        match self {
            Self::Success { result, variables } => (Ok(result), variables),
            Self::Failure { error, variables } => (Err(error), variables),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_idle() {
        assert_eq!(MutationStatus::default(), MutationStatus::Idle);
        assert!(!MutationStatus::Idle.is_settled());
    }

    #[test]
    fn outcome_status_mapping() {
        let ok: Outcome<(), (), u8> = Outcome::Success {
            result: (),
            variables: 1,
        };
        let err: Outcome<(), (), u8> = Outcome::Failure {
            error: (),
            variables: 2,
        };
        assert_eq!(ok.status(), MutationStatus::Succeeded);
        assert_eq!(err.status(), MutationStatus::Failed);
        assert_eq!(err.into_parts(), (Err(()), 2));
    }

    #[test]
    fn status_serialization() {
        let json = serde_json::to_value(MutationStatus::InFlight).unwrap();
        assert_eq!(json, "in_flight");
    }
}
