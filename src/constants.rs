//! Fixed notification titles, default messages, and configuration names.

/// Title of the notification emitted after a successful mutation.
pub const SUCCESS_TITLE: &str = "Success";

/// Title of the notification emitted after a failed mutation.
pub const ERROR_TITLE: &str = "Error";

/// Error message used when a mutation does not configure its own.
///
/// # Examples
///
/// ```
/// use pact_mutation::DEFAULT_ERROR_MESSAGE;
///
/// assert_eq!(DEFAULT_ERROR_MESSAGE, "An error occurred");
/// ```
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Settings file read by [`Settings::load`](crate::settings::Settings::load).
pub const SETTINGS_FILE: &str = "pact-mutation.toml";

/// Prefix shared by every environment variable override.
pub const ENV_PREFIX: &str = "PACT_MUTATION_";

/// Query-key segment that scopes admin panel queries.
pub const ADMIN_SCOPE: &str = "admin";
