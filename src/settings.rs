//! Settings for mutation profiles and logging.
//!
//! Settings can be loaded from:
//! 1. TOML file (`pact-mutation.toml`)
//! 2. Environment variables (with `PACT_MUTATION_` prefix)
//!
//! Environment variables override TOML settings.
//!
//! # Example TOML Settings
//!
//! ```toml
//! [defaults]
//! error_message = "Something went wrong, please try again"
//!
//! [logging]
//! filter = "pact_mutation=debug,info"
//! pretty = true
//!
//! [mutations.update_service]
//! invalidate = [["services"], ["admin", "services"]]
//! success_message = "Service updated"
//!
//! [mutations.delete_news]
//! invalidate = [["news"], ["admin", "news"]]
//! success_message = "News item deleted"
//! error_message = "Could not delete news item"
//! ```
//!
//! # Environment Variables
//!
//! | Variable                              | Overrides                 |
//! |---------------------------------------|---------------------------|
//! | `PACT_MUTATION_DEFAULT_ERROR_MESSAGE` | `defaults.error_message`  |
//! | `PACT_MUTATION_LOG_FILTER`            | `logging.filter`          |
//! | `PACT_MUTATION_LOG_PRETTY`            | `logging.pretty`          |

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{ENV_PREFIX, SETTINGS_FILE};
use crate::error::SettingsError;
use crate::mutation::MutationConfig;
use crate::types::QueryKey;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fallbacks applied to every profile.
    pub defaults: DefaultSettings,

    /// Log output settings.
    pub logging: LoggingSettings,

    /// Named mutation profiles.
    pub mutations: BTreeMap<String, MutationProfile>,
}

/// Fallbacks applied to every mutation profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Error message for profiles that do not set one. `None` keeps the
    /// built-in `"An error occurred"`.
    pub error_message: Option<String>,
}

/// Log output settings consumed by [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,

    /// Human-readable multi-line output instead of compact lines.
    pub pretty: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            pretty: false,
        }
    }
}

/// The data-only options of a mutation, as written in settings.
///
/// # Examples
///
/// ```
/// use pact_mutation::settings::MutationProfile;
/// use pact_mutation::query_key;
///
/// let profile: MutationProfile = toml::from_str(r#"
///     invalidate = [["services"], ["services", 4]]
///     success_message = "Service updated"
/// "#).unwrap();
///
/// assert_eq!(profile.invalidate[1], query_key!["services", 4]);
/// assert_eq!(profile.error_message, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationProfile {
    /// Paths invalidated after a successful write.
    pub invalidate: Vec<QueryKey>,

    /// Success notification text.
    pub success_message: Option<String>,

    /// Error notification text.
    pub error_message: Option<String>,
}

impl MutationProfile {
    /// Turns the profile into a [`MutationConfig`] without callbacks.
    pub fn to_config<R, E, V>(&self) -> MutationConfig<R, E, V> {
        MutationConfig::from_profile(self)
    }
}

impl Settings {
    /// Load settings from `pact-mutation.toml` (if present) and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. TOML settings file
    /// 3. Default values
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = if Path::new(SETTINGS_FILE).exists() {
            Self::read_file(SETTINGS_FILE)?
        } else {
            Self::default()
        };
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a specific file path, then apply environment
    /// overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let mut settings = Self::read_file(path)?;
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML content. No environment overrides.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Apply `PACT_MUTATION_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup keyed by full variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(message) = var("DEFAULT_ERROR_MESSAGE") {
            self.defaults.error_message = Some(message);
        }
        if let Some(filter) = var("LOG_FILTER") {
            self.logging.filter = filter;
        }
        if let Some(pretty) = var("LOG_PRETTY") {
            match pretty.parse() {
                Ok(v) => self.logging.pretty = v,
                Err(_) => tracing::warn!(value = %pretty, "ignoring invalid LOG_PRETTY override"),
            }
        }
    }

    /// Validates every profile, with defaults applied, the way a
    /// [`Mutation`](crate::mutation::Mutation) would at construction.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for name in self.mutations.keys() {
            let Some(profile) = self.profile(name) else {
                continue;
            };
            profile
                .to_config::<(), (), ()>()
                .validate()
                .map_err(|source| SettingsError::Invalid {
                    profile: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Returns the named profile with the default error message filled in.
    pub fn profile(&self, name: &str) -> Option<MutationProfile> {
        let mut profile = self.mutations.get(name)?.clone();
        if profile.error_message.is_none() {
            profile.error_message = self.defaults.error_message.clone();
        }
        Some(profile)
    }

    /// Builds a [`MutationConfig`] for the named profile.
    pub fn config<R, E, V>(&self, name: &str) -> Option<MutationConfig<R, E, V>> {
        self.profile(name).map(|profile| profile.to_config())
    }
}
