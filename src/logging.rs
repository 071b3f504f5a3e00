//! Log initialisation.
//!
//! Installs a `tracing_subscriber` registry with an `EnvFilter` and a `fmt`
//! layer. `RUST_LOG`, when set, wins over the configured filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::settings::LoggingSettings;

/// Builds the filter: `RUST_LOG` if set and valid, otherwise the configured
/// directive, otherwise `info`.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Returns `false` if a global subscriber was already set (for example by a
/// test harness); the existing one is left in place.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(settings));
    let result = if settings.pretty {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
    };
    result.is_ok()
}
