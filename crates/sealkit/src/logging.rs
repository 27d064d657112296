//! Log subscriber setup.
//!
//! Logs go to stderr so stdout carries only command output. The filter is
//! taken from `SEALKIT_LOG`, else from preferences, else `warn`.

use tracing_subscriber::EnvFilter;

use crate::preferences::Preferences;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SEALKIT_LOG";

const FALLBACK_FILTER: &str = "warn";

/// Pick the first candidate directive that parses.
///
/// An invalid directive is skipped rather than aborting startup.
#[must_use]
pub fn resolve_filter(env_value: Option<&str>, prefs: &Preferences) -> String {
    [env_value, Some(prefs.log_filter.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty() && EnvFilter::try_new(directive).is_ok())
        .unwrap_or(FALLBACK_FILTER)
        .to_owned()
}

/// Install the global stderr subscriber.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init(prefs: &Preferences) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = resolve_filter(env_value.as_deref(), prefs);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = %directive, "logging initialized");
    }
}
