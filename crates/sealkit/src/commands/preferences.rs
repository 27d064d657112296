//! Preferences commands: read, change the default mode, reset.

use std::path::Path;

use sealkit_core::KeyMode;

use crate::error::CommandError;
use crate::preferences::Preferences;

fn save(prefs: &Preferences, config_dir: &Path) -> Result<(), CommandError> {
    prefs.save(config_dir).map_err(|e| {
        tracing::error!(dir = %config_dir.display(), "failed to save preferences: {e}");
        CommandError::internal(format!("failed to save preferences: {e}"))
    })
}

/// Current preferences (defaults if none are stored).
#[must_use]
pub fn get_preferences(config_dir: &Path) -> Preferences {
    Preferences::load(config_dir)
}

/// Change the key mode used when a request does not name one.
///
/// # Errors
///
/// Returns an internal error if the preferences file cannot be written.
pub fn set_default_mode(config_dir: &Path, mode: KeyMode) -> Result<Preferences, CommandError> {
    let mut prefs = Preferences::load(config_dir);
    prefs.default_mode = mode;
    save(&prefs, config_dir)?;
    tracing::info!(?mode, "default key mode updated");
    Ok(prefs)
}

/// Restore every preference to its default.
///
/// # Errors
///
/// Returns an internal error if the preferences file cannot be written.
pub fn reset_preferences(config_dir: &Path) -> Result<Preferences, CommandError> {
    let prefs = Preferences::default();
    save(&prefs, config_dir)?;
    Ok(prefs)
}
