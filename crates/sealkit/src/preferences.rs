//! Non-sensitive user preferences, stored as plain JSON.
//!
//! Nothing secret lives here: no keys, no passwords, no cryptographic
//! parameters. PBKDF2 iterations, salt, nonce and modulus sizes are wire
//! constants and are not configurable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sealkit_core::KeyMode;

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "sealkit";

const PREFERENCES_FILE: &str = "preferences.json";

/// Application preferences.
///
/// Persisted to `{config_dir}/preferences.json`. Every field has a default,
/// so files written by older versions still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Key mode used when `seal`/`open` are not given one.
    #[serde(default)]
    pub default_mode: KeyMode,

    /// `tracing` filter directive applied when `SEALKIT_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Print command results as JSON.
    #[serde(default)]
    pub json_output: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_mode: KeyMode::default(),
            log_filter: default_log_filter(),
            json_output: false,
        }
    }
}

fn default_log_filter() -> String {
    "warn".into()
}

/// `{platform config dir}/sealkit`, if the platform has one.
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

// ── File I/O ───────────────────────────────────────────────────────

impl Preferences {
    /// Load preferences from `{config_dir}/preferences.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    #[must_use]
    pub fn load(config_dir: &Path) -> Self {
        let path = config_dir.join(PREFERENCES_FILE);
        fs::read_to_string(&path).map_or_else(
            |_| Self::default(),
            |contents| {
                serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), "ignoring corrupt preferences: {e}");
                    Self::default()
                })
            },
        )
    }

    /// Persist preferences to `{config_dir}/preferences.json`.
    ///
    /// Creates the directory if needed, then writes to `.tmp` and renames.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory cannot be created or the
    /// file system rejects the write/rename.
    pub fn save(&self, config_dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(config_dir)?;
        let path = config_dir.join(PREFERENCES_FILE);
        let tmp = config_dir.join(".preferences.json.tmp");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), "preferences saved");

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_values_are_correct() {
        let prefs = Preferences::default();
        assert_eq!(prefs.default_mode, KeyMode::Password);
        assert_eq!(prefs.log_filter, "warn");
        assert!(!prefs.json_output);
    }

    #[test]
    fn load_returns_default_on_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Preferences::load(dir.path()), Preferences::default());
    }

    #[test]
    fn load_returns_default_on_corrupt_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "{ not json").unwrap();
        assert_eq!(Preferences::load(dir.path()), Preferences::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences {
            default_mode: KeyMode::RawKey,
            log_filter: "sealkit=debug".into(),
            json_output: true,
        };
        prefs.save(dir.path()).unwrap();
        assert_eq!(Preferences::load(dir.path()), prefs);
        assert!(!dir.path().join(".preferences.json.tmp").exists());
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        Preferences::default().save(&nested).unwrap();
        assert!(nested.join(PREFERENCES_FILE).exists());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PREFERENCES_FILE),
            r#"{"defaultMode":"rawKey"}"#,
        )
        .unwrap();
        let prefs = Preferences::load(dir.path());
        assert_eq!(prefs.default_mode, KeyMode::RawKey);
        assert_eq!(prefs.log_filter, "warn");
        assert!(!prefs.json_output);
    }

    #[test]
    fn serialized_keys_are_camel_case() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(json["defaultMode"], "password");
        assert_eq!(json["logFilter"], "warn");
        assert_eq!(json["jsonOutput"], false);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        Preferences::default().save(dir.path()).unwrap();
        let mode = fs::metadata(dir.path().join(PREFERENCES_FILE))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
