//! Whole-object settings persistence
//!
//! Settings live outside the durable store as a single JSON document,
//! snapshotted in full on every save. The record is small and flat, so
//! synchronous I/O is fine here.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::Settings;

/// Fixed file name of the settings document
const SETTINGS_FILE_NAME: &str = "settings.json";

/// File-backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform config directory
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("satchel")
            .join(SETTINGS_FILE_NAME)
    }

    /// Load the settings document
    ///
    /// An absent or unreadable file yields the hard-coded defaults; loading
    /// never fails.
    #[must_use]
    pub fn load(&self) -> Settings {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %self.path.display(), "ignoring malformed settings file: {error}");
                Settings::default()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Settings::default(),
            Err(error) => {
                tracing::warn!(path = %self.path.display(), "could not read settings file: {error}");
                Settings::default()
            }
        }
    }

    /// Persist the full settings document, creating parent directories as needed
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}
