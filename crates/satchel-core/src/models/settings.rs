//! Application settings model

use serde::{Deserialize, Serialize};

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Pick light or dark automatically
    #[default]
    Auto,
}

/// Application settings
///
/// Persisted as one document outside the durable store; see
/// [`SettingsStore`](crate::settings_store::SettingsStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether notes are autosaved in the background
    pub autosave: bool,
    /// Autosave interval in minutes
    pub autosave_interval_minutes: u32,
    /// Editor font size in pixels
    pub font_size: u32,
    /// Theme mode
    pub theme: ThemeMode,
    /// Accent color as a CSS hex string
    pub accent_color: String,
    /// Whether the text assistant is offered in the editor
    pub assist_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_interval_minutes: 10,
            font_size: 16,
            theme: ThemeMode::Auto,
            accent_color: "#4F46E5".to_string(),
            assist_enabled: true,
        }
    }
}
