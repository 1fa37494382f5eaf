//! Game settings and debug toggles
//!
//! An explicit value threaded into the simulation instead of a global.
//! Persisted as JSON next to the binary; a missing or broken file falls back
//! to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file failed to load
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Debug ===
    /// Master debug switch; overlays below only show while this is on
    pub debug_mode: bool,
    /// Draw collision circles
    pub show_hitboxes: bool,
    /// Draw enemy HP bars
    pub show_hp_bars: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Simulation ===
    /// RNG seed for the run; `None` picks one at startup
    pub seed: Option<u64>,
    /// Card table location
    pub card_data_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_mode: true,
            show_hitboxes: false,
            show_hp_bars: true,
            show_fps: true,

            seed: None,
            card_data_path: "data/cards.json".to_string(),
        }
    }
}

impl Settings {
    /// Effective hitbox overlay (respects debug_mode)
    pub fn effective_hitboxes(&self) -> bool {
        self.debug_mode && self.show_hitboxes
    }

    /// Effective HP bar overlay (respects debug_mode)
    pub fn effective_hp_bars(&self) -> bool {
        self.debug_mode && self.show_hp_bars
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"show_hitboxes": true, "seed": 9}"#).unwrap();
        assert!(settings.show_hitboxes);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.card_data_path, "data/cards.json");
        assert!(settings.effective_hitboxes());
    }

    #[test]
    fn test_frontend_keys_are_ignored() {
        // Video and audio belong to whatever frontend shares the file
        let settings =
            Settings::from_json(r#"{"vsync": false, "master_volume": 0.5, "show_fps": false}"#)
                .unwrap();
        assert!(!settings.show_fps);
        assert_eq!(settings.debug_mode, Settings::default().debug_mode);
    }

    #[test]
    fn test_overlays_need_debug_mode() {
        let settings = Settings {
            debug_mode: false,
            show_hitboxes: true,
            ..Default::default()
        };
        assert!(!settings.effective_hitboxes());
        assert!(!settings.effective_hp_bars());
    }

    #[test]
    fn test_missing_file_defaults() {
        assert_eq!(
            Settings::load_or_default("/nonexistent/settings.json"),
            Settings::default()
        );
    }
}
