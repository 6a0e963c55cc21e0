//! Player-facing settings persisted between sessions. Volumes are
//! stored as 0-100 sliders and converted to decibels for the mixer.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MUTE_DECIBELS;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub music_volume: u8,
    pub sounds_volume: u8,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            music_volume: 50,
            sounds_volume: 50,
        }
    }
}

/// Map a 0-100 slider value onto the mixer's decibel scale. Zero mutes.
pub fn to_decibels(volume: u8) -> f32 {
    if volume == 0 {
        return MUTE_DECIBELS;
    }
    (volume as f32 / 100.0).log10() * 20.0
}

/// Load settings from a JSON file.
pub fn load(path: &Path) -> Result<PlayerSettings, SettingsError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write settings out as pretty-printed JSON.
pub fn save(path: &Path, settings: &PlayerSettings) -> Result<(), SettingsError> {
    let text = serde_json::to_string_pretty(settings)?;
    fs::write(path, text)?;
    Ok(())
}

/// Load settings, treating a missing file as a fresh install. Any other
/// failure is logged and the defaults stand in.
pub fn load_or_default(path: &Path) -> PlayerSettings {
    match load(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            PlayerSettings::default()
        }
        Err(err) => {
            log::warn!("falling back to default settings: {}", err);
            PlayerSettings::default()
        }
    }
}
