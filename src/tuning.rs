//! Agent tuning, optionally overridden by a JSON file. Every field
//! falls back to the built-in constants, so a partial file only
//! changes what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::PatrolMode;
use crate::constants::{
    DETECTION_RADIUS, ENEMY_RUN_SPEED, ENEMY_WALK_SPEED, EYE_HEIGHT, FIELD_OF_VIEW_DEGREES,
    NEAR_SENSE_RADIUS, SEARCH_DURATION_SECONDS,
};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse tuning file: {0}")]
    Json(#[from] serde_json::Error),
}

/// The knobs that shape an enemy agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub detection_radius: f32,
    pub search_duration: f32,
    pub near_sense_radius: f32,
    pub fov_degrees: f32,
    pub eye_height: f32,
    pub patrol_mode: PatrolMode,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: ENEMY_WALK_SPEED,
            run_speed: ENEMY_RUN_SPEED,
            detection_radius: DETECTION_RADIUS,
            search_duration: SEARCH_DURATION_SECONDS,
            near_sense_radius: NEAR_SENSE_RADIUS,
            fov_degrees: FIELD_OF_VIEW_DEGREES,
            eye_height: EYE_HEIGHT,
            patrol_mode: PatrolMode::Random,
        }
    }
}

/// Load tuning from a JSON file.
pub fn load(path: &Path) -> Result<Tuning, TuningError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
