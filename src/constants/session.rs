//! Session loop and persistence tuning.

/// Fixed simulation timestep (s)
pub const TICK_SECONDS: f32 = 1.0 / 60.0;
/// Simulated time between autosaves (s)
pub const AUTOSAVE_INTERVAL_SECONDS: f32 = 30.0;
/// Default number of ticks a session runs when no flag is given (one simulated minute)
pub const DEFAULT_TICK_COUNT: u64 = 3600;
/// Default save file path
pub const DEFAULT_SAVE_PATH: &str = "savegame.json";
/// Default settings file path
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
/// Decibel floor used when a volume is muted
pub const MUTE_DECIBELS: f32 = -80.0;
