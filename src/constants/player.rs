//! Player movement and interaction tuning.

/// Walking speed (m/s)
pub const PLAYER_WALK_SPEED: f32 = 4.0;
/// Speed multiplier while sprinting
pub const SPRINT_MULTIPLIER: f32 = 1.75;
/// Speed multiplier while crouching; slow enough that steps go quiet
pub const CROUCH_MULTIPLIER: f32 = 0.4;
/// Time between footstep events while moving fast enough (s)
pub const FOOTSTEP_INTERVAL: f32 = 0.5;
/// Minimum speed that produces footsteps (m/s)
pub const FOOTSTEP_MIN_SPEED: f32 = 2.0;
/// Maximum distance for picking up an item (m)
pub const PICKUP_RANGE: f32 = 3.0;
/// Maximum distance for door and lock interactions (m)
pub const INTERACT_RANGE: f32 = 3.0;
/// Distance below which a scripted route step counts as reached (m)
pub const SCRIPT_ARRIVE_RADIUS: f32 = 0.3;
