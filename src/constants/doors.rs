//! Door and lock tuning.

/// Time a door takes to swing fully open or shut (s)
pub const DOOR_SWING_SECONDS: f32 = 1.0;
/// Planks nailed across the final door
pub const FINAL_DOOR_PLANK_COUNT: u32 = 2;
