//! Difficulty escalation.
//!
//! Every fresh sighting makes the agent permanently faster, more
//! perceptive and more persistent. Speeds and radius are capped;
//! search duration grows without bound.

use crate::components::DifficultyState;
use crate::constants::{
    RADIUS_CAP, RADIUS_GROWTH, RAGE_MULTIPLIER, SEARCH_DURATION_STEP, SPEED_CAP,
};

/// Apply one encounter's worth of escalation.
pub fn escalate(diff: &mut DifficultyState) {
    diff.encounters += 1;
    diff.walk_speed = (diff.walk_speed * RAGE_MULTIPLIER).min(SPEED_CAP);
    diff.run_speed = (diff.run_speed * RAGE_MULTIPLIER).min(SPEED_CAP);
    diff.detection_radius = (diff.detection_radius * RADIUS_GROWTH).min(RADIUS_CAP);
    diff.search_duration += SEARCH_DURATION_STEP;
}
