//! Enemy agent tuning: senses, movement, timers, escalation.

/// Base walk speed while patrolling or searching (m/s)
pub const ENEMY_WALK_SPEED: f32 = 3.5;
/// Base run speed while chasing (m/s)
pub const ENEMY_RUN_SPEED: f32 = 6.0;
/// Base detection radius for the vision cone (m)
pub const DETECTION_RADIUS: f32 = 10.0;
/// Total field of view; the visibility cone spans half this to each side (degrees)
pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;
/// Point-blank sense radius; inside it the target is sensed through walls (m)
pub const NEAR_SENSE_RADIUS: f32 = 3.0;
/// Eye height above the agent's ground position (m)
pub const EYE_HEIGHT: f32 = 1.6;
/// Height above the target's ground position that sight rays aim at (m)
pub const TARGET_HEIGHT_OFFSET: f32 = 1.0;
/// Distance at which a chase ends with the target caught (m)
pub const CATCH_DISTANCE: f32 = 1.5;

/// Dwell time at a patrol waypoint before moving on (s)
pub const PATROL_WAIT_SECONDS: f32 = 2.0;
/// Base time spent searching around the last known position (s)
pub const SEARCH_DURATION_SECONDS: f32 = 5.0;
/// Remaining path distance below which a destination counts as reached (m)
pub const ARRIVE_RADIUS: f32 = 0.5;

// Escalation per fresh sighting
/// Growth factor applied to walk and run speed per encounter
pub const RAGE_MULTIPLIER: f32 = 1.1;
/// Hard cap on walk and run speed (m/s)
pub const SPEED_CAP: f32 = 9.0;
/// Growth factor applied to the detection radius per encounter
pub const RADIUS_GROWTH: f32 = 1.1;
/// Hard cap on the detection radius (m)
pub const RADIUS_CAP: f32 = 20.0;
/// Additive search-duration increase per encounter, uncapped (s)
pub const SEARCH_DURATION_STEP: f32 = 1.0;

// Stuck recovery
/// Interval between displacement samples (s)
pub const STUCK_SAMPLE_INTERVAL: f32 = 0.5;
/// Displacement below this between samples counts as not moving (m)
pub const STUCK_DISPLACEMENT_EPSILON: f32 = 0.1;
/// Accumulated stuck time that forces a path reset (s)
pub const STUCK_RESET_AFTER: f32 = 1.0;

// Door interaction
/// Interval between door scans (s)
pub const DOOR_SCAN_INTERVAL: f32 = 0.5;
/// Radius of the door scan sphere (m)
pub const DOOR_REACH: f32 = 1.5;
/// Forward offset of the scan sphere's center from the agent (m)
pub const DOOR_SCAN_AHEAD: f32 = 0.5;
/// Pause in front of a door while it opens (s)
pub const DOOR_OPEN_WAIT: f32 = 1.0;
/// Cooldown after a door sequence before the next scan may fire (s)
pub const DOOR_COOLDOWN: f32 = 2.0;

/// Maximum distance from a nav node at which a spawn counts as on the mesh (m)
pub const NAV_SAMPLE_RADIUS: f32 = 5.0;
