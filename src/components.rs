use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::*;

/// Position component - world coordinates in meters
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub pos: Vec3,
}

impl Position {
    pub fn new(pos: Vec3) -> Self {
        Self { pos }
    }
}

/// Facing component - unit forward vector
#[derive(Debug, Clone, Copy)]
pub struct Facing {
    pub forward: Vec3,
}

impl Facing {
    pub fn new(forward: Vec3) -> Self {
        Self {
            forward: forward.normalize_or_zero(),
        }
    }

    /// Turn toward a movement direction, ignoring zero-length input.
    pub fn look_along(&mut self, dir: Vec3) {
        let dir = dir.normalize_or_zero();
        if dir != Vec3::ZERO {
            self.forward = dir;
        }
    }
}

/// Name component - human-readable handle for logs, scripts and saves
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Movement gait for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Walk,
    Sprint,
    Crouch,
}

impl Gait {
    /// Ground speed in m/s
    pub fn speed(&self) -> f32 {
        match self {
            Gait::Walk => PLAYER_WALK_SPEED,
            Gait::Sprint => PLAYER_WALK_SPEED * SPRINT_MULTIPLIER,
            Gait::Crouch => PLAYER_WALK_SPEED * CROUCH_MULTIPLIER,
        }
    }
}

/// Player marker and movement state
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub gait: Gait,
    pub footstep_timer: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            gait: Gait::Walk,
            footstep_timer: 0.0,
        }
    }
}

/// Marks the entity enemy agents track, with the height sight rays aim at
#[derive(Debug, Clone, Copy)]
pub struct SightTarget {
    pub height_offset: f32,
}

impl SightTarget {
    pub fn new(height_offset: f32) -> Self {
        Self { height_offset }
    }
}

/// Hideout occupancy, updated every tick from the scene's volumes
#[derive(Debug, Clone, Copy)]
pub struct Concealment {
    pub complete: bool,
    pub partial: bool,
}

impl Concealment {
    pub fn none() -> Self {
        Self {
            complete: false,
            partial: false,
        }
    }
}

/// One step of the scripted player route
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Walk in a straight line to a point
    GoTo { dest: Vec3, gait: Gait },
    /// Stand still for a duration
    Wait { remaining: f32 },
    /// Pick up a named item if it is in range
    Pickup { name: String },
    /// Drop a carried item at the current position
    Drop { name: String },
    /// Toggle a named door open or shut
    ToggleDoor { name: String },
    /// Punch a code into a named keypad
    EnterPin { name: String, code: String },
    /// Try a named lockpad with whatever is carried
    TryLockpad { name: String },
    /// Try a named door's keyhole with a carried key
    UseKey { door: String },
    /// Pry one plank off a named door (needs the crowbar)
    PryPlank { door: String },
}

/// Scripted route driving the player in headless runs
#[derive(Debug, Clone, Default)]
pub struct PlayerScript {
    pub steps: VecDeque<ScriptStep>,
}

impl PlayerScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: steps.into(),
        }
    }
}

/// Behavior mode the enemy resumes after a door interruption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseState {
    Patrolling,
    Chasing,
    Searching,
}

/// Enemy behavior mode; the door variant suspends and later restores a base state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Patrolling,
    Chasing,
    Searching,
    OpeningDoor { resume: BaseState },
}

impl EnemyState {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyState::Patrolling => "patrolling",
            EnemyState::Chasing => "chasing",
            EnemyState::Searching => "searching",
            EnemyState::OpeningDoor { .. } => "opening door",
        }
    }

    pub fn is_interacting(&self) -> bool {
        matches!(self, EnemyState::OpeningDoor { .. })
    }

    /// The underlying base state, looking through a door interruption.
    pub fn base(&self) -> BaseState {
        match self {
            EnemyState::Patrolling => BaseState::Patrolling,
            EnemyState::Chasing => BaseState::Chasing,
            EnemyState::Searching => BaseState::Searching,
            EnemyState::OpeningDoor { resume } => *resume,
        }
    }
}

impl From<BaseState> for EnemyState {
    fn from(base: BaseState) -> Self {
        match base {
            BaseState::Patrolling => EnemyState::Patrolling,
            BaseState::Chasing => EnemyState::Chasing,
            BaseState::Searching => EnemyState::Searching,
        }
    }
}

/// Active door-opening sequence: pause in front of the door until the wait elapses
#[derive(Debug, Clone, Copy)]
pub struct DoorSequence {
    pub door: Entity,
    pub wait: f32,
}

/// Rate-limited door scanning plus the currently running sequence
#[derive(Debug, Clone, Copy)]
pub struct DoorRoutine {
    /// Counts down to the next allowed scan
    pub scan_timer: f32,
    pub active: Option<DoorSequence>,
}

impl DoorRoutine {
    pub fn new() -> Self {
        Self {
            scan_timer: DOOR_SCAN_INTERVAL,
            active: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.active.is_some()
    }
}

/// Displacement sampling for stuck detection
#[derive(Debug, Clone, Copy)]
pub struct StuckTracker {
    /// Counts down to the next displacement sample
    pub sample_timer: f32,
    pub last_pos: Vec3,
    /// Accumulated time spent below the displacement threshold
    pub stuck_for: f32,
}

impl StuckTracker {
    pub fn new(pos: Vec3) -> Self {
        Self {
            sample_timer: STUCK_SAMPLE_INTERVAL,
            last_pos: pos,
            stuck_for: 0.0,
        }
    }
}

/// Enemy agent component - state machine, timers and sub-routines
#[derive(Debug, Clone)]
pub struct EnemyAi {
    pub state: EnemyState,
    /// Last position the target was sensed at; search destination
    pub last_known: Option<Vec3>,
    pub patrol_index: usize,
    /// Time spent waiting at the current patrol waypoint
    pub dwell_timer: f32,
    /// Time spent in the current search
    pub search_timer: f32,
    pub doors: DoorRoutine,
    pub stuck: StuckTracker,
    /// Set at spawn when the agent is off the nav mesh; skips all AI
    pub disabled: bool,
}

impl EnemyAi {
    pub fn new(pos: Vec3) -> Self {
        Self {
            state: EnemyState::Patrolling,
            last_known: None,
            patrol_index: 0,
            dwell_timer: 0.0,
            search_timer: 0.0,
            doors: DoorRoutine::new(),
            stuck: StuckTracker::new(pos),
            disabled: false,
        }
    }
}

/// Per-agent difficulty values, escalated on every fresh sighting
#[derive(Debug, Clone, Copy)]
pub struct DifficultyState {
    pub encounters: u32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub detection_radius: f32,
    pub search_duration: f32,
}

impl DifficultyState {
    pub fn new() -> Self {
        Self {
            encounters: 0,
            walk_speed: ENEMY_WALK_SPEED,
            run_speed: ENEMY_RUN_SPEED,
            detection_radius: DETECTION_RADIUS,
            search_duration: SEARCH_DURATION_SECONDS,
        }
    }
}

/// Static sense geometry; the detection radius lives in DifficultyState
#[derive(Debug, Clone, Copy)]
pub struct Senses {
    pub near_radius: f32,
    pub fov_degrees: f32,
    pub eye_height: f32,
}

impl Senses {
    pub fn new() -> Self {
        Self {
            near_radius: NEAR_SENSE_RADIUS,
            fov_degrees: FIELD_OF_VIEW_DEGREES,
            eye_height: EYE_HEIGHT,
        }
    }
}

/// Waypoint selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolMode {
    /// Uniform pick, never repeating the current point when there is a choice
    Random,
    /// Cycle the route in order
    Sequential,
}

/// Patrol waypoints for an enemy agent
#[derive(Debug, Clone)]
pub struct PatrolRoute {
    pub points: Vec<Vec3>,
    pub mode: PatrolMode,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>, mode: PatrolMode) -> Self {
        Self { points, mode }
    }
}

/// Navigation agent state: destination, planned path, traversal cursor
#[derive(Debug, Clone)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Straight-line corridor of points to walk through, filled by the planner
    pub path: Vec<Vec3>,
    /// Index of the next path point to head for
    pub next_index: usize,
    /// True from destination submission until the planner has run
    pub pending: bool,
    /// Movement-enable flag; the door sequence parks the agent with this
    pub stopped: bool,
    pub speed: f32,
    pub velocity: Vec3,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            path: Vec::new(),
            next_index: 0,
            pending: false,
            stopped: false,
            speed,
            velocity: Vec3::ZERO,
        }
    }

    /// Submit a new destination; the path is planned on the next nav pass.
    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.path.clear();
        self.next_index = 0;
        self.pending = true;
    }

    /// Drop the computed path and replan toward the current destination.
    pub fn reset_path(&mut self) {
        if let Some(dest) = self.destination {
            self.set_destination(dest);
        }
    }

    /// Straight-line distance left along the planned path.
    pub fn remaining_distance(&self, from: Vec3) -> f32 {
        if self.pending {
            return f32::INFINITY;
        }
        let Some(dest) = self.destination else {
            return 0.0;
        };
        if self.next_index >= self.path.len() {
            return from.distance(dest);
        }
        let mut total = from.distance(self.path[self.next_index]);
        for pair in self.path[self.next_index..].windows(2) {
            total += pair[0].distance(pair[1]);
        }
        total
    }
}

/// Animation intent flags consumed by the blending layer
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationIntent {
    pub walking: bool,
    pub running: bool,
}

/// Door component - open/locked flags plus swing progress
#[derive(Debug, Clone, Copy)]
pub struct Door {
    pub is_open: bool,
    pub is_locked: bool,
    /// Remaining swing time after the last open/close command
    pub swing: f32,
}

impl Door {
    pub fn new(locked: bool) -> Self {
        Self {
            is_open: false,
            is_locked: locked,
            swing: 0.0,
        }
    }

    /// Closed, unlocked doors are the only ones the enemy will open.
    pub fn can_open(&self) -> bool {
        !self.is_open && !self.is_locked
    }

    /// Flip to open and start the swing. Locked doors refuse.
    pub fn open(&mut self) -> bool {
        if self.is_locked || self.is_open {
            return false;
        }
        self.is_open = true;
        self.swing = DOOR_SWING_SECONDS;
        true
    }

    /// Flip to shut and start the swing.
    pub fn close(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.is_open = false;
        self.swing = DOOR_SWING_SECONDS;
        true
    }

    /// How far the last swing has come, 0 at the command, 1 at rest.
    pub fn swing_progress(&self) -> f32 {
        1.0 - (self.swing / DOOR_SWING_SECONDS).clamp(0.0, 1.0)
    }
}

/// Door panel extents, used for occlusion and traversal blocking while shut
#[derive(Debug, Clone, Copy)]
pub struct DoorBody {
    pub half_extents: Vec3,
}

impl DoorBody {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

/// Locker marker - scenery the door scan ignores
#[derive(Debug, Clone, Copy)]
pub struct Locker;

/// Item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    BrassKey,
    Crowbar,
    Flashlight,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::BrassKey => "brass key",
            ItemKind::Crowbar => "crowbar",
            ItemKind::Flashlight => "flashlight",
        }
    }
}

/// Item component - pickable object, either placed or carried
#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub kind: ItemKind,
    pub holder: Option<Entity>,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self { kind, holder: None }
    }
}

/// Keypad lock - clears one final-door lock on the exact PIN
#[derive(Debug, Clone)]
pub struct Keypad {
    pub pin: String,
    pub cleared: bool,
    pub door: Entity,
}

impl Keypad {
    pub fn new(pin: &str, door: Entity) -> Self {
        Self {
            pin: pin.to_string(),
            cleared: false,
            door,
        }
    }
}

/// Lockpad - clears one final-door lock while its key is carried
#[derive(Debug, Clone, Copy)]
pub struct Lockpad {
    pub opens_with: ItemKind,
    pub cleared: bool,
    pub door: Entity,
}

impl Lockpad {
    pub fn new(opens_with: ItemKind, door: Entity) -> Self {
        Self {
            opens_with,
            cleared: false,
            door,
        }
    }
}

/// One plank nailed across a door; pried off with the crowbar
#[derive(Debug, Clone, Copy)]
pub struct Plank {
    pub door: Entity,
}

/// Exit door component - tracks its own keyhole; other locks reference it
#[derive(Debug, Clone, Copy)]
pub struct FinalDoor {
    pub opens_with: ItemKind,
    pub keyhole_cleared: bool,
}

impl FinalDoor {
    pub fn new(opens_with: ItemKind) -> Self {
        Self {
            opens_with,
            keyhole_cleared: false,
        }
    }
}
