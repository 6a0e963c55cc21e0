//! Game systems organized by domain.
//!
//! This module contains all game logic systems, split into focused submodules:
//! - `perception`: visibility tests and target resolution
//! - `enemy`: the agent state machine controller
//! - `difficulty`: escalation applied on fresh sightings
//! - `stuck`: displacement tracking and forced path resets
//! - `doors`: door scanning, the opening sequence, swing timers
//! - `interact`: pickups, locks and the exit door
//! - `player`: the scripted player actor and hideout occupancy

pub mod difficulty;
pub mod doors;
pub mod enemy;
pub mod interact;
pub mod perception;
pub mod player;
pub mod stuck;

// Re-export commonly used items
pub use perception::{can_sense, resolve_target, ResolvedTarget, SightParams};
