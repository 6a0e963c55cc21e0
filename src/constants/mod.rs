//! Game constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod doors;
mod enemy;
mod player;
mod session;

// Re-export all constants at the module level
pub use doors::*;
pub use enemy::*;
pub use player::*;
pub use session::*;
