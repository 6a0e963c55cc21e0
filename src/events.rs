//! Game event system for decoupled communication between systems.
//!
//! Systems emit events, the session loop consumes them.
//! This keeps logging, saves and session outcomes out of the hot paths.

use glam::Vec3;
use hecs::Entity;

/// Game events that systems can emit and subscribe to
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// An agent sighted its target and switched to the chase
    TargetSpotted {
        agent: Entity,
        target_pos: Vec3,
        encounters: u32,
    },
    /// An agent lost sight of its target and fell back to searching
    TargetLost {
        agent: Entity,
        last_known: Vec3,
    },
    /// An agent gave up a search and resumed its patrol
    SearchAbandoned {
        agent: Entity,
    },
    /// Stuck recovery dropped an agent's path and forced a replan
    PathReset {
        agent: Entity,
    },
    /// A door was commanded open
    DoorOpened {
        door: Entity,
        opener: Entity,
    },
    /// A door was commanded shut
    DoorClosed {
        door: Entity,
        closer: Entity,
    },
    /// A swinging panel came to rest
    DoorSettled {
        door: Entity,
    },
    /// One lock on the exit door was cleared
    LockCleared {
        door: Entity,
        remaining: u32,
    },
    /// A plank came off a boarded door; the planks clear as one lock
    PlankPried {
        door: Entity,
        left: u32,
    },
    /// A keypad rejected an entered code
    PinRejected {
        keypad: Entity,
    },
    /// An item was picked up
    ItemPickedUp {
        item: Entity,
        by: Entity,
    },
    /// An item was dropped
    ItemDropped {
        item: Entity,
        at: Vec3,
    },
    /// A footstep landed, audible to whoever mixes audio
    Footstep {
        entity: Entity,
        pos: Vec3,
    },
    /// An agent closed within catch distance of its target
    TargetCaught {
        agent: Entity,
    },
    /// The exit door swung open with every lock cleared
    Escaped,
}

/// Simple event queue - events are pushed during update, processed at end of tick
#[derive(Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
