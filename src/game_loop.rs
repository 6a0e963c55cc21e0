//! Fixed-tick session loop and event processing.
//!
//! One tick advances the scripted player, door swings, navigation, and
//! every enemy agent, in that order, then folds the tick's events into
//! an outcome.

use hecs::World;
use rand::Rng;

use crate::events::{EventQueue, GameEvent};
use crate::nav::{self, NavGraph};
use crate::queries;
use crate::scene::Scene;
use crate::systems::{doors, enemy, player};

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Nothing decisive happened
    Continue,
    /// An agent reached the target
    Caught,
    /// Every lock on the exit came off
    Escaped,
}

/// Advance the whole simulation by one fixed step.
pub fn tick(
    world: &mut World,
    scene: &Scene,
    graph: &NavGraph,
    dt: f32,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> TickResult {
    puffin::profile_function!();

    // The player moves against last tick's door state
    let closed = queries::closed_door_boxes(world);
    player::run_scripts(world, &closed, dt, events);
    player::update_concealment(world, scene);
    doors::update_swings(world, dt, events);

    let locked = queries::locked_closed_doors(world);
    nav::resolve_pending_paths(world, graph, &locked);
    // Doors may have moved this tick; rebuild the blocker list
    let closed = queries::closed_door_boxes(world);
    nav::advance_agents(world, &closed, dt);

    enemy::run_agents(world, scene, &closed, dt, events, rng);

    process_events(world, events)
}

/// Drain the tick's events, log them, and fold them into an outcome.
/// A catch beats an escape when both land on the same tick.
pub fn process_events(world: &World, events: &mut EventQueue) -> TickResult {
    let mut result = TickResult::Continue;
    for event in events.drain() {
        match &event {
            GameEvent::TargetSpotted {
                agent, encounters, ..
            } => {
                log::info!(
                    "{} spotted the target (encounter {})",
                    queries::entity_name(world, *agent),
                    encounters
                );
            }
            GameEvent::TargetLost { agent, last_known } => {
                log::debug!(
                    "{} lost the target near {:?}",
                    queries::entity_name(world, *agent),
                    last_known
                );
            }
            GameEvent::SearchAbandoned { agent } => {
                log::debug!(
                    "{} gave up the search",
                    queries::entity_name(world, *agent)
                );
            }
            GameEvent::PathReset { agent } => {
                log::debug!(
                    "{} was stuck and reset its path",
                    queries::entity_name(world, *agent)
                );
            }
            GameEvent::DoorOpened { door, opener } => {
                log::debug!(
                    "{} opened {}",
                    queries::entity_name(world, *opener),
                    queries::entity_name(world, *door)
                );
            }
            GameEvent::DoorClosed { door, closer } => {
                log::debug!(
                    "{} closed {}",
                    queries::entity_name(world, *closer),
                    queries::entity_name(world, *door)
                );
            }
            GameEvent::DoorSettled { door } => {
                log::trace!("{} swung to rest", queries::entity_name(world, *door));
            }
            GameEvent::LockCleared { door, remaining } => {
                log::info!(
                    "a lock came off {} ({} left)",
                    queries::entity_name(world, *door),
                    remaining
                );
            }
            GameEvent::PlankPried { door, left } => {
                log::info!(
                    "a plank came off {} ({} still nailed on)",
                    queries::entity_name(world, *door),
                    left
                );
            }
            GameEvent::PinRejected { keypad } => {
                log::debug!(
                    "{} rejected the code",
                    queries::entity_name(world, *keypad)
                );
            }
            GameEvent::ItemPickedUp { item, by } => {
                log::info!(
                    "{} picked up {}",
                    queries::entity_name(world, *by),
                    queries::entity_name(world, *item)
                );
            }
            GameEvent::ItemDropped { item, at } => {
                log::debug!(
                    "{} was dropped at {:?}",
                    queries::entity_name(world, *item),
                    at
                );
            }
            GameEvent::Footstep { entity, pos } => {
                log::trace!(
                    "footstep from {} at {:?}",
                    queries::entity_name(world, *entity),
                    pos
                );
            }
            GameEvent::TargetCaught { agent } => {
                log::info!(
                    "{} caught the target",
                    queries::entity_name(world, *agent)
                );
                result = TickResult::Caught;
            }
            GameEvent::Escaped => {
                log::info!("the exit stands open, the target slipped out");
                if result != TickResult::Caught {
                    result = TickResult::Escaped;
                }
            }
        }
    }
    result
}
