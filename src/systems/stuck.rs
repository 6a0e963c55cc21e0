//! Stuck detection and path recovery.
//!
//! Samples agent displacement on a fixed cadence while movement is
//! expected. An agent pinned in place too long gets its path dropped
//! and replanned; a pinned patroller also skips to the next waypoint
//! so a bad corner cannot trap it forever.

use glam::Vec3;
use hecs::Entity;

use crate::components::{BaseState, EnemyAi, EnemyState, NavAgent, PatrolRoute};
use crate::constants::{STUCK_DISPLACEMENT_EPSILON, STUCK_RESET_AFTER, STUCK_SAMPLE_INTERVAL};
use crate::events::{EventQueue, GameEvent};

/// Advance the agent's displacement sampler and fire a recovery when
/// its stuck time crosses the threshold.
pub fn update(
    entity: Entity,
    ai: &mut EnemyAi,
    route: &PatrolRoute,
    nav: &mut NavAgent,
    pos: Vec3,
    dt: f32,
    events: &mut EventQueue,
) {
    // A parked agent is not expected to move; re-arm and wait
    let expects_movement = !nav.stopped
        && (nav.velocity.length_squared() > 0.0 || ai.state.base() == BaseState::Chasing);
    if !expects_movement {
        ai.stuck.sample_timer = STUCK_SAMPLE_INTERVAL;
        ai.stuck.last_pos = pos;
        ai.stuck.stuck_for = 0.0;
        return;
    }

    ai.stuck.sample_timer -= dt;
    if ai.stuck.sample_timer > 0.0 {
        return;
    }
    ai.stuck.sample_timer = STUCK_SAMPLE_INTERVAL;

    let displacement = pos.distance(ai.stuck.last_pos);
    ai.stuck.last_pos = pos;

    if displacement >= STUCK_DISPLACEMENT_EPSILON {
        ai.stuck.stuck_for = 0.0;
        return;
    }

    ai.stuck.stuck_for += STUCK_SAMPLE_INTERVAL;
    if ai.stuck.stuck_for <= STUCK_RESET_AFTER {
        return;
    }

    // Recovery: drop the path and replan; patrollers move on entirely
    nav.reset_path();
    if ai.state == EnemyState::Patrolling && !route.points.is_empty() {
        ai.patrol_index = (ai.patrol_index + 1) % route.points.len();
        nav.set_destination(route.points[ai.patrol_index]);
        ai.dwell_timer = 0.0;
    }
    ai.stuck.stuck_for = 0.0;
    events.push(GameEvent::PathReset { agent: entity });
    log::debug!("agent {:?} stuck, path reset", entity);
}
