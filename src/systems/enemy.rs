//! Enemy agent controller. Each tick runs one agent through a fixed
//! sequence: animation intent, stuck recovery, the door routine,
//! perception, then the behavior for its current state.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    AnimationIntent, BaseState, DifficultyState, EnemyAi, EnemyState, Facing, NavAgent,
    PatrolMode, PatrolRoute, Position, Senses,
};
use crate::constants::{ARRIVE_RADIUS, CATCH_DISTANCE, PATROL_WAIT_SECONDS};
use crate::events::{EventQueue, GameEvent};
use crate::scene::{Aabb, Scene};
use crate::systems::perception::{self, ResolvedTarget, SightParams};
use crate::systems::{difficulty, doors, stuck};

/// Run every enemy agent for one tick.
pub fn run_agents(
    world: &mut World,
    scene: &Scene,
    closed_doors: &[Aabb],
    dt: f32,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) {
    puffin::profile_function!();

    let target = perception::resolve_target(world);
    let agents = world
        .query::<&EnemyAi>()
        .iter()
        .map(|(entity, _)| entity)
        .collect::<Vec<_>>();

    for entity in agents {
        update_agent(world, entity, scene, closed_doors, target, dt, events, rng);
    }
}

fn update_agent(
    world: &World,
    entity: Entity,
    scene: &Scene,
    closed_doors: &[Aabb],
    target: Option<ResolvedTarget>,
    dt: f32,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) {
    let Ok(mut ai) = world.get::<&mut EnemyAi>(entity) else {
        return;
    };
    if ai.disabled {
        return;
    }
    let Ok(mut nav) = world.get::<&mut NavAgent>(entity) else {
        return;
    };
    let Ok(mut diff) = world.get::<&mut DifficultyState>(entity) else {
        return;
    };
    let Ok(route) = world.get::<&PatrolRoute>(entity) else {
        return;
    };
    let (pos, forward, senses) = {
        let Ok(position) = world.get::<&Position>(entity) else {
            return;
        };
        let Ok(facing) = world.get::<&Facing>(entity) else {
            return;
        };
        let Ok(senses) = world.get::<&Senses>(entity) else {
            return;
        };
        (position.pos, facing.forward, *senses)
    };

    // Animation intent reflects the velocity the nav pass just produced
    if let Ok(mut intent) = world.get::<&mut AnimationIntent>(entity) {
        let moving = nav.velocity.length_squared() > 0.0;
        intent.walking = moving;
        intent.running = moving && ai.state.base() == BaseState::Chasing;
    }

    stuck::update(entity, &mut ai, &route, &mut nav, pos, dt, events);

    // Door routine: wait out an active sequence, otherwise scan ahead
    if !doors::advance_sequence(&mut ai, &mut nav, dt) {
        doors::try_scan(world, entity, &mut ai, &mut nav, pos, forward, dt, events);
    }

    // Perception runs every tick, even while parked at a door, so the
    // last known position stays fresh. Only the transition is held back.
    let mut seen = false;
    let mut target_pos = Vec3::ZERO;
    if let Some(target) = target {
        let params = SightParams {
            near_radius: senses.near_radius,
            detection_radius: diff.detection_radius * target.radius_scale,
            fov_degrees: senses.fov_degrees,
            eye_height: senses.eye_height,
        };
        seen = perception::can_sense(
            pos,
            forward,
            target.pos,
            target.height_offset,
            &params,
            scene,
            closed_doors,
        );
        if seen {
            target_pos = target.pos;
            ai.last_known = Some(target.pos);
            if !ai.state.is_interacting() && ai.state.base() != BaseState::Chasing {
                difficulty::escalate(&mut diff);
                ai.state = EnemyState::Chasing;
                events.push(GameEvent::TargetSpotted {
                    agent: entity,
                    target_pos,
                    encounters: diff.encounters,
                });
                log::debug!(
                    "agent {:?} spotted the target, encounter {}",
                    entity,
                    diff.encounters
                );
            }
        }
    }

    let state = ai.state;
    match state {
        EnemyState::Patrolling => {
            nav.speed = diff.walk_speed;
            patrol(&mut ai, &mut nav, &route, pos, dt, rng);
        }
        EnemyState::Chasing => {
            nav.speed = diff.run_speed;
            chase(entity, &mut ai, &mut nav, seen, target_pos, pos, events);
        }
        EnemyState::Searching => {
            nav.speed = diff.walk_speed;
            search(entity, &mut ai, &mut nav, &diff, &route, pos, dt, events);
        }
        // Parked in front of a door; advance_sequence restores the state
        EnemyState::OpeningDoor { .. } => {}
    }
}

/// Walk the route, dwell at each waypoint, then move to the next one.
fn patrol(
    ai: &mut EnemyAi,
    nav: &mut NavAgent,
    route: &PatrolRoute,
    pos: Vec3,
    dt: f32,
    rng: &mut impl Rng,
) {
    if route.points.is_empty() {
        return;
    }
    if nav.destination.is_none() {
        nav.set_destination(route.points[ai.patrol_index % route.points.len()]);
    }
    if nav.remaining_distance(pos) >= ARRIVE_RADIUS {
        ai.dwell_timer = 0.0;
        return;
    }
    ai.dwell_timer += dt;
    if ai.dwell_timer <= PATROL_WAIT_SECONDS {
        return;
    }
    ai.dwell_timer = 0.0;
    ai.patrol_index = next_waypoint(route, ai.patrol_index, rng);
    nav.set_destination(route.points[ai.patrol_index]);
}

/// Pick the next waypoint index for a route.
fn next_waypoint(route: &PatrolRoute, current: usize, rng: &mut impl Rng) -> usize {
    let len = route.points.len();
    if len <= 1 {
        return 0;
    }
    let current = current % len;
    match route.mode {
        PatrolMode::Sequential => (current + 1) % len,
        PatrolMode::Random => {
            // draw from the other points so the agent always moves on
            let pick = rng.gen_range(0..len - 1);
            if pick >= current {
                pick + 1
            } else {
                pick
            }
        }
    }
}

/// Run the target down while it stays in view; otherwise fall back to a
/// search around the spot it was last seen at.
fn chase(
    entity: Entity,
    ai: &mut EnemyAi,
    nav: &mut NavAgent,
    seen: bool,
    target_pos: Vec3,
    pos: Vec3,
    events: &mut EventQueue,
) {
    if seen {
        nav.set_destination(target_pos);
        if pos.distance(target_pos) < CATCH_DISTANCE {
            events.push(GameEvent::TargetCaught { agent: entity });
        }
        return;
    }
    let Some(point) = ai.last_known else {
        // nothing to go on, give up straight away
        ai.state = EnemyState::Patrolling;
        return;
    };
    ai.state = EnemyState::Searching;
    ai.search_timer = 0.0;
    nav.set_destination(point);
    events.push(GameEvent::TargetLost {
        agent: entity,
        last_known: point,
    });
    log::debug!("agent {:?} lost the target at {:?}", entity, point);
}

/// Sweep to the last known position and linger there until the search
/// duration runs out, then go back on patrol. The clock only runs at
/// the spot; travel time does not count against the linger.
fn search(
    entity: Entity,
    ai: &mut EnemyAi,
    nav: &mut NavAgent,
    diff: &DifficultyState,
    route: &PatrolRoute,
    pos: Vec3,
    dt: f32,
    events: &mut EventQueue,
) {
    if nav.remaining_distance(pos) >= ARRIVE_RADIUS {
        return;
    }
    ai.search_timer += dt;
    if ai.search_timer <= diff.search_duration {
        return;
    }
    ai.state = EnemyState::Patrolling;
    ai.last_known = None;
    ai.dwell_timer = 0.0;
    if !route.points.is_empty() {
        ai.patrol_index %= route.points.len();
        nav.set_destination(route.points[ai.patrol_index]);
    }
    events.push(GameEvent::SearchAbandoned { agent: entity });
    log::debug!("agent {:?} gave up searching", entity);
}
