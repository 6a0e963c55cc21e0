//! Door systems: the agent's opening sequence, the rate-limited scan,
//! swing timers and the toggle command players use.
//!
//! The opening sequence owns the agent's movement-enable flag while it
//! runs; the controller neither scans nor dispatches a behavior until
//! the sequence hands control back.

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Door, DoorSequence, EnemyAi, EnemyState, NavAgent};
use crate::constants::{DOOR_COOLDOWN, DOOR_OPEN_WAIT, DOOR_REACH, DOOR_SCAN_AHEAD, DOOR_SCAN_INTERVAL};
use crate::events::{EventQueue, GameEvent};
use crate::queries;

/// Advance an active opening sequence. Returns true while the agent is
/// parked in front of its door, including the completion tick.
pub fn advance_sequence(ai: &mut EnemyAi, nav: &mut NavAgent, dt: f32) -> bool {
    let Some(seq) = ai.doors.active else {
        return false;
    };

    let wait = seq.wait - dt;
    if wait > 0.0 {
        ai.doors.active = Some(DoorSequence { wait, ..seq });
        return true;
    }

    // Done: hand control back to the suspended state and start the cooldown
    if let EnemyState::OpeningDoor { resume } = ai.state {
        ai.state = resume.into();
    }
    ai.doors.active = None;
    ai.doors.scan_timer = DOOR_COOLDOWN;
    nav.stopped = false;
    true
}

/// Rate-limited scan for a door worth opening; starts the sequence on a hit.
///
/// The scan sphere sits just ahead of the agent. Only the nearest shut,
/// unlocked, non-locker door is engaged, and only when no sequence is
/// already running.
pub fn try_scan(
    world: &World,
    entity: Entity,
    ai: &mut EnemyAi,
    nav: &mut NavAgent,
    pos: Vec3,
    forward: Vec3,
    dt: f32,
    events: &mut EventQueue,
) {
    if ai.doors.busy() || ai.state.is_interacting() {
        return;
    }

    ai.doors.scan_timer -= dt;
    if ai.doors.scan_timer > 0.0 {
        return;
    }
    ai.doors.scan_timer = DOOR_SCAN_INTERVAL;

    let center = pos + forward * DOOR_SCAN_AHEAD;
    let Some(door_entity) = queries::nearest_openable_door(world, center, DOOR_REACH) else {
        return;
    };

    let Ok(mut door) = world.get::<&mut Door>(door_entity) else {
        return;
    };
    if !door.open() {
        return;
    }
    drop(door);

    ai.state = EnemyState::OpeningDoor {
        resume: ai.state.base(),
    };
    ai.doors.active = Some(DoorSequence {
        door: door_entity,
        wait: DOOR_OPEN_WAIT,
    });
    nav.stopped = true;
    events.push(GameEvent::DoorOpened {
        door: door_entity,
        opener: entity,
    });
    log::debug!("agent {:?} opening door {:?}", entity, door_entity);
}

/// Run down every door's swing timer, reporting panels that come to rest.
pub fn update_swings(world: &mut World, dt: f32, events: &mut EventQueue) {
    for (entity, door) in world.query_mut::<&mut Door>() {
        if door.swing <= 0.0 {
            continue;
        }
        door.swing = (door.swing - dt).max(0.0);
        if door.swing == 0.0 {
            events.push(GameEvent::DoorSettled { door: entity });
        }
    }
}

/// Toggle a door open or shut on someone's behalf. Locked doors refuse.
pub fn toggle(world: &World, door_entity: Entity, who: Entity, events: &mut EventQueue) -> bool {
    let Ok(mut door) = world.get::<&mut Door>(door_entity) else {
        return false;
    };
    if door.is_open {
        door.close();
        events.push(GameEvent::DoorClosed {
            door: door_entity,
            closer: who,
        });
        true
    } else if door.open() {
        events.push(GameEvent::DoorOpened {
            door: door_entity,
            opener: who,
        });
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BaseState, DoorBody, Locker, Name, Position};
    use crate::constants::TICK_SECONDS;

    /// Agent pieces plus a shut door half a meter ahead of it.
    fn fixture(locked: bool) -> (World, Entity, Entity, EnemyAi, NavAgent) {
        let mut world = World::new();
        let door = world.spawn((
            Name::new("hall door"),
            Position::new(Vec3::new(1.0, 1.2, 0.0)),
            Door::new(locked),
            DoorBody::new(Vec3::new(0.1, 1.2, 1.0)),
        ));
        let agent = world.spawn(());
        let ai = EnemyAi::new(Vec3::ZERO);
        let nav = NavAgent::new(3.5);
        (world, agent, door, ai, nav)
    }

    fn run_scan(
        world: &World,
        agent: Entity,
        ai: &mut EnemyAi,
        nav: &mut NavAgent,
        events: &mut EventQueue,
        seconds: f32,
    ) {
        let ticks = (seconds / TICK_SECONDS) as usize;
        for _ in 0..ticks {
            try_scan(
                world,
                agent,
                ai,
                nav,
                Vec3::ZERO,
                Vec3::X,
                TICK_SECONDS,
                events,
            );
        }
    }

    #[test]
    fn the_scan_opens_a_shut_unlocked_door_and_parks_the_agent() {
        let (world, agent, door, mut ai, mut nav) = fixture(false);
        let mut events = EventQueue::new();

        run_scan(&world, agent, &mut ai, &mut nav, &mut events, 0.6);

        assert!(world.get::<&Door>(door).unwrap().is_open);
        assert!(nav.stopped);
        assert!(ai.doors.busy());
        assert_eq!(
            ai.state,
            EnemyState::OpeningDoor {
                resume: BaseState::Patrolling
            }
        );
        assert!(events
            .drain()
            .any(|e| matches!(e, GameEvent::DoorOpened { .. })));
    }

    #[test]
    fn locked_doors_and_lockers_are_ignored() {
        let (world, agent, door, mut ai, mut nav) = fixture(true);
        let mut events = EventQueue::new();
        run_scan(&world, agent, &mut ai, &mut nav, &mut events, 1.0);
        assert!(!world.get::<&Door>(door).unwrap().is_open);
        assert!(!ai.doors.busy());

        // A locker in reach is just scenery
        let (mut world, agent, _, mut ai, mut nav) = fixture(false);
        {
            let door = queries::find_by_name(&world, "hall door").unwrap();
            world.insert_one(door, Locker).unwrap();
        }
        run_scan(&world, agent, &mut ai, &mut nav, &mut events, 1.0);
        assert!(!ai.doors.busy());
    }

    #[test]
    fn the_sequence_restores_the_suspended_state_and_resumes_movement() {
        let (world, agent, _, mut ai, mut nav) = fixture(false);
        ai.state = EnemyState::Searching;
        let mut events = EventQueue::new();

        run_scan(&world, agent, &mut ai, &mut nav, &mut events, 0.6);
        assert_eq!(
            ai.state,
            EnemyState::OpeningDoor {
                resume: BaseState::Searching
            }
        );

        // Wait out the opening pause
        let ticks = (DOOR_OPEN_WAIT / TICK_SECONDS) as usize + 2;
        let mut busy_ticks = 0;
        for _ in 0..ticks {
            if advance_sequence(&mut ai, &mut nav, TICK_SECONDS) {
                busy_ticks += 1;
            }
        }

        assert_eq!(ai.state, EnemyState::Searching);
        assert!(!nav.stopped);
        assert!(!ai.doors.busy());
        assert!(busy_ticks >= (DOOR_OPEN_WAIT / TICK_SECONDS) as usize);
    }

    #[test]
    fn the_cooldown_suppresses_an_immediate_rescan() {
        let (mut world, agent, door, mut ai, mut nav) = fixture(false);
        let mut events = EventQueue::new();

        run_scan(&world, agent, &mut ai, &mut nav, &mut events, 0.6);
        while advance_sequence(&mut ai, &mut nav, TICK_SECONDS) {}

        // Shut the same door again right away
        world.get::<&mut Door>(door).unwrap().close();

        // Inside the cooldown window nothing happens
        run_scan(&world, agent, &mut ai, &mut nav, &mut events, DOOR_COOLDOWN * 0.5);
        assert!(!world.get::<&Door>(door).unwrap().is_open);

        // Once it elapses the scan fires again
        run_scan(&world, agent, &mut ai, &mut nav, &mut events, DOOR_COOLDOWN);
        assert!(world.get::<&Door>(door).unwrap().is_open);
    }

    #[test]
    fn the_swing_runs_down_and_reports_the_panel_settled() {
        let (mut world, _, door, ..) = fixture(false);
        let mut events = EventQueue::new();

        world.get::<&mut Door>(door).unwrap().open();
        assert_eq!(world.get::<&Door>(door).unwrap().swing_progress(), 0.0);

        // half the swing: panel mid-arc, nothing settled yet
        for _ in 0..30 {
            update_swings(&mut world, TICK_SECONDS, &mut events);
        }
        let halfway = world.get::<&Door>(door).unwrap().swing_progress();
        assert!((halfway - 0.5).abs() < 0.02);
        assert!(!events
            .drain()
            .any(|e| matches!(e, GameEvent::DoorSettled { .. })));

        // the rest of the swing settles the panel exactly once
        for _ in 0..40 {
            update_swings(&mut world, TICK_SECONDS, &mut events);
        }
        assert_eq!(world.get::<&Door>(door).unwrap().swing_progress(), 1.0);
        let settled = events
            .drain()
            .filter(|e| matches!(e, GameEvent::DoorSettled { .. }))
            .count();
        assert_eq!(settled, 1);
    }

    #[test]
    fn toggling_respects_locks() {
        let (world, agent, door, ..) = fixture(true);
        let mut events = EventQueue::new();
        assert!(!toggle(&world, door, agent, &mut events));

        let (world, agent, door, ..) = fixture(false);
        assert!(toggle(&world, door, agent, &mut events));
        assert!(world.get::<&Door>(door).unwrap().is_open);
        assert!(toggle(&world, door, agent, &mut events));
        assert!(!world.get::<&Door>(door).unwrap().is_open);
    }
}
