//! Scripted player control for headless runs: walks the route, fires
//! interactions, and keeps concealment and footstep state current.

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Concealment, Facing, Gait, Player, PlayerScript, Position, ScriptStep};
use crate::constants::{FOOTSTEP_INTERVAL, FOOTSTEP_MIN_SPEED, SCRIPT_ARRIVE_RADIUS};
use crate::events::{EventQueue, GameEvent};
use crate::nav;
use crate::scene::{Aabb, HideoutKind, Scene};
use crate::systems::interact;

/// Advance every scripted player by one tick.
pub fn run_scripts(world: &mut World, closed_doors: &[Aabb], dt: f32, events: &mut EventQueue) {
    puffin::profile_function!();

    let players = world
        .query::<(&Player, &PlayerScript)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect::<Vec<_>>();

    for entity in players {
        step_script(world, entity, closed_doors, dt, events);
    }
}

fn step_script(
    world: &mut World,
    entity: Entity,
    closed_doors: &[Aabb],
    dt: f32,
    events: &mut EventQueue,
) {
    let front = match world.get::<&PlayerScript>(entity) {
        Ok(script) => script.steps.front().cloned(),
        Err(_) => return,
    };

    let mut speed = 0.0;
    // interaction steps are one-shot; movement and waits span ticks
    let mut done = true;
    match &front {
        None => {}
        Some(ScriptStep::GoTo { dest, gait }) => {
            done = walk_toward(world, entity, *dest, *gait, closed_doors, dt, &mut speed);
        }
        Some(ScriptStep::Wait { .. }) => {
            done = tick_wait(world, entity, dt);
        }
        Some(ScriptStep::Pickup { name }) => {
            if !interact::pickup(world, entity, name, events) {
                log::warn!("script could not pick up '{}'", name);
            }
        }
        Some(ScriptStep::Drop { name }) => {
            if !interact::drop_item(world, entity, name, events) {
                log::warn!("script could not drop '{}'", name);
            }
        }
        Some(ScriptStep::ToggleDoor { name }) => {
            if !interact::toggle_door(world, entity, name, events) {
                log::warn!("script could not toggle '{}'", name);
            }
        }
        Some(ScriptStep::EnterPin { name, code }) => {
            if !interact::enter_pin(world, entity, name, code, events) {
                log::warn!("script pin was rejected at '{}'", name);
            }
        }
        Some(ScriptStep::TryLockpad { name }) => {
            if !interact::try_lockpad(world, entity, name, events) {
                log::warn!("script could not clear lockpad '{}'", name);
            }
        }
        Some(ScriptStep::UseKey { door }) => {
            if !interact::use_keyhole(world, entity, door, events) {
                log::warn!("script could not unlock '{}'", door);
            }
        }
        Some(ScriptStep::PryPlank { door }) => {
            if !interact::pry_plank(world, entity, door, events) {
                log::warn!("script could not pry a plank off '{}'", door);
            }
        }
    }

    if done && front.is_some() {
        if let Ok(mut script) = world.get::<&mut PlayerScript>(entity) {
            script.steps.pop_front();
        }
    }

    update_footsteps(world, entity, speed, dt, events);
}

/// Straight-line walk toward `dest`. Returns true on arrival. Closed doors
/// stop the walk in place until a script step opens them.
fn walk_toward(
    world: &World,
    entity: Entity,
    dest: Vec3,
    gait: Gait,
    closed_doors: &[Aabb],
    dt: f32,
    speed_out: &mut f32,
) -> bool {
    if let Ok(mut player) = world.get::<&mut Player>(entity) {
        player.gait = gait;
    }
    let Ok(mut position) = world.get::<&mut Position>(entity) else {
        return true;
    };
    let to_dest = dest - position.pos;
    let dist = to_dest.length();
    if dist <= SCRIPT_ARRIVE_RADIUS {
        return true;
    }
    let step = (gait.speed() * dt).min(dist);
    let next = position.pos + to_dest / dist * step;
    if nav::segment_hits_door(position.pos, next, closed_doors) {
        return false;
    }
    position.pos = next;
    drop(position);
    if let Ok(mut facing) = world.get::<&mut Facing>(entity) {
        facing.look_along(to_dest / dist);
    }
    *speed_out = gait.speed();
    false
}

fn tick_wait(world: &World, entity: Entity, dt: f32) -> bool {
    let Ok(mut script) = world.get::<&mut PlayerScript>(entity) else {
        return true;
    };
    match script.steps.front_mut() {
        Some(ScriptStep::Wait { remaining }) => {
            *remaining -= dt;
            *remaining <= 0.0
        }
        _ => true,
    }
}

fn update_footsteps(world: &World, entity: Entity, speed: f32, dt: f32, events: &mut EventQueue) {
    let Ok(mut player) = world.get::<&mut Player>(entity) else {
        return;
    };
    if speed < FOOTSTEP_MIN_SPEED {
        player.footstep_timer = 0.0;
        return;
    }
    player.footstep_timer += dt;
    if player.footstep_timer < FOOTSTEP_INTERVAL {
        return;
    }
    player.footstep_timer = 0.0;
    drop(player);
    if let Ok(position) = world.get::<&Position>(entity) {
        events.push(GameEvent::Footstep {
            entity,
            pos: position.pos,
        });
    }
}

/// Refresh every concealable entity's hideout occupancy from the scene.
pub fn update_concealment(world: &mut World, scene: &Scene) {
    for (_, (position, concealment)) in world.query_mut::<(&Position, &mut Concealment)>() {
        let kind = scene.hideout_at(position.pos);
        concealment.complete = matches!(kind, Some(HideoutKind::Complete));
        concealment.partial = matches!(kind, Some(HideoutKind::Partial));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Item, ItemKind, Name};
    use crate::constants::TICK_SECONDS;

    fn spawn_scripted(world: &mut World, steps: Vec<ScriptStep>) -> Entity {
        world.spawn((
            Position { pos: Vec3::ZERO },
            Facing::new(Vec3::X),
            Player::new(),
            PlayerScript::new(steps),
        ))
    }

    fn run_ticks(world: &mut World, closed_doors: &[Aabb], ticks: usize) -> EventQueue {
        let mut events = EventQueue::new();
        for _ in 0..ticks {
            run_scripts(world, closed_doors, TICK_SECONDS, &mut events);
        }
        events
    }

    #[test]
    fn walk_script_reaches_each_stop_in_order() {
        let mut world = World::new();
        let player = spawn_scripted(
            &mut world,
            vec![
                ScriptStep::GoTo {
                    dest: Vec3::new(4.0, 0.0, 0.0),
                    gait: Gait::Walk,
                },
                ScriptStep::GoTo {
                    dest: Vec3::new(4.0, 0.0, 4.0),
                    gait: Gait::Walk,
                },
            ],
        );

        // 4 m legs at 4 m/s: both done well inside three simulated seconds
        run_ticks(&mut world, &[], 180);

        let pos = world.get::<&Position>(player).unwrap().pos;
        assert!(pos.distance(Vec3::new(4.0, 0.0, 4.0)) <= SCRIPT_ARRIVE_RADIUS + 0.01);
        assert!(world.get::<&PlayerScript>(player).unwrap().steps.is_empty());
    }

    #[test]
    fn closed_door_stops_the_walk_until_it_opens() {
        let mut world = World::new();
        let player = spawn_scripted(
            &mut world,
            vec![ScriptStep::GoTo {
                dest: Vec3::new(6.0, 0.0, 0.0),
                gait: Gait::Sprint,
            }],
        );
        let door = Aabb::from_center(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.2, 1.0, 1.0));

        run_ticks(&mut world, &[door], 120);
        let held = world.get::<&Position>(player).unwrap().pos;
        assert!(held.x < 3.0);

        run_ticks(&mut world, &[], 120);
        let through = world.get::<&Position>(player).unwrap().pos;
        assert!(through.distance(Vec3::new(6.0, 0.0, 0.0)) <= SCRIPT_ARRIVE_RADIUS + 0.01);
    }

    #[test]
    fn footsteps_fire_while_moving_fast_and_stop_when_crouching() {
        let mut world = World::new();
        spawn_scripted(
            &mut world,
            vec![ScriptStep::GoTo {
                dest: Vec3::new(100.0, 0.0, 0.0),
                gait: Gait::Sprint,
            }],
        );
        let mut events = run_ticks(&mut world, &[], 130);
        let steps = events
            .drain()
            .filter(|e| matches!(e, GameEvent::Footstep { .. }))
            .count();
        // just over two seconds of sprinting at one step per half second
        assert_eq!(steps, 4);

        let mut world = World::new();
        spawn_scripted(
            &mut world,
            vec![ScriptStep::GoTo {
                dest: Vec3::new(100.0, 0.0, 0.0),
                gait: Gait::Crouch,
            }],
        );
        let mut events = run_ticks(&mut world, &[], 120);
        assert!(events.is_empty());
    }

    #[test]
    fn wait_step_holds_the_script_for_its_duration() {
        let mut world = World::new();
        let player = spawn_scripted(
            &mut world,
            vec![
                ScriptStep::Wait { remaining: 0.5 },
                ScriptStep::GoTo {
                    dest: Vec3::new(2.0, 0.0, 0.0),
                    gait: Gait::Walk,
                },
            ],
        );

        run_ticks(&mut world, &[], 15);
        assert_eq!(world.get::<&Position>(player).unwrap().pos, Vec3::ZERO);

        run_ticks(&mut world, &[], 120);
        let pos = world.get::<&Position>(player).unwrap().pos;
        assert!(pos.distance(Vec3::new(2.0, 0.0, 0.0)) <= SCRIPT_ARRIVE_RADIUS + 0.01);
    }

    #[test]
    fn interaction_steps_fire_once_and_move_on() {
        let mut world = World::new();
        let player = spawn_scripted(
            &mut world,
            vec![ScriptStep::Pickup {
                name: "brass key".to_string(),
            }],
        );
        world.spawn((
            Position { pos: Vec3::new(1.0, 0.0, 0.0) },
            Name::new("brass key"),
            Item::new(ItemKind::BrassKey),
        ));

        let mut events = run_ticks(&mut world, &[], 1);
        let picked = events
            .drain()
            .any(|e| matches!(e, GameEvent::ItemPickedUp { .. }));
        assert!(picked);
        assert!(world.get::<&PlayerScript>(player).unwrap().steps.is_empty());
    }

    #[test]
    fn concealment_tracks_hideout_volumes() {
        let mut world = World::new();
        let mut scene = Scene::new();
        scene.add_hideout(
            Aabb::from_center(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0)),
            HideoutKind::Complete,
        );
        let player = world.spawn((Position { pos: Vec3::new(5.0, 0.0, 0.0) }, Concealment::none()));

        update_concealment(&mut world, &scene);
        assert!(world.get::<&Concealment>(player).unwrap().complete);

        world.get::<&mut Position>(player).unwrap().pos = Vec3::ZERO;
        update_concealment(&mut world, &scene);
        assert!(!world.get::<&Concealment>(player).unwrap().complete);
    }
}
