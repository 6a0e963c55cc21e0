//! Session assembly: the demo manor, its nav graph, and the starting
//! entities for a headless run.

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{
    AnimationIntent, Concealment, DifficultyState, Door, DoorBody, EnemyAi, Facing, FinalDoor,
    Gait, Item, ItemKind, Keypad, Locker, Lockpad, Name, NavAgent, PatrolRoute, Plank, Player,
    PlayerScript, Position, ScriptStep, Senses, SightTarget,
};
use crate::constants::*;
use crate::nav::NavGraph;
use crate::scene::{Aabb, HideoutKind, Scene};
use crate::tuning::Tuning;

/// Everything one run needs.
pub struct Session {
    pub world: World,
    pub scene: Scene,
    pub graph: NavGraph,
    pub player: Entity,
}

/// Build the two-room manor: a hall with the boarded exit, a study
/// behind an inner door, the key and crowbar to get out, and the thing
/// that walks the halls.
pub fn init_world(tuning: &Tuning) -> Session {
    let mut world = World::new();
    let scene = build_scene();

    let study_door = world.spawn((
        Position {
            pos: Vec3::new(5.0, 1.5, 7.0),
        },
        Name::new("study door"),
        Door::new(false),
        DoorBody::new(Vec3::new(1.0, 1.5, 0.4)),
    ));
    let exit_door = world.spawn((
        Position {
            pos: Vec3::new(5.0, 1.5, -0.2),
        },
        Name::new("exit door"),
        Door::new(true),
        DoorBody::new(Vec3::new(1.0, 1.5, 0.4)),
        FinalDoor::new(ItemKind::BrassKey),
    ));
    world.spawn((
        Position {
            pos: Vec3::new(9.0, 1.0, 13.0),
        },
        Name::new("study locker"),
        Door::new(false),
        DoorBody::new(Vec3::new(0.6, 1.1, 0.6)),
        Locker,
    ));

    world.spawn((
        Position {
            pos: Vec3::new(4.0, 1.2, 0.6),
        },
        Name::new("exit keypad"),
        Keypad::new("4512", exit_door),
    ));
    world.spawn((
        Position {
            pos: Vec3::new(6.0, 1.2, 0.6),
        },
        Name::new("exit lockpad"),
        Lockpad::new(ItemKind::BrassKey, exit_door),
    ));
    for _ in 0..FINAL_DOOR_PLANK_COUNT {
        world.spawn((Plank { door: exit_door },));
    }

    spawn_item(&mut world, "brass key", ItemKind::BrassKey, Vec3::new(2.0, 0.5, 12.0));
    spawn_item(&mut world, "crowbar", ItemKind::Crowbar, Vec3::new(8.0, 0.5, 9.0));
    spawn_item(&mut world, "flashlight", ItemKind::Flashlight, Vec3::new(2.0, 0.5, 1.0));

    let graph = build_graph(study_door);

    let player = world.spawn((
        Position {
            pos: Vec3::new(3.0, 0.0, 2.0),
        },
        Facing::new(Vec3::Z),
        Name::new("the intruder"),
        Player::new(),
        SightTarget::new(TARGET_HEIGHT_OFFSET),
        Concealment::none(),
        PlayerScript::new(escape_route()),
    ));

    spawn_enemy(
        &mut world,
        &graph,
        "the groundskeeper",
        Vec3::new(5.0, 0.0, 11.0),
        vec![
            Vec3::new(5.0, 0.0, 11.0),
            Vec3::new(8.0, 0.0, 12.0),
            Vec3::new(5.0, 0.0, 3.0),
            Vec3::new(2.0, 0.0, 5.0),
        ],
        tuning,
    );

    Session {
        world,
        scene,
        graph,
        player,
    }
}

/// Spawn one enemy agent. A spawn point with no graph node within the
/// sample radius leaves the agent disabled instead of crashing the run.
pub fn spawn_enemy(
    world: &mut World,
    graph: &NavGraph,
    name: &str,
    pos: Vec3,
    route: Vec<Vec3>,
    tuning: &Tuning,
) -> Entity {
    let mut ai = EnemyAi::new(pos);
    let mut nav = NavAgent::new(tuning.walk_speed);
    match graph.sample_position(pos, NAV_SAMPLE_RADIUS) {
        Some(_) => {
            if let Some(first) = route.first() {
                nav.set_destination(*first);
            }
        }
        None => {
            log::error!("'{}' spawn at {:?} is off the nav graph, agent disabled", name, pos);
            ai.disabled = true;
        }
    }
    world.spawn((
        Position { pos },
        Facing::new(Vec3::NEG_Z),
        Name::new(name),
        ai,
        DifficultyState {
            encounters: 0,
            walk_speed: tuning.walk_speed,
            run_speed: tuning.run_speed,
            detection_radius: tuning.detection_radius,
            search_duration: tuning.search_duration,
        },
        Senses {
            near_radius: tuning.near_sense_radius,
            fov_degrees: tuning.fov_degrees,
            eye_height: tuning.eye_height,
        },
        PatrolRoute::new(route, tuning.patrol_mode),
        nav,
        AnimationIntent::default(),
    ))
}

fn spawn_item(world: &mut World, name: &str, kind: ItemKind, pos: Vec3) -> Entity {
    world.spawn((Position { pos }, Name::new(name), Item::new(kind)))
}

/// Walls occlude sight; the doorway gaps are covered by door panels.
fn build_scene() -> Scene {
    let mut scene = Scene::new();
    // perimeter
    scene.add_wall(Aabb::new(Vec3::new(-0.4, 0.0, -0.4), Vec3::new(0.0, 3.0, 14.4)));
    scene.add_wall(Aabb::new(Vec3::new(10.0, 0.0, -0.4), Vec3::new(10.4, 3.0, 14.4)));
    scene.add_wall(Aabb::new(Vec3::new(-0.4, 0.0, 14.0), Vec3::new(10.4, 3.0, 14.4)));
    // south wall, split around the exit doorway
    scene.add_wall(Aabb::new(Vec3::new(-0.4, 0.0, -0.4), Vec3::new(4.0, 3.0, 0.0)));
    scene.add_wall(Aabb::new(Vec3::new(6.0, 0.0, -0.4), Vec3::new(10.4, 3.0, 0.0)));
    // hall/study divider, split around the study doorway
    scene.add_wall(Aabb::new(Vec3::new(0.0, 0.0, 6.8), Vec3::new(4.0, 3.0, 7.2)));
    scene.add_wall(Aabb::new(Vec3::new(6.0, 0.0, 6.8), Vec3::new(10.0, 3.0, 7.2)));
    // under the hall table, and inside the study locker
    scene.add_hideout(
        Aabb::from_center(Vec3::new(8.0, 0.5, 2.0), Vec3::new(1.0, 0.6, 1.0)),
        HideoutKind::Partial,
    );
    scene.add_hideout(
        Aabb::from_center(Vec3::new(9.0, 1.0, 13.0), Vec3::new(0.7, 1.1, 0.7)),
        HideoutKind::Complete,
    );
    scene
}

fn build_graph(study_door: Entity) -> NavGraph {
    let mut graph = NavGraph::new();
    let hall_south = graph.add_node(Vec3::new(5.0, 0.0, 1.0));
    let hall_center = graph.add_node(Vec3::new(5.0, 0.0, 3.0));
    let hall_west = graph.add_node(Vec3::new(2.0, 0.0, 5.0));
    let doorway_south = graph.add_node(Vec3::new(5.0, 0.0, 6.0));
    let doorway_north = graph.add_node(Vec3::new(5.0, 0.0, 8.0));
    let study_center = graph.add_node(Vec3::new(5.0, 0.0, 11.0));
    let study_west = graph.add_node(Vec3::new(2.0, 0.0, 12.0));
    let study_east = graph.add_node(Vec3::new(8.0, 0.0, 12.0));
    graph.connect(hall_south, hall_center);
    graph.connect(hall_center, hall_west);
    graph.connect(hall_center, doorway_south);
    graph.connect_through_door(doorway_south, doorway_north, study_door);
    graph.connect(doorway_north, study_center);
    graph.connect(study_center, study_west);
    graph.connect(study_center, study_east);
    graph
}

/// The scripted run: raid the study for the brass key and the crowbar,
/// then clear all four locks on the exit. The brass key works both the
/// keyhole and the lockpad.
fn escape_route() -> Vec<ScriptStep> {
    vec![
        ScriptStep::GoTo {
            dest: Vec3::new(5.0, 0.0, 5.5),
            gait: Gait::Walk,
        },
        ScriptStep::ToggleDoor {
            name: "study door".to_string(),
        },
        ScriptStep::GoTo {
            dest: Vec3::new(5.0, 0.0, 8.5),
            gait: Gait::Walk,
        },
        ScriptStep::GoTo {
            dest: Vec3::new(2.0, 0.0, 12.0),
            gait: Gait::Walk,
        },
        ScriptStep::Pickup {
            name: "brass key".to_string(),
        },
        ScriptStep::GoTo {
            dest: Vec3::new(8.0, 0.0, 9.0),
            gait: Gait::Crouch,
        },
        ScriptStep::Pickup {
            name: "crowbar".to_string(),
        },
        ScriptStep::Wait { remaining: 1.0 },
        ScriptStep::GoTo {
            dest: Vec3::new(5.0, 0.0, 8.5),
            gait: Gait::Sprint,
        },
        ScriptStep::GoTo {
            dest: Vec3::new(5.0, 0.0, 4.0),
            gait: Gait::Sprint,
        },
        ScriptStep::GoTo {
            dest: Vec3::new(4.0, 0.0, 1.0),
            gait: Gait::Walk,
        },
        ScriptStep::EnterPin {
            name: "exit keypad".to_string(),
            code: "4512".to_string(),
        },
        ScriptStep::TryLockpad {
            name: "exit lockpad".to_string(),
        },
        ScriptStep::GoTo {
            dest: Vec3::new(5.0, 0.0, 1.0),
            gait: Gait::Walk,
        },
        ScriptStep::UseKey {
            door: "exit door".to_string(),
        },
        ScriptStep::PryPlank {
            door: "exit door".to_string(),
        },
        ScriptStep::PryPlank {
            door: "exit door".to_string(),
        },
        ScriptStep::GoTo {
            dest: Vec3::new(5.0, 0.0, -2.0),
            gait: Gait::Sprint,
        },
    ]
}
