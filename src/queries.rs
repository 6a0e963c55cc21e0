//! Common entity query helpers.
//!
//! This module provides reusable query functions to reduce code repetition
//! across systems. These are pure read-only queries that don't modify state.

use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{
    DifficultyState, Door, DoorBody, EnemyAi, Item, ItemKind, Locker, Name, Player, Position,
    SightTarget,
};
use crate::scene::Aabb;

/// Get the player entity, if one exists.
pub fn player_entity(world: &World) -> Option<Entity> {
    world.query::<&Player>().iter().next().map(|(id, _)| id)
}

/// Get the tracked target's entity, ground position and sensed-point height.
pub fn sight_target(world: &World) -> Option<(Entity, Vec3, f32)> {
    world
        .query::<(&Position, &SightTarget)>()
        .iter()
        .next()
        .map(|(id, (pos, target))| (id, pos.pos, target.height_offset))
}

/// Get an entity's world position.
pub fn entity_position(world: &World, entity: Entity) -> Option<Vec3> {
    world.get::<&Position>(entity).ok().map(|p| p.pos)
}

/// Get the boxes of every shut door panel (lockers included), for
/// occlusion and traversal blocking.
pub fn closed_door_boxes(world: &World) -> Vec<Aabb> {
    world
        .query::<(&Position, &Door, &DoorBody)>()
        .iter()
        .filter(|(_, (_, door, _))| !door.is_open)
        .map(|(_, (pos, _, body))| Aabb::from_center(pos.pos, body.half_extents))
        .collect()
}

/// Get the doors the planner must route around: shut and locked.
pub fn locked_closed_doors(world: &World) -> HashSet<Entity> {
    world
        .query::<&Door>()
        .iter()
        .filter(|(_, door)| !door.is_open && door.is_locked)
        .map(|(id, _)| id)
        .collect()
}

/// Find the nearest shut, unlocked door whose panel overlaps the scan
/// sphere. Lockers never match; neither do locked doors.
pub fn nearest_openable_door(world: &World, center: Vec3, radius: f32) -> Option<Entity> {
    let mut best: Option<(f32, Entity)> = None;
    for (id, (pos, door, body, locker)) in world
        .query::<(&Position, &Door, &DoorBody, Option<&Locker>)>()
        .iter()
    {
        if locker.is_some() || !door.can_open() {
            continue;
        }
        let bounds = Aabb::from_center(pos.pos, body.half_extents);
        let closest = center.clamp(bounds.min, bounds.max);
        let dist = closest.distance(center);
        if dist <= radius && best.map_or(true, |(b, _)| dist < b) {
            best = Some((dist, id));
        }
    }
    best.map(|(_, id)| id)
}

/// Find an entity by its name component.
pub fn find_by_name(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<&Name>()
        .iter()
        .find(|(_, n)| n.0 == name)
        .map(|(id, _)| id)
}

/// Name an entity for log lines, falling back to its id.
pub fn entity_name(world: &World, entity: Entity) -> String {
    world
        .get::<&Name>(entity)
        .map(|n| n.0.clone())
        .unwrap_or_else(|_| format!("{:?}", entity))
}

/// Find the item of a given kind carried by an entity, if any.
pub fn carried_item(world: &World, holder: Entity, kind: ItemKind) -> Option<Entity> {
    world
        .query::<&Item>()
        .iter()
        .find(|(_, item)| item.kind == kind && item.holder == Some(holder))
        .map(|(id, _)| id)
}

/// Per-agent status snapshot for session logging.
pub struct EnemyStatus {
    pub name: String,
    pub state: &'static str,
    pub encounters: u32,
    pub pos: Vec3,
}

/// Collect a status line per enemy agent.
pub fn enemy_statuses(world: &World) -> Vec<EnemyStatus> {
    world
        .query::<(&Name, &EnemyAi, &DifficultyState, &Position)>()
        .iter()
        .map(|(_, (name, ai, diff, pos))| EnemyStatus {
            name: name.0.clone(),
            state: ai.state.name(),
            encounters: diff.encounters,
            pos: pos.pos,
        })
        .collect()
}
