//! Session snapshots: player position, door and lock state, and item
//! whereabouts, written as JSON. Enemy agents are not persisted; a
//! loaded session restarts them on patrol.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec3;
use hecs::World;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{Door, Facing, FinalDoor, Item, Keypad, Lockpad, Name, Plank, Position};
use crate::queries;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode or decode save data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorSave {
    pub name: String,
    pub is_open: bool,
    pub is_locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSave {
    pub name: String,
    pub pos: Vec3,
    pub carried: bool,
}

/// One restorable snapshot of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub elapsed_seconds: f32,
    pub player_pos: Vec3,
    pub player_facing: Vec3,
    pub doors: Vec<DoorSave>,
    pub items: Vec<ItemSave>,
    pub keypads_cleared: Vec<String>,
    pub lockpads_cleared: Vec<String>,
    pub keyholes_cleared: Vec<String>,
    /// Planks still nailed on, per door name
    pub planks: HashMap<String, u32>,
}

/// Snapshot the current world.
pub fn capture(world: &World, elapsed_seconds: f32) -> SaveGame {
    let (player_pos, player_facing) = queries::player_entity(world)
        .map(|player| {
            let pos = queries::entity_position(world, player).unwrap_or(Vec3::ZERO);
            let facing = world
                .get::<&Facing>(player)
                .map(|f| f.forward)
                .unwrap_or(Vec3::Z);
            (pos, facing)
        })
        .unwrap_or((Vec3::ZERO, Vec3::Z));

    let doors = world
        .query::<(&Name, &Door)>()
        .iter()
        .map(|(_, (name, door))| DoorSave {
            name: name.0.clone(),
            is_open: door.is_open,
            is_locked: door.is_locked,
        })
        .collect();

    let items = world
        .query::<(&Name, &Item, &Position)>()
        .iter()
        .map(|(_, (name, item, pos))| ItemSave {
            name: name.0.clone(),
            pos: pos.pos,
            carried: item.holder.is_some(),
        })
        .collect();

    let keypads_cleared = world
        .query::<(&Name, &Keypad)>()
        .iter()
        .filter(|(_, (_, pad))| pad.cleared)
        .map(|(_, (name, _))| name.0.clone())
        .collect();
    let lockpads_cleared = world
        .query::<(&Name, &Lockpad)>()
        .iter()
        .filter(|(_, (_, pad))| pad.cleared)
        .map(|(_, (name, _))| name.0.clone())
        .collect();
    let keyholes_cleared = world
        .query::<(&Name, &FinalDoor)>()
        .iter()
        .filter(|(_, (_, fin))| fin.keyhole_cleared)
        .map(|(_, (name, _))| name.0.clone())
        .collect();

    let mut planks: HashMap<String, u32> = HashMap::new();
    for (_, plank) in world.query::<&Plank>().iter() {
        let door = queries::entity_name(world, plank.door);
        *planks.entry(door).or_insert(0) += 1;
    }

    SaveGame {
        elapsed_seconds,
        player_pos,
        player_facing,
        doors,
        items,
        keypads_cleared,
        lockpads_cleared,
        keyholes_cleared,
        planks,
    }
}

/// Write a saved state back onto a freshly built world. Entities the
/// save names that no longer exist are skipped with a warning.
pub fn apply(world: &mut World, save: &SaveGame) {
    let player = queries::player_entity(world);
    if let Some(player) = player {
        if let Ok(mut pos) = world.get::<&mut Position>(player) {
            pos.pos = save.player_pos;
        }
        if let Ok(mut facing) = world.get::<&mut Facing>(player) {
            facing.look_along(save.player_facing);
        }
    }

    for door_save in &save.doors {
        let Some(entity) = queries::find_by_name(world, &door_save.name) else {
            log::warn!("save names an unknown door '{}'", door_save.name);
            continue;
        };
        if let Ok(mut door) = world.get::<&mut Door>(entity) {
            door.is_open = door_save.is_open;
            door.is_locked = door_save.is_locked;
            door.swing = 0.0;
        }
    }

    for item_save in &save.items {
        let Some(entity) = queries::find_by_name(world, &item_save.name) else {
            log::warn!("save names an unknown item '{}'", item_save.name);
            continue;
        };
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.pos = item_save.pos;
        }
        if let Ok(mut item) = world.get::<&mut Item>(entity) {
            item.holder = if item_save.carried { player } else { None };
        }
    }

    for name in &save.keypads_cleared {
        if let Some(entity) = queries::find_by_name(world, name) {
            if let Ok(mut pad) = world.get::<&mut Keypad>(entity) {
                pad.cleared = true;
            }
        }
    }
    for name in &save.lockpads_cleared {
        if let Some(entity) = queries::find_by_name(world, name) {
            if let Ok(mut pad) = world.get::<&mut Lockpad>(entity) {
                pad.cleared = true;
            }
        }
    }
    for name in &save.keyholes_cleared {
        if let Some(entity) = queries::find_by_name(world, name) {
            if let Ok(mut fin) = world.get::<&mut FinalDoor>(entity) {
                fin.keyhole_cleared = true;
            }
        }
    }

    trim_planks(world, &save.planks);
}

/// Despawn planks until each door carries as many as the save recorded.
fn trim_planks(world: &mut World, saved: &HashMap<String, u32>) {
    let planks: Vec<(hecs::Entity, String)> = world
        .query::<&Plank>()
        .iter()
        .map(|(id, plank)| (id, queries::entity_name(world, plank.door)))
        .collect();

    let mut keep: HashMap<String, u32> = saved.clone();
    for (entity, door) in planks {
        let left = keep.entry(door).or_insert(0);
        if *left > 0 {
            *left -= 1;
        } else {
            let _ = world.despawn(entity);
        }
    }
}

/// Write a snapshot to disk as pretty JSON.
pub fn save_to(path: &Path, save: &SaveGame) -> Result<(), SaveError> {
    let text = serde_json::to_string_pretty(save)?;
    fs::write(path, text)?;
    Ok(())
}

/// Read a snapshot back from disk.
pub fn load_from(path: &Path) -> Result<SaveGame, SaveError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
