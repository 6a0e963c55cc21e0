//! Player-driven interactions: picking things up, working locks, and
//! prying the exit door open.

use hecs::{Entity, World};

use crate::components::{Door, FinalDoor, Item, Keypad, Lockpad, Plank, Position};
use crate::constants::{INTERACT_RANGE, PICKUP_RANGE};
use crate::events::{EventQueue, GameEvent};
use crate::queries;
use crate::systems::doors;

fn in_range(world: &World, a: Entity, b: Entity, range: f32) -> bool {
    match (
        queries::entity_position(world, a),
        queries::entity_position(world, b),
    ) {
        (Some(pa), Some(pb)) => pa.distance(pb) <= range,
        _ => false,
    }
}

/// Pick up a named item within reach. Fails if it is already held.
pub fn pickup(world: &World, player: Entity, name: &str, events: &mut EventQueue) -> bool {
    let Some(item_entity) = queries::find_by_name(world, name) else {
        return false;
    };
    if !in_range(world, player, item_entity, PICKUP_RANGE) {
        return false;
    }
    let Ok(mut item) = world.get::<&mut Item>(item_entity) else {
        return false;
    };
    if item.holder.is_some() {
        return false;
    }
    item.holder = Some(player);
    events.push(GameEvent::ItemPickedUp {
        item: item_entity,
        by: player,
    });
    true
}

/// Drop a carried item at the player's feet.
pub fn drop_item(world: &World, player: Entity, name: &str, events: &mut EventQueue) -> bool {
    let Some(item_entity) = queries::find_by_name(world, name) else {
        return false;
    };
    let Some(player_pos) = queries::entity_position(world, player) else {
        return false;
    };
    let Ok(mut item) = world.get::<&mut Item>(item_entity) else {
        return false;
    };
    if item.holder != Some(player) {
        return false;
    }
    item.holder = None;
    drop(item);
    if let Ok(mut pos) = world.get::<&mut Position>(item_entity) {
        pos.pos = player_pos;
    }
    events.push(GameEvent::ItemDropped {
        item: item_entity,
        at: player_pos,
    });
    true
}

/// Toggle a named door or locker within reach.
pub fn toggle_door(world: &World, player: Entity, name: &str, events: &mut EventQueue) -> bool {
    let Some(door_entity) = queries::find_by_name(world, name) else {
        return false;
    };
    if !in_range(world, player, door_entity, INTERACT_RANGE) {
        return false;
    }
    doors::toggle(world, door_entity, player, events)
}

/// Enter a code on a named keypad. Only the exact PIN clears it.
pub fn enter_pin(
    world: &World,
    player: Entity,
    name: &str,
    code: &str,
    events: &mut EventQueue,
) -> bool {
    let Some(pad_entity) = queries::find_by_name(world, name) else {
        return false;
    };
    if !in_range(world, player, pad_entity, INTERACT_RANGE) {
        return false;
    }
    let Ok(mut pad) = world.get::<&mut Keypad>(pad_entity) else {
        return false;
    };
    if pad.cleared {
        return true;
    }
    if pad.pin != code {
        events.push(GameEvent::PinRejected { keypad: pad_entity });
        return false;
    }
    pad.cleared = true;
    let door = pad.door;
    drop(pad);
    lock_cleared(world, door, events);
    true
}

/// Try a named lockpad with whatever the player is carrying.
pub fn try_lockpad(world: &World, player: Entity, name: &str, events: &mut EventQueue) -> bool {
    let Some(pad_entity) = queries::find_by_name(world, name) else {
        return false;
    };
    if !in_range(world, player, pad_entity, INTERACT_RANGE) {
        return false;
    }
    let Ok(mut pad) = world.get::<&mut Lockpad>(pad_entity) else {
        return false;
    };
    if pad.cleared {
        return true;
    }
    if queries::carried_item(world, player, pad.opens_with).is_none() {
        return false;
    }
    pad.cleared = true;
    let door = pad.door;
    drop(pad);
    lock_cleared(world, door, events);
    true
}

/// Try the exit door's own keyhole with a carried key.
pub fn use_keyhole(world: &World, player: Entity, door_name: &str, events: &mut EventQueue) -> bool {
    let Some(door_entity) = queries::find_by_name(world, door_name) else {
        return false;
    };
    if !in_range(world, player, door_entity, INTERACT_RANGE) {
        return false;
    }
    let Ok(mut fin) = world.get::<&mut FinalDoor>(door_entity) else {
        return false;
    };
    if fin.keyhole_cleared {
        return true;
    }
    if queries::carried_item(world, player, fin.opens_with).is_none() {
        return false;
    }
    fin.keyhole_cleared = true;
    drop(fin);
    lock_cleared(world, door_entity, events);
    true
}

/// Pry one plank off a named door. Needs the crowbar; the plank despawns.
pub fn pry_plank(
    world: &mut World,
    player: Entity,
    door_name: &str,
    events: &mut EventQueue,
) -> bool {
    let Some(door_entity) = queries::find_by_name(world, door_name) else {
        return false;
    };
    if !in_range(world, player, door_entity, INTERACT_RANGE) {
        return false;
    }
    if queries::carried_item(world, player, crate::components::ItemKind::Crowbar).is_none() {
        return false;
    }
    let plank = world
        .query::<&Plank>()
        .iter()
        .find(|(_, plank)| plank.door == door_entity)
        .map(|(id, _)| id);
    let Some(plank) = plank else {
        return false;
    };
    let _ = world.despawn(plank);
    let left = planks_on(world, door_entity);
    events.push(GameEvent::PlankPried {
        door: door_entity,
        left,
    });
    if left == 0 {
        lock_cleared(world, door_entity, events);
    }
    true
}

/// Locks still holding a door shut: its own keyhole, every uncleared
/// keypad and lockpad that references it, and the planks as one lock
/// while any remain.
pub fn locks_remaining(world: &World, door_entity: Entity) -> u32 {
    let mut remaining = 0;
    if let Ok(fin) = world.get::<&FinalDoor>(door_entity) {
        if !fin.keyhole_cleared {
            remaining += 1;
        }
    }
    remaining += world
        .query::<&Keypad>()
        .iter()
        .filter(|(_, pad)| pad.door == door_entity && !pad.cleared)
        .count() as u32;
    remaining += world
        .query::<&Lockpad>()
        .iter()
        .filter(|(_, pad)| pad.door == door_entity && !pad.cleared)
        .count() as u32;
    if planks_on(world, door_entity) > 0 {
        remaining += 1;
    }
    remaining
}

fn planks_on(world: &World, door_entity: Entity) -> u32 {
    world
        .query::<&Plank>()
        .iter()
        .filter(|(_, plank)| plank.door == door_entity)
        .count() as u32
}

fn lock_cleared(world: &World, door_entity: Entity, events: &mut EventQueue) {
    let remaining = locks_remaining(world, door_entity);
    events.push(GameEvent::LockCleared {
        door: door_entity,
        remaining,
    });
    log::debug!("lock cleared, {} remaining", remaining);
    if remaining > 0 {
        return;
    }
    if let Ok(mut door) = world.get::<&mut Door>(door_entity) {
        door.is_locked = false;
        door.open();
    }
    events.push(GameEvent::Escaped);
    log::info!("every lock is off and the way out stands open");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{DoorBody, ItemKind, Name};
    use glam::Vec3;

    fn spawn_player(world: &mut World) -> Entity {
        world.spawn((Position { pos: Vec3::ZERO }, Name::new("player")))
    }

    fn spawn_item(world: &mut World, name: &str, kind: ItemKind, pos: Vec3) -> Entity {
        world.spawn((Position { pos }, Name::new(name), Item::new(kind)))
    }

    fn spawn_exit(world: &mut World) -> Entity {
        world.spawn((
            Position { pos: Vec3::new(2.0, 0.0, 0.0) },
            Name::new("exit door"),
            Door::new(true),
            DoorBody::new(Vec3::new(0.6, 1.0, 0.1)),
            FinalDoor::new(ItemKind::BrassKey),
        ))
    }

    #[test]
    fn pickup_requires_reach() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let player = spawn_player(&mut world);
        spawn_item(&mut world, "key", ItemKind::BrassKey, Vec3::new(50.0, 0.0, 0.0));

        assert!(!pickup(&world, player, "key", &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn pickup_and_drop_move_the_item_with_the_player() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let player = spawn_player(&mut world);
        let key = spawn_item(&mut world, "key", ItemKind::BrassKey, Vec3::new(1.0, 0.0, 0.0));

        assert!(pickup(&world, player, "key", &mut events));
        assert!(queries::carried_item(&world, player, ItemKind::BrassKey).is_some());

        world.get::<&mut Position>(player).unwrap().pos = Vec3::new(9.0, 0.0, 9.0);
        assert!(drop_item(&world, player, "key", &mut events));
        let dropped = world.get::<&Position>(key).unwrap().pos;
        assert_eq!(dropped, Vec3::new(9.0, 0.0, 9.0));
        assert!(queries::carried_item(&world, player, ItemKind::BrassKey).is_none());
    }

    #[test]
    fn keypad_clears_only_on_the_exact_pin() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let player = spawn_player(&mut world);
        let exit = spawn_exit(&mut world);
        world.spawn((
            Position { pos: Vec3::new(1.0, 0.0, 0.0) },
            Name::new("keypad"),
            Keypad::new("4512", exit),
        ));

        assert!(!enter_pin(&world, player, "keypad", "0000", &mut events));
        let rejected = events
            .drain()
            .any(|e| matches!(e, GameEvent::PinRejected { .. }));
        assert!(rejected);

        assert!(enter_pin(&world, player, "keypad", "4512", &mut events));
        // the keyhole is still uncleared, so the door stays locked
        assert!(world.get::<&Door>(exit).unwrap().is_locked);
    }

    #[test]
    fn lockpad_needs_its_key_in_hand() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let player = spawn_player(&mut world);
        let exit = spawn_exit(&mut world);
        world.spawn((
            Position { pos: Vec3::new(1.0, 0.0, 0.0) },
            Name::new("lockpad"),
            Lockpad::new(ItemKind::BrassKey, exit),
        ));
        spawn_item(&mut world, "brass key", ItemKind::BrassKey, Vec3::new(1.0, 0.0, 0.0));
        spawn_item(&mut world, "crowbar", ItemKind::Crowbar, Vec3::new(1.0, 0.0, 0.0));

        // empty-handed, then holding the wrong tool
        assert!(!try_lockpad(&world, player, "lockpad", &mut events));
        assert!(pickup(&world, player, "crowbar", &mut events));
        assert!(!try_lockpad(&world, player, "lockpad", &mut events));

        assert!(pickup(&world, player, "brass key", &mut events));
        assert!(try_lockpad(&world, player, "lockpad", &mut events));
    }

    #[test]
    fn prying_planks_needs_the_crowbar_and_consumes_them() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let player = spawn_player(&mut world);
        let exit = spawn_exit(&mut world);
        world.spawn((Plank { door: exit },));
        world.spawn((Plank { door: exit },));
        spawn_item(&mut world, "crowbar", ItemKind::Crowbar, Vec3::new(1.0, 0.0, 0.0));

        assert!(!pry_plank(&mut world, player, "exit door", &mut events));

        assert!(pickup(&world, player, "crowbar", &mut events));
        assert!(pry_plank(&mut world, player, "exit door", &mut events));
        assert!(pry_plank(&mut world, player, "exit door", &mut events));
        // both planks gone, a third pry finds nothing
        assert!(!pry_plank(&mut world, player, "exit door", &mut events));
    }

    #[test]
    fn clearing_every_lock_opens_the_exit() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let player = spawn_player(&mut world);
        let exit = spawn_exit(&mut world);
        world.spawn((
            Position { pos: Vec3::new(1.0, 0.0, 0.0) },
            Name::new("keypad"),
            Keypad::new("4512", exit),
        ));
        world.spawn((
            Position { pos: Vec3::new(1.0, 0.0, 0.0) },
            Name::new("lockpad"),
            Lockpad::new(ItemKind::BrassKey, exit),
        ));
        world.spawn((Plank { door: exit },));
        spawn_item(&mut world, "brass key", ItemKind::BrassKey, Vec3::ZERO);
        spawn_item(&mut world, "crowbar", ItemKind::Crowbar, Vec3::ZERO);
        assert!(pickup(&world, player, "brass key", &mut events));
        assert!(pickup(&world, player, "crowbar", &mut events));
        assert_eq!(locks_remaining(&world, exit), 4);

        assert!(use_keyhole(&world, player, "exit door", &mut events));
        assert!(enter_pin(&world, player, "keypad", "4512", &mut events));
        assert!(try_lockpad(&world, player, "lockpad", &mut events));
        assert_eq!(locks_remaining(&world, exit), 1);
        assert!(pry_plank(&mut world, player, "exit door", &mut events));

        let door = world.get::<&Door>(exit).unwrap();
        assert!(!door.is_locked);
        assert!(door.is_open);
        drop(door);
        let escaped = events
            .drain()
            .any(|e| matches!(e, GameEvent::Escaped));
        assert!(escaped);
    }
}
