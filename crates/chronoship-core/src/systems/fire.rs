//! Environment batch: fire burning, starvation and spread.
//!
//! Each fire runs its three steps in separate scopes keyed by its room, so
//! a fire in a dilated room burns, starves and spreads at that room's pace.

use std::collections::HashSet;

use chronoship_logic::atmosphere::{
    atmo_constants, modify_room_oxygen, supports_fire, RoomAtmosphere,
};
use chronoship_logic::LevelTable;
use hecs::{Entity, World};
use rand::Rng;

use super::query::find_room;
use crate::components::{Fire, RoomConnections, RoomId, VesselId};
use crate::propagation::PropagationBus;

/// Rooms of a vessel that currently hold a fire.
pub fn burning_rooms(world: &World, vessel_id: VesselId) -> HashSet<RoomId> {
    world
        .query::<&Fire>()
        .iter()
        .filter(|(_, fire)| fire.vessel_id == vessel_id)
        .map(|(_, fire)| fire.room_id)
        .collect()
}

/// Start a fire in a room unless one is already burning there.
pub fn ignite(world: &mut World, vessel_id: VesselId, room_id: RoomId) -> Option<Entity> {
    find_room(world, vessel_id, room_id)?;
    if burning_rooms(world, vessel_id).contains(&room_id) {
        return None;
    }
    Some(world.spawn((Fire::new(vessel_id, room_id),)))
}

pub fn fire_system(
    world: &mut World,
    table: &LevelTable,
    rng: &mut impl Rng,
    vessel_id: VesselId,
    dt: f32,
) {
    let bus = PropagationBus::for_vessel(table, world, vessel_id, dt);

    let fires: Vec<(Entity, RoomId)> = world
        .query::<&Fire>()
        .iter()
        .filter(|(_, fire)| fire.vessel_id == vessel_id)
        .map(|(entity, fire)| (entity, fire.room_id))
        .collect();
    let mut burning = burning_rooms(world, vessel_id);

    let mut extinguished = Vec::new();
    let mut spread_to = Vec::new();
    for (fire, room_id) in fires {
        let Some(room) = find_room(world, vessel_id, room_id) else {
            extinguished.push(fire);
            continue;
        };
        let (neighbours, door_level) = world
            .get::<&RoomConnections>(room)
            .map(|c| (c.connected_to.clone(), c.door_level))
            .unwrap_or_default();
        let connected_fires = neighbours.iter().filter(|n| burning.contains(*n)).count();

        {
            let _scope = bus.enter_room(room_id);
            fire_on_loop(world, &bus, fire, room);
        }
        {
            let _scope = bus.enter_room(room_id);
            update_death_timer(world, &bus, fire, room, connected_fires);
        }
        let ready = {
            let _scope = bus.enter_room(room_id);
            update_start_timer(world, &bus, fire, door_level)
        };

        if world.get::<&Fire>(fire).map_or(true, |f| f.is_out()) {
            extinguished.push(fire);
            continue;
        }
        if ready {
            let candidates: Vec<RoomId> = neighbours
                .iter()
                .copied()
                .filter(|n| !burning.contains(n))
                .collect();
            if !candidates.is_empty() {
                let target = candidates[rng.gen_range(0..candidates.len())];
                burning.insert(target);
                spread_to.push(target);
            }
        }
    }

    for fire in extinguished {
        let _ = world.despawn(fire);
    }
    for room_id in spread_to {
        log::debug!("vessel {vessel_id}: fire spread to room {room_id}");
        world.spawn((Fire::new(vessel_id, room_id),));
    }
}

/// Burn oxygen; a fire with enough oxygen keeps growing.
fn fire_on_loop(world: &mut World, bus: &PropagationBus, fire: Entity, room: Entity) {
    let step = bus.scaled_dt();
    let fed = match world.get::<&mut RoomAtmosphere>(room) {
        Ok(mut atmo) => {
            modify_room_oxygen(&mut atmo, -atmo_constants::FIRE_OXYGEN_DRAW * step);
            supports_fire(&atmo)
        }
        Err(_) => false,
    };
    if fed {
        if let Ok(mut fire) = world.get::<&mut Fire>(fire) {
            fire.feed(step);
        }
    }
}

fn update_death_timer(
    world: &mut World,
    bus: &PropagationBus,
    fire: Entity,
    room: Entity,
    connected_fires: usize,
) {
    let starving = world
        .get::<&RoomAtmosphere>(room)
        .map_or(true, |atmo| !supports_fire(&atmo));
    if starving {
        if let Ok(mut fire) = world.get::<&mut Fire>(fire) {
            fire.starve(bus.scaled_dt(), connected_fires);
        }
    }
}

fn update_start_timer(
    world: &mut World,
    bus: &PropagationBus,
    fire: Entity,
    door_level: u8,
) -> bool {
    world
        .get::<&mut Fire>(fire)
        .map_or(false, |mut fire| fire.advance_spread(bus.scaled_dt(), door_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{fire_constants, Room, RoomDilation};
    use chronoship_logic::{Direction, LevelRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> LevelTable {
        LevelTable::load([LevelRecord {
            direction: Direction::Decelerate,
            level: 1,
            cooldown: 4,
            duration: 15,
            strength: 0.5,
        }])
    }

    fn room(
        world: &mut World,
        room_id: RoomId,
        oxygen: f32,
        dilation: i32,
        links: &[RoomId],
    ) -> Entity {
        let mut connections = RoomConnections::new();
        for &link in links {
            connections.connect(link);
        }
        world.spawn((
            Room::new(0, room_id, "Room"),
            RoomAtmosphere {
                oxygen,
                ..Default::default()
            },
            connections,
            RoomDilation(dilation),
        ))
    }

    #[test]
    fn test_ignite_once_per_room() {
        let mut world = World::new();
        room(&mut world, 1, 100.0, 0, &[]);
        assert!(ignite(&mut world, 0, 1).is_some());
        assert!(ignite(&mut world, 0, 1).is_none());
        assert!(ignite(&mut world, 0, 9).is_none());
    }

    #[test]
    fn test_slowed_room_burns_less_oxygen() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(1);
        let mut world = World::new();
        let slow = room(&mut world, 1, 100.0, -1, &[]);
        let plain = room(&mut world, 2, 100.0, 0, &[]);
        ignite(&mut world, 0, 1);
        ignite(&mut world, 0, 2);

        fire_system(&mut world, &table, &mut rng, 0, 1.0);

        let slow_draw = 100.0 - world.get::<&RoomAtmosphere>(slow).unwrap().oxygen;
        let plain_draw = 100.0 - world.get::<&RoomAtmosphere>(plain).unwrap().oxygen;
        assert!((plain_draw - atmo_constants::FIRE_OXYGEN_DRAW).abs() < 1e-4);
        assert!((slow_draw - 0.5 * atmo_constants::FIRE_OXYGEN_DRAW).abs() < 1e-4);
    }

    #[test]
    fn test_fire_dies_without_oxygen() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(1);
        let mut world = World::new();
        room(&mut world, 1, 0.0, 0, &[]);
        ignite(&mut world, 0, 1);

        fire_system(&mut world, &table, &mut rng, 0, fire_constants::DEATH_TIME);
        assert!(burning_rooms(&world, 0).is_empty());
    }

    #[test]
    fn test_fire_spreads_to_neighbour() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(7);
        let mut world = World::new();
        room(&mut world, 1, 100.0, 0, &[2]);
        room(&mut world, 2, 100.0, 0, &[1]);
        ignite(&mut world, 0, 1);

        fire_system(&mut world, &table, &mut rng, 0, fire_constants::SPREAD_TIME);
        let burning = burning_rooms(&world, 0);
        assert!(burning.contains(&1));
        assert!(burning.contains(&2));
    }
}
