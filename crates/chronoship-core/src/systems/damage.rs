//! Spread-damage batch: fires and breaches wearing down subsystems.

use std::collections::HashSet;

use chronoship_logic::atmosphere::RoomAtmosphere;
use chronoship_logic::LevelTable;
use hecs::{Entity, World};

use super::fire::burning_rooms;
use crate::components::{fire_constants, Room, RoomId, Subsystem, VesselId};
use crate::propagation::PropagationBus;

/// Apply damage over time to a subsystem, scaled by the current scope.
/// Returns the number of bars lost.
pub fn damage_over_time(system: &mut Subsystem, bus: &PropagationBus, rate: f32) -> u8 {
    system.accumulate_damage(rate * bus.scaled_dt())
}

pub fn spread_damage_system(world: &mut World, table: &LevelTable, vessel_id: VesselId, dt: f32) {
    let bus = PropagationBus::for_vessel(table, world, vessel_id, dt);

    let burning = burning_rooms(world, vessel_id);
    let breached: HashSet<RoomId> = world
        .query::<(&Room, &RoomAtmosphere)>()
        .iter()
        .filter(|(_, (room, atmo))| room.vessel_id == vessel_id && atmo.breached)
        .map(|(_, (room, _))| room.room_id)
        .collect();
    if burning.is_empty() && breached.is_empty() {
        return;
    }

    let targets: Vec<(Entity, RoomId)> = world
        .query::<&Subsystem>()
        .iter()
        .filter(|(_, system)| system.vessel_id == vessel_id)
        .map(|(entity, system)| (entity, system.room_id))
        .collect();

    for (entity, room_id) in targets {
        let mut rate = 0.0;
        if burning.contains(&room_id) {
            rate += fire_constants::SYSTEM_DAMAGE;
        }
        if breached.contains(&room_id) {
            rate += fire_constants::BREACH_SYSTEM_DAMAGE;
        }
        if rate <= 0.0 {
            continue;
        }

        let _scope = bus.enter_room(room_id);
        if let Ok(mut system) = world.get::<&mut Subsystem>(entity) {
            let lost = damage_over_time(&mut system, &bus, rate);
            if lost > 0 {
                log::debug!(
                    "vessel {vessel_id}: {:?} lost {lost} bar(s) in room {room_id}",
                    system.kind
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{RoomDilation, SubsystemKind};
    use crate::systems::fire::ignite;
    use chronoship_logic::{Direction, LevelRecord};

    fn table() -> LevelTable {
        LevelTable::load([LevelRecord {
            direction: Direction::Accelerate,
            level: 1,
            cooldown: 4,
            duration: 15,
            strength: 2.0,
        }])
    }

    #[test]
    fn test_damage_scaled_in_dilated_room() {
        let table = table();
        let mut world = World::new();
        world.spawn((Room::new(0, 1, "Engines"), RoomAtmosphere::default(), RoomDilation(1)));
        world.spawn((Room::new(0, 2, "Weapons"), RoomAtmosphere::default(), RoomDilation(0)));
        let fast = world.spawn((Subsystem::new(0, 1, SubsystemKind::Engines, 4),));
        let plain = world.spawn((Subsystem::new(0, 2, SubsystemKind::Weapons, 4),));
        ignite(&mut world, 0, 1);
        ignite(&mut world, 0, 2);

        spread_damage_system(&mut world, &table, 0, 1.0);

        let fast_progress = world.get::<&Subsystem>(fast).unwrap().damage_progress;
        let plain_progress = world.get::<&Subsystem>(plain).unwrap().damage_progress;
        assert!((plain_progress - fire_constants::SYSTEM_DAMAGE).abs() < 1e-6);
        assert!((fast_progress - 2.0 * fire_constants::SYSTEM_DAMAGE).abs() < 1e-6);
    }

    #[test]
    fn test_no_hazard_no_damage() {
        let table = table();
        let mut world = World::new();
        world.spawn((Room::new(0, 1, "Engines"), RoomAtmosphere::default(), RoomDilation(1)));
        let system = world.spawn((Subsystem::new(0, 1, SubsystemKind::Engines, 4),));

        spread_damage_system(&mut world, &table, 0, 1.0);
        assert_eq!(world.get::<&Subsystem>(system).unwrap().damage_progress, 0.0);
    }

    #[test]
    fn test_damage_outside_batch_is_unscaled() {
        let table = table();
        let bus = PropagationBus::neutral(&table, 1.0);
        let mut system = Subsystem::new(0, 1, SubsystemKind::Engines, 4);
        damage_over_time(&mut system, &bus, 0.3);
        assert!((system.damage_progress - 0.3).abs() < 1e-6);
    }
}
