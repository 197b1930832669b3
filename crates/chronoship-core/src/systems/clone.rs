//! Clone batch: rebuilding dead crew at the clone bay's pace.

use chronoship_logic::LevelTable;
use hecs::World;

use crate::components::{CloneBay, CrewMember, Subsystem, VesselId};
use crate::propagation::PropagationBus;

pub fn clone_system(world: &mut World, table: &LevelTable, vessel_id: VesselId, dt: f32) {
    let bus = PropagationBus::for_vessel(table, world, vessel_id, dt);

    let mut finished = Vec::new();
    for (_, (system, bay)) in world.query_mut::<(&Subsystem, &mut CloneBay)>() {
        if system.vessel_id != vessel_id || !system.functioning() {
            continue;
        }
        let _scope = bus.enter_room(system.room_id);
        if let Some(name) = bay.advance(bus.scaled_dt()) {
            finished.push((system.room_id, name));
        }
    }

    for (room_id, name) in finished {
        log::info!("vessel {vessel_id}: {name} cloned in room {room_id}");
        world.spawn((CrewMember::new(vessel_id, room_id, name),));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{crew_constants, Room, RoomDilation, SubsystemKind};
    use chronoship_logic::{Direction, LevelRecord};

    fn table() -> LevelTable {
        LevelTable::load([LevelRecord {
            direction: Direction::Decelerate,
            level: 1,
            cooldown: 4,
            duration: 15,
            strength: 0.5,
        }])
    }

    fn crew_count(world: &World) -> usize {
        world.query::<&CrewMember>().iter().count()
    }

    #[test]
    fn test_clone_respawns_in_bay_room() {
        let table = table();
        let mut world = World::new();
        world.spawn((Room::new(0, 5, "Clonebay"), RoomDilation(0)));
        let mut bay = CloneBay::new();
        bay.enqueue("Hale");
        world.spawn((Subsystem::new(0, 5, SubsystemKind::Clonebay, 1), bay));

        clone_system(&mut world, &table, 0, crew_constants::CLONE_TIME);

        let spawned: Vec<(String, u32)> = world
            .query::<&CrewMember>()
            .iter()
            .map(|(_, m)| (m.name.clone(), m.room_id))
            .collect();
        assert_eq!(spawned, vec![("Hale".to_string(), 5)]);
    }

    #[test]
    fn test_slowed_bay_takes_longer() {
        let table = table();
        let mut world = World::new();
        world.spawn((Room::new(0, 5, "Clonebay"), RoomDilation(-1)));
        let mut bay = CloneBay::new();
        bay.enqueue("Hale");
        world.spawn((Subsystem::new(0, 5, SubsystemKind::Clonebay, 1), bay));

        clone_system(&mut world, &table, 0, crew_constants::CLONE_TIME);
        assert_eq!(crew_count(&world), 0);
        clone_system(&mut world, &table, 0, crew_constants::CLONE_TIME);
        assert_eq!(crew_count(&world), 1);
    }

    #[test]
    fn test_unpowered_bay_pauses() {
        let table = table();
        let mut world = World::new();
        let mut system = Subsystem::new(0, 5, SubsystemKind::Clonebay, 1);
        system.set_power(0);
        let mut bay = CloneBay::new();
        bay.enqueue("Hale");
        world.spawn((system, bay));

        clone_system(&mut world, &table, 0, crew_constants::CLONE_TIME);
        assert_eq!(crew_count(&world), 0);
    }
}
