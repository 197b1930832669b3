//! Crew batch: action pacing, hazard damage, death and repair completion.

use std::collections::HashMap;

use chronoship_logic::atmosphere::{suffocation_damage, RoomAtmosphere};
use chronoship_logic::LevelTable;
use hecs::{Entity, World};

use super::fire::burning_rooms;
use super::query::find_subsystem;
use crate::components::{
    fire_constants, CloneBay, CrewAction, CrewMember, Room, RoomId, Subsystem, SubsystemKind,
    VesselId,
};
use crate::propagation::PropagationBus;

pub fn crew_system(world: &mut World, table: &LevelTable, vessel_id: VesselId, dt: f32) {
    let bus = PropagationBus::for_vessel(table, world, vessel_id, dt);

    let burning = burning_rooms(world, vessel_id);
    let atmospheres: HashMap<RoomId, RoomAtmosphere> = world
        .query::<(&Room, &RoomAtmosphere)>()
        .iter()
        .filter(|(_, (room, _))| room.vessel_id == vessel_id)
        .map(|(_, (room, atmo))| (room.room_id, *atmo))
        .collect();

    let crew: Vec<(Entity, RoomId)> = world
        .query::<&CrewMember>()
        .iter()
        .filter(|(_, member)| member.vessel_id == vessel_id)
        .map(|(entity, member)| (entity, member.room_id))
        .collect();

    let mut repairs = Vec::new();
    let mut dead = Vec::new();
    for (entity, room_id) in crew {
        let _scope = bus.enter_room(room_id);
        let step = bus.scaled_dt();
        let Ok(mut member) = world.get::<&mut CrewMember>(entity) else {
            continue;
        };

        let mut hazard = atmospheres.get(&room_id).map_or(0.0, suffocation_damage);
        if burning.contains(&room_id) {
            hazard += fire_constants::CREW_DAMAGE;
        }
        member.take_damage(hazard * step);
        if member.is_dead() {
            dead.push((entity, member.name.clone()));
            continue;
        }

        if member.work(step) && member.action == CrewAction::Repairing {
            repairs.push(room_id);
        }
    }

    for room_id in repairs {
        repair_room(world, vessel_id, room_id);
    }
    for (entity, name) in dead {
        let _ = world.despawn(entity);
        queue_clone(world, vessel_id, name);
    }
}

fn repair_room(world: &mut World, vessel_id: VesselId, room_id: RoomId) {
    let damaged = world
        .query::<&Subsystem>()
        .iter()
        .find(|(_, s)| s.vessel_id == vessel_id && s.room_id == room_id && s.damage > 0)
        .map(|(entity, _)| entity);
    if let Some(entity) = damaged {
        if let Ok(mut system) = world.get::<&mut Subsystem>(entity) {
            system.repair_bar();
        }
    }
}

/// Hand a dead crew member to the vessel's clone bay, if it has a working one.
fn queue_clone(world: &mut World, vessel_id: VesselId, name: String) {
    let Some(entity) = find_subsystem(world, vessel_id, SubsystemKind::Clonebay) else {
        log::info!("vessel {vessel_id}: {name} died with no clone bay");
        return;
    };
    let functioning = world.get::<&Subsystem>(entity).map_or(false, |s| s.functioning());
    match world.get::<&mut CloneBay>(entity) {
        Ok(mut bay) if functioning => {
            log::info!("vessel {vessel_id}: {name} queued for cloning");
            bay.enqueue(name);
        }
        _ => log::info!("vessel {vessel_id}: {name} died, clone bay offline"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{crew_constants, RoomDilation};
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

    fn crew(world: &mut World, room_id: RoomId, action: CrewAction) -> Entity {
        let mut member = CrewMember::new(0, room_id, "Hale");
        member.set_action(action);
        world.spawn((member,))
    }

    #[test]
    fn test_dilated_crew_work_faster() {
        let table = table();
        let mut world = World::new();
        world.spawn((Room::new(0, 1, "Fast"), RoomAtmosphere::default(), RoomDilation(1)));
        world.spawn((Room::new(0, 2, "Plain"), RoomAtmosphere::default(), RoomDilation(0)));
        let fast = crew(&mut world, 1, CrewAction::Manning);
        let plain = crew(&mut world, 2, CrewAction::Manning);

        crew_system(&mut world, &table, 0, crew_constants::ACTION_TIME / 2.0);

        assert_eq!(world.get::<&CrewMember>(fast).unwrap().actions_completed, 1);
        assert_eq!(world.get::<&CrewMember>(plain).unwrap().actions_completed, 0);
    }

    #[test]
    fn test_repair_completion_fixes_bar() {
        let table = table();
        let mut world = World::new();
        world.spawn((Room::new(0, 1, "Engines"), RoomAtmosphere::default()));
        let mut engines = Subsystem::new(0, 1, SubsystemKind::Engines, 3);
        engines.damage = 2;
        let engines = world.spawn((engines,));
        crew(&mut world, 1, CrewAction::Repairing);

        crew_system(&mut world, &table, 0, crew_constants::ACTION_TIME);
        assert_eq!(world.get::<&Subsystem>(engines).unwrap().damage, 1);
    }

    #[test]
    fn test_dead_crew_queued_for_cloning() {
        let table = table();
        let mut world = World::new();
        world.spawn((
            Room::new(0, 1, "Airlock"),
            RoomAtmosphere {
                oxygen: 0.0,
                ..Default::default()
            },
        ));
        let bay = world.spawn((Subsystem::new(0, 5, SubsystemKind::Clonebay, 1), CloneBay::new()));
        let member = crew(&mut world, 1, CrewAction::Idle);
        world.get::<&mut CrewMember>(member).unwrap().health = 0.5;

        crew_system(&mut world, &table, 0, 1.0);

        assert!(!world.contains(member));
        assert_eq!(world.get::<&CloneBay>(bay).unwrap().queue.len(), 1);
    }
}
