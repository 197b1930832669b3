//! Lookups by vessel and room id.

use hecs::{Entity, World};

use crate::components::{Room, RoomId, Subsystem, SubsystemKind, Vessel, VesselId};

pub fn find_vessel(world: &World, vessel_id: VesselId) -> Option<Entity> {
    world
        .query::<&Vessel>()
        .iter()
        .find(|(_, vessel)| vessel.id == vessel_id)
        .map(|(entity, _)| entity)
}

pub fn vessel_exists(world: &World, vessel_id: VesselId) -> bool {
    find_vessel(world, vessel_id).is_some()
}

pub fn find_room(world: &World, vessel_id: VesselId, room_id: RoomId) -> Option<Entity> {
    world
        .query::<&Room>()
        .iter()
        .find(|(_, room)| room.vessel_id == vessel_id && room.room_id == room_id)
        .map(|(entity, _)| entity)
}

/// First subsystem of `kind` installed on a vessel.
pub fn find_subsystem(world: &World, vessel_id: VesselId, kind: SubsystemKind) -> Option<Entity> {
    world
        .query::<&Subsystem>()
        .iter()
        .find(|(_, system)| system.vessel_id == vessel_id && system.kind == kind)
        .map(|(entity, _)| entity)
}

pub fn vessel_ids(world: &World) -> Vec<VesselId> {
    let mut ids: Vec<VesselId> = world.query::<&Vessel>().iter().map(|(_, v)| v.id).collect();
    ids.sort_unstable();
    ids
}
