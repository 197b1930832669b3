//! Atmosphere batch: oxygen refill, breach loss and exchange per room.

use std::collections::HashMap;

use chronoship_logic::atmosphere::{
    atmo_constants, compute_air_loss, exchange_flow, modify_room_oxygen, refill_amount,
    RoomAtmosphere,
};
use chronoship_logic::LevelTable;
use hecs::{Entity, World};

use super::query::find_subsystem;
use crate::components::{Room, RoomConnections, RoomId, Subsystem, SubsystemKind, VesselId};
use crate::propagation::PropagationBus;

/// Update every room of one vessel. Each room's refill, breach loss and
/// exchange share are scaled by that room's dilation multiplier.
pub fn atmosphere_system(world: &mut World, table: &LevelTable, vessel_id: VesselId, dt: f32) {
    let bus = PropagationBus::for_vessel(table, world, vessel_id, dt);

    let refill_power = find_subsystem(world, vessel_id, SubsystemKind::Oxygen)
        .and_then(|entity| world.get::<&Subsystem>(entity).ok().map(|s| s.effective_power()))
        .unwrap_or(0);

    let snapshot: HashMap<RoomId, RoomAtmosphere> = world
        .query::<(&Room, &RoomAtmosphere)>()
        .iter()
        .filter(|(_, (room, _))| room.vessel_id == vessel_id)
        .map(|(_, (room, atmo))| (room.room_id, *atmo))
        .collect();

    // Net inflow from neighbours, computed from the pre-tick snapshot so
    // update order does not matter.
    let mut updates: Vec<(Entity, RoomId, f32)> = Vec::new();
    for (entity, (room, atmo, connections)) in world
        .query::<(&Room, &RoomAtmosphere, Option<&RoomConnections>)>()
        .iter()
    {
        if room.vessel_id != vessel_id {
            continue;
        }
        let inflow: f32 = connections
            .map(|c| {
                c.connected_to
                    .iter()
                    .filter_map(|other| snapshot.get(other))
                    .map(|other| exchange_flow(atmo, other, dt))
                    .sum::<f32>()
            })
            .unwrap_or(0.0);
        updates.push((entity, room.room_id, inflow));
    }

    for (entity, room_id, inflow) in updates {
        let multiplier = bus.room_multiplier(room_id);
        if let Ok(mut atmo) = world.get::<&mut RoomAtmosphere>(entity) {
            modify_room_oxygen(&mut atmo, refill_amount(refill_power, dt) * multiplier);
            compute_air_loss(&mut atmo, atmo_constants::BREACH_LOSS * dt * multiplier);
            modify_room_oxygen(&mut atmo, inflow * multiplier);
        }
    }
}
