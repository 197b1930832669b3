//! Temporal drive state machine - activation, per-tick upkeep, shutdown.
//!
//! A drive is idle until `start_effect` succeeds, active until its timer
//! runs out or a stop condition fires, then cools down under a timed lock
//! on its own subsystem. While active the subsystem is locked indefinitely.

use chronoship_logic::{Direction, LevelTable};
use hecs::{Entity, World};

use super::query::{find_room, find_subsystem, vessel_exists};
use crate::components::{
    DilationTarget, RoomDilation, RoomId, Subsystem, SubsystemKind, TemporalDrive, VesselId,
};

/// The drive entity of a vessel (the entity carrying both its temporal
/// `Subsystem` and `TemporalDrive`).
pub fn find_drive(world: &World, vessel_id: VesselId) -> Option<Entity> {
    world
        .query::<(&Subsystem, &TemporalDrive)>()
        .iter()
        .find(|(_, (system, _))| system.vessel_id == vessel_id)
        .map(|(entity, _)| entity)
}

/// Try to start an effect on a room. Returns whether the drive activated.
///
/// Rejected without any change when the subsystem is locked or not
/// functioning, the drive is already active, or the room does not resolve.
pub fn start_effect(
    world: &mut World,
    table: &LevelTable,
    drive: Entity,
    target_vessel: VesselId,
    room_id: RoomId,
    direction: Direction,
) -> bool {
    let (power, owner) = {
        let (Ok(system), Ok(state)) = (
            world.get::<&Subsystem>(drive),
            world.get::<&TemporalDrive>(drive),
        ) else {
            return false;
        };
        let owner = system.vessel_id;
        if system.is_locked() {
            log::debug!("vessel {owner}: temporal start rejected, subsystem locked");
            return false;
        }
        if !system.functioning() {
            log::debug!("vessel {owner}: temporal start rejected, subsystem not functioning");
            return false;
        }
        if state.active {
            log::debug!("vessel {owner}: temporal start rejected, effect already running");
            return false;
        }
        (system.effective_power(), owner)
    };

    if !vessel_exists(world, target_vessel) {
        log::debug!("vessel {owner}: temporal start rejected, vessel {target_vessel} not found");
        return false;
    }
    let Some(room) = find_room(world, target_vessel, room_id) else {
        log::debug!(
            "vessel {owner}: temporal start rejected, no room {room_id} on vessel {target_vessel}"
        );
        return false;
    };

    let signed = direction.signed(power);
    let duration = table.duration(signed);
    if world.insert_one(room, RoomDilation(signed)).is_err() {
        return false;
    }
    if let Ok(mut system) = world.get::<&mut Subsystem>(drive) {
        system.lock_indefinitely();
    }
    if let Ok(mut state) = world.get::<&mut TemporalDrive>(drive) {
        let target = DilationTarget {
            vessel_id: target_vessel,
            room_id,
        };
        state.activate(direction, power, target, duration);
    }

    log::info!(
        "vessel {owner}: temporal {direction:?} level {power} on vessel {target_vessel} \
         room {room_id} for {duration} ticks"
    );
    true
}

/// End the running effect, clear its room and start the cooldown lock.
/// Does nothing while idle.
pub fn stop_effect(world: &mut World, table: &LevelTable, drive: Entity) {
    let (signed, target) = {
        let Ok(mut state) = world.get::<&mut TemporalDrive>(drive) else {
            return;
        };
        if !state.active {
            return;
        }
        let stopped = (state.signed_level(), state.target);
        state.clear();
        stopped
    };

    if let Some(target) = target {
        if let Some(room) = find_room(world, target.vessel_id, target.room_id) {
            if let Ok(mut dilation) = world.get::<&mut RoomDilation>(room) {
                dilation.0 = 0;
            }
        }
    }

    let cooldown = table.cooldown(signed);
    if let Ok(mut system) = world.get::<&mut Subsystem>(drive) {
        system.lock_for(cooldown);
        log::info!("vessel {}: temporal effect ended, cooldown {cooldown} ticks", system.vessel_id);
    }
}

/// Per-tick upkeep for every drive. Must run before any consumer batch
/// snapshots room values for the tick.
pub fn dilation_system(world: &mut World, table: &LevelTable, dt: f32) {
    let drives: Vec<Entity> = world
        .query::<(&Subsystem, &TemporalDrive)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for drive in drives {
        update_drive(world, table, drive, dt);
    }
}

fn update_drive(world: &mut World, table: &LevelTable, drive: Entity, dt: f32) {
    let (must_stop, power) = {
        let (Ok(system), Ok(state)) = (
            world.get::<&Subsystem>(drive),
            world.get::<&TemporalDrive>(drive),
        ) else {
            return;
        };
        let owner_lost = !vessel_exists(world, system.vessel_id);
        let target_lost = match state.target {
            Some(target) => !vessel_exists(world, target.vessel_id),
            None => true,
        };
        let hacked = system.disabled() && system.under_attack;
        let must_stop = !system.functioning() || hacked || owner_lost || target_lost;
        (must_stop, system.effective_power())
    };

    if must_stop {
        stop_effect(world, table, drive);
    }

    let (target, signed, done) = {
        let Ok(mut state) = world.get::<&mut TemporalDrive>(drive) else {
            return;
        };
        if !state.active {
            return;
        }
        // Duration follows live power; the room keeps the activation snapshot.
        let goal = table.duration(state.direction.signed(power));
        state.timer.set_goal(goal as f32);
        state.timer.update(dt);
        (state.target, state.signed_level(), state.timer.done())
    };

    if let Some(target) = target {
        if let Some(room) = find_room(world, target.vessel_id, target.room_id) {
            if let Ok(mut dilation) = world.get::<&mut RoomDilation>(room) {
                dilation.0 = signed;
            }
        }
    }

    if done {
        stop_effect(world, table, drive);
    }
}

fn reset_lock(world: &mut World, vessel_id: VesselId) {
    if let Some(entity) = find_subsystem(world, vessel_id, SubsystemKind::Temporal) {
        if let Ok(mut system) = world.get::<&mut Subsystem>(entity) {
            system.lock_for(0);
        }
    }
}

/// Jump arrival hook: the drive is ready again on arrival.
pub fn on_jump_arrive(world: &mut World, vessel_id: VesselId) {
    reset_lock(world, vessel_id);
}

/// Jump departure hook.
pub fn on_jump_leave(world: &mut World, vessel_id: VesselId) {
    reset_lock(world, vessel_id);
}

/// Remaining share of the running effect for a vessel's drive.
pub fn charge_fraction(world: &World, vessel_id: VesselId) -> Option<f32> {
    let drive = find_drive(world, vessel_id)?;
    let state = world.get::<&TemporalDrive>(drive).ok()?;
    state.charge_fraction()
}

/// Stored dilation value of a room (0 when the room does not resolve).
pub fn room_dilation(world: &World, vessel_id: VesselId, room_id: RoomId) -> i32 {
    find_room(world, vessel_id, room_id)
        .and_then(|room| world.get::<&RoomDilation>(room).ok().map(|d| d.0))
        .unwrap_or(0)
}
