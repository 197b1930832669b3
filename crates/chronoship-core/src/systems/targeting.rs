//! Turning an armed drive plus a room selection into an activation.

use chronoship_logic::{Direction, LevelPreview, LevelTable};
use hecs::World;
use serde::{Deserialize, Serialize};

use super::arming::ArmingSignal;
use super::query::find_vessel;
use super::temporal::{find_drive, start_effect};
use crate::components::{RoomId, Subsystem, Vessel, VesselId};

/// Room picked by targeting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSelection {
    OwnRoom(RoomId),
    EnemyRoom { vessel_id: VesselId, room_id: RoomId },
}

impl TargetSelection {
    fn resolve(self, acting_vessel: VesselId) -> (VesselId, RoomId) {
        match self {
            TargetSelection::OwnRoom(room_id) => (acting_vessel, room_id),
            TargetSelection::EnemyRoom { vessel_id, room_id } => (vessel_id, room_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetOutcome {
    /// No direction armed; the selection was not meant for the drive.
    NotArmed,
    Activated,
    /// The drive refused to start.
    Rejected,
    /// Enemy shields are up and the acting vessel cannot bypass them.
    ShieldBlocked,
}

/// What the targeting cursor should show while hovering a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetNotice {
    ShieldBlocked,
    Preview {
        direction: Direction,
        figures: LevelPreview,
    },
}

fn shield_blocked(world: &World, acting_vessel: VesselId, selection: TargetSelection) -> bool {
    let TargetSelection::EnemyRoom { vessel_id, .. } = selection else {
        return false;
    };
    if vessel_id == acting_vessel {
        return false;
    }
    let shields_up = find_vessel(world, vessel_id)
        .and_then(|entity| world.get::<&Vessel>(entity).ok().map(|v| v.shield_power > 0))
        .unwrap_or(false);
    let bypass = find_vessel(world, acting_vessel)
        .and_then(|entity| world.get::<&Vessel>(entity).ok().map(|v| v.shield_bypass))
        .unwrap_or(false);
    shields_up && !bypass
}

/// Resolve a room selection. While armed, exactly one activation is
/// attempted (unless shields block it) and the signal is always cleared.
pub fn resolve_target(
    world: &mut World,
    table: &LevelTable,
    arming: &mut ArmingSignal,
    acting_vessel: VesselId,
    selection: TargetSelection,
) -> TargetOutcome {
    let Some(direction) = arming.take(acting_vessel) else {
        return TargetOutcome::NotArmed;
    };

    if shield_blocked(world, acting_vessel, selection) {
        log::warn!("vessel {acting_vessel}: temporal targeting blocked by shields");
        return TargetOutcome::ShieldBlocked;
    }

    let Some(drive) = find_drive(world, acting_vessel) else {
        return TargetOutcome::Rejected;
    };
    let (vessel_id, room_id) = selection.resolve(acting_vessel);
    if start_effect(world, table, drive, vessel_id, room_id, direction) {
        TargetOutcome::Activated
    } else {
        TargetOutcome::Rejected
    }
}

/// Hover feedback for a room selection. `None` when not armed.
pub fn preview_target(
    world: &World,
    table: &LevelTable,
    arming: &ArmingSignal,
    acting_vessel: VesselId,
    selection: TargetSelection,
) -> Option<TargetNotice> {
    let direction = arming.armed_state(acting_vessel).direction()?;
    if shield_blocked(world, acting_vessel, selection) {
        return Some(TargetNotice::ShieldBlocked);
    }
    let power = find_drive(world, acting_vessel)
        .and_then(|drive| world.get::<&Subsystem>(drive).ok().map(|s| s.effective_power()))
        .unwrap_or(0);
    Some(TargetNotice::Preview {
        direction,
        figures: table.preview(power),
    })
}
