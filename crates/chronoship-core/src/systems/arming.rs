//! Arming signal: which direction each vessel's drive is waiting to fire.

use std::collections::HashMap;

use chronoship_logic::Direction;
use hecs::World;
use serde::{Deserialize, Serialize};

use super::temporal::find_drive;
use crate::components::{Subsystem, TemporalDrive, VesselId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmState {
    #[default]
    None,
    Accelerate,
    Decelerate,
}

impl ArmState {
    pub fn direction(self) -> Option<Direction> {
        match self {
            ArmState::None => None,
            ArmState::Accelerate => Some(Direction::Accelerate),
            ArmState::Decelerate => Some(Direction::Decelerate),
        }
    }
}

impl From<Direction> for ArmState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Accelerate => ArmState::Accelerate,
            Direction::Decelerate => ArmState::Decelerate,
        }
    }
}

/// Armed direction per vessel. A vessel with no entry is not armed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmingSignal {
    armed: HashMap<VesselId, Direction>,
}

impl ArmingSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a vessel's drive. Only a ready drive (installed, unlocked, idle)
    /// can be armed; otherwise nothing changes.
    pub fn arm(&mut self, world: &World, vessel_id: VesselId, direction: Direction) -> bool {
        let Some(drive) = find_drive(world, vessel_id) else {
            return false;
        };
        let ready = match (world.get::<&Subsystem>(drive), world.get::<&TemporalDrive>(drive)) {
            (Ok(system), Ok(state)) => !system.is_locked() && !state.active,
            _ => false,
        };
        if !ready {
            log::debug!("vessel {vessel_id}: cannot arm temporal drive, not ready");
            return false;
        }
        self.armed.insert(vessel_id, direction);
        true
    }

    pub fn armed_state(&self, vessel_id: VesselId) -> ArmState {
        self.armed
            .get(&vessel_id)
            .map_or(ArmState::None, |&direction| ArmState::from(direction))
    }

    pub fn disarm(&mut self, vessel_id: VesselId) {
        self.armed.remove(&vessel_id);
    }

    /// Whether any aiming is in progress for a vessel, so targeting input
    /// stays live.
    pub fn any_armed(&self, vessel_id: VesselId) -> bool {
        self.armed.contains_key(&vessel_id)
    }

    /// Take the armed direction, leaving the vessel disarmed.
    pub(crate) fn take(&mut self, vessel_id: VesselId) -> Option<Direction> {
        self.armed.remove(&vessel_id)
    }
}
