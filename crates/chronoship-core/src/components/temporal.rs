//! Temporal drive state, attached to the entity carrying the vessel's
//! `Subsystem { kind: Temporal }`.

use chronoship_logic::{CountdownTimer, Direction};
use serde::{Deserialize, Serialize};

use super::common::{RoomId, VesselId};

/// Room currently held by an active effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilationTarget {
    pub vessel_id: VesselId,
    pub room_id: RoomId,
}

/// Per-drive dilation state machine.
///
/// Idle while `active` is false. `power_level` is the effective power
/// captured at activation and never changes while the effect runs; the
/// room value written at activation is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalDrive {
    pub active: bool,
    pub direction: Direction,
    pub power_level: i32,
    pub timer: CountdownTimer,
    pub target: Option<DilationTarget>,
}

impl Default for TemporalDrive {
    fn default() -> Self {
        Self {
            active: false,
            direction: Direction::Accelerate,
            power_level: 0,
            timer: CountdownTimer::new(),
            target: None,
        }
    }
}

impl TemporalDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed level of the running effect (0 when idle).
    pub fn signed_level(&self) -> i32 {
        self.direction.signed(self.power_level)
    }

    pub(crate) fn activate(
        &mut self,
        direction: Direction,
        power_level: i32,
        target: DilationTarget,
        duration: i32,
    ) {
        self.active = true;
        self.direction = direction;
        self.power_level = power_level;
        self.target = Some(target);
        self.timer.start(duration as f32);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fraction of the effect still remaining, for the drive's charge bar.
    pub fn charge_fraction(&self) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.timer.remaining_fraction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_drive() {
        let drive = TemporalDrive::new();
        assert!(!drive.active);
        assert_eq!(drive.signed_level(), 0);
        assert_eq!(drive.charge_fraction(), None);
    }

    #[test]
    fn test_activate_and_clear() {
        let mut drive = TemporalDrive::new();
        let target = DilationTarget { vessel_id: 1, room_id: 4 };
        drive.activate(Direction::Decelerate, 2, target, 12);
        assert!(drive.active);
        assert_eq!(drive.signed_level(), -2);
        assert_eq!(drive.timer.goal, 12.0);
        assert_eq!(drive.charge_fraction(), Some(1.0));

        drive.timer.update(3.0);
        assert_eq!(drive.charge_fraction(), Some(0.75));

        drive.clear();
        assert!(!drive.active);
        assert_eq!(drive.target, None);
        assert!(!drive.timer.running);
    }
}
