//! Vessel structure components: Vessel, Room, Subsystem, locks.

use serde::{Deserialize, Serialize};

use super::common::{RoomId, VesselId};

/// Vessel component - one entity per simulated ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    /// Charge of the full-coverage shield layer. Any charge blocks
    /// temporal targeting from other vessels.
    pub shield_power: u8,
    /// Lets this vessel's temporal drive ignore enemy shields.
    pub shield_bypass: bool,
}

impl Vessel {
    pub fn new(id: VesselId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            shield_power: 0,
            shield_bypass: false,
        }
    }

    pub fn with_shields(mut self, shield_power: u8) -> Self {
        self.shield_power = shield_power;
        self
    }

    pub fn with_shield_bypass(mut self) -> Self {
        self.shield_bypass = true;
        self
    }
}

/// Room component - a spatial subdivision of a vessel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub vessel_id: VesselId,
    pub room_id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(vessel_id: VesselId, room_id: RoomId, name: impl Into<String>) -> Self {
        Self {
            vessel_id,
            room_id,
            name: name.into(),
        }
    }
}

/// Connections to other rooms of the same vessel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomConnections {
    /// IDs of connected rooms
    pub connected_to: Vec<RoomId>,
    /// Door upgrade level; higher doors slow fire spread
    pub door_level: u8,
}

impl RoomConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, room_id: RoomId) {
        if !self.connected_to.contains(&room_id) {
            self.connected_to.push(room_id);
        }
    }

    pub fn is_connected(&self, room_id: RoomId) -> bool {
        self.connected_to.contains(&room_id)
    }
}

/// Signed dilation amount currently applied to a room (0 = none).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDilation(pub i32);

impl RoomDilation {
    pub fn visual(&self) -> DilationVisual {
        DilationVisual::from_amount(self.0)
    }
}

/// Which room overlay the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DilationVisual {
    None,
    Accelerate,
    Decelerate,
}

impl DilationVisual {
    pub fn from_amount(amount: i32) -> Self {
        match amount {
            a if a > 0 => DilationVisual::Accelerate,
            a if a < 0 => DilationVisual::Decelerate,
            _ => DilationVisual::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsystemKind {
    Oxygen,
    Shields,
    Engines,
    Piloting,
    Weapons,
    Medbay,
    Clonebay,
    Temporal,
}

/// Lock state of a subsystem. While locked the subsystem cannot be
/// activated; timed locks count down in `tick_locks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SubsystemLock {
    #[default]
    Unlocked,
    Indefinite,
    Timed(f32),
}

impl SubsystemLock {
    pub fn is_locked(&self) -> bool {
        !matches!(self, SubsystemLock::Unlocked)
    }

    /// Remaining ticks of a timed lock.
    pub fn remaining(&self) -> Option<f32> {
        match self {
            SubsystemLock::Timed(remaining) => Some(*remaining),
            _ => None,
        }
    }

    /// Count a timed lock down by `dt`. Indefinite locks are unaffected.
    pub fn tick(&mut self, dt: f32) {
        if let SubsystemLock::Timed(remaining) = self {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *self = SubsystemLock::Unlocked;
            }
        }
    }
}

/// Subsystem component (oxygen, shields, temporal drive, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsystem {
    pub vessel_id: VesselId,
    pub room_id: RoomId,
    pub kind: SubsystemKind,
    /// Installed power bars
    pub capacity: u8,
    /// Bars currently powered
    pub power: u8,
    /// Bars lost to damage
    pub damage: u8,
    /// Fractional damage accumulated toward the next lost bar
    pub damage_progress: f32,
    /// Hostile hacking level; above 1 the subsystem is disabled
    pub hack_level: u8,
    /// Whether the subsystem is currently being attacked by a hacking drone
    pub under_attack: bool,
    pub lock: SubsystemLock,
}

impl Subsystem {
    pub fn new(vessel_id: VesselId, room_id: RoomId, kind: SubsystemKind, capacity: u8) -> Self {
        Self {
            vessel_id,
            room_id,
            kind,
            capacity,
            power: capacity,
            damage: 0,
            damage_progress: 0.0,
            hack_level: 0,
            under_attack: false,
            lock: SubsystemLock::Unlocked,
        }
    }

    /// Powered bars that are not damaged.
    pub fn effective_power(&self) -> i32 {
        i32::from(self.power.min(self.capacity.saturating_sub(self.damage)))
    }

    pub fn functioning(&self) -> bool {
        self.effective_power() > 0
    }

    pub fn disabled(&self) -> bool {
        self.hack_level > 1
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn lock_indefinitely(&mut self) {
        self.lock = SubsystemLock::Indefinite;
    }

    /// Lock for a number of ticks; zero or less unlocks immediately.
    pub fn lock_for(&mut self, ticks: i32) {
        self.lock = if ticks > 0 {
            SubsystemLock::Timed(ticks as f32)
        } else {
            SubsystemLock::Unlocked
        };
    }

    pub fn set_power(&mut self, power: u8) {
        self.power = power.min(self.capacity);
    }

    /// Accumulate fractional damage; every whole point costs one bar.
    /// Returns the number of bars lost.
    pub fn accumulate_damage(&mut self, amount: f32) -> u8 {
        if amount <= 0.0 || self.damage >= self.capacity {
            return 0;
        }
        self.damage_progress += amount;
        let mut lost = 0;
        while self.damage_progress >= 1.0 && self.damage < self.capacity {
            self.damage_progress -= 1.0;
            self.damage += 1;
            lost += 1;
        }
        if self.damage >= self.capacity {
            self.damage_progress = 0.0;
        }
        lost
    }

    /// Repair one damaged bar. Returns false if nothing was damaged.
    pub fn repair_bar(&mut self) -> bool {
        if self.damage == 0 {
            self.damage_progress = 0.0;
            return false;
        }
        self.damage -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_power_limited_by_damage() {
        let mut system = Subsystem::new(0, 1, SubsystemKind::Temporal, 3);
        assert_eq!(system.effective_power(), 3);
        system.damage = 2;
        assert_eq!(system.effective_power(), 1);
        system.damage = 3;
        assert!(!system.functioning());
    }

    #[test]
    fn test_lock_for_zero_unlocks() {
        let mut system = Subsystem::new(0, 1, SubsystemKind::Temporal, 2);
        system.lock_indefinitely();
        assert!(system.is_locked());
        system.lock_for(0);
        assert_eq!(system.lock, SubsystemLock::Unlocked);
    }

    #[test]
    fn test_timed_lock_counts_down() {
        let mut lock = SubsystemLock::Timed(2.0);
        lock.tick(1.0);
        assert_eq!(lock.remaining(), Some(1.0));
        lock.tick(1.0);
        assert!(!lock.is_locked());

        let mut forever = SubsystemLock::Indefinite;
        forever.tick(100.0);
        assert!(forever.is_locked());
    }

    #[test]
    fn test_damage_accumulates_into_bars() {
        let mut system = Subsystem::new(0, 1, SubsystemKind::Oxygen, 2);
        assert_eq!(system.accumulate_damage(0.6), 0);
        assert_eq!(system.accumulate_damage(0.6), 1);
        assert_eq!(system.damage, 1);
        assert_eq!(system.accumulate_damage(5.0), 1);
        assert_eq!(system.damage, 2);
        assert_eq!(system.accumulate_damage(1.0), 0);
        assert!(system.repair_bar());
        assert_eq!(system.damage, 1);
    }

    #[test]
    fn test_dilation_visual() {
        assert_eq!(RoomDilation(2).visual(), DilationVisual::Accelerate);
        assert_eq!(RoomDilation(-1).visual(), DilationVisual::Decelerate);
        assert_eq!(RoomDilation(0).visual(), DilationVisual::None);
    }
}
