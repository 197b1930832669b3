//! Environmental hazards: fires burning in rooms.

use serde::{Deserialize, Serialize};

use super::common::{RoomId, VesselId};

pub mod fire_constants {
    /// Seconds of oxygen starvation before a fire goes out.
    pub const DEATH_TIME: f32 = 5.0;
    /// Seconds of burning before a fire tries to spread through a door.
    pub const SPREAD_TIME: f32 = 12.0;
    /// Strength a fire regains per second while it has oxygen.
    pub const GROWTH: f32 = 5.0;
    pub const MAX_STRENGTH: f32 = 100.0;
    /// Subsystem damage per second from a fire in its room.
    pub const SYSTEM_DAMAGE: f32 = 0.1;
    /// Subsystem damage per second from a hull breach in its room.
    pub const BREACH_SYSTEM_DAMAGE: f32 = 0.05;
    /// Crew health lost per second while standing in a fire.
    pub const CREW_DAMAGE: f32 = 2.0;
}

/// A fire burning in one room. At most one per room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fire {
    pub vessel_id: VesselId,
    pub room_id: RoomId,
    pub strength: f32,
    /// Time spent without enough oxygen to burn
    pub death_timer: f32,
    /// Time spent burning toward the next spread attempt
    pub start_timer: f32,
}

impl Fire {
    pub fn new(vessel_id: VesselId, room_id: RoomId) -> Self {
        Self {
            vessel_id,
            room_id,
            strength: fire_constants::MAX_STRENGTH,
            death_timer: 0.0,
            start_timer: 0.0,
        }
    }

    pub fn is_out(&self) -> bool {
        self.strength <= 0.0 || self.death_timer >= fire_constants::DEATH_TIME
    }

    /// Advance starvation. Connected fires feed each other and slow it.
    pub fn starve(&mut self, dt: f32, connected_fires: usize) {
        self.death_timer += dt / (1 + connected_fires) as f32;
    }

    pub fn feed(&mut self, dt: f32) {
        self.death_timer = 0.0;
        self.strength =
            (self.strength + fire_constants::GROWTH * dt).min(fire_constants::MAX_STRENGTH);
    }

    /// Advance the spread timer. Better doors slow spread. Returns true
    /// when the fire is ready to jump and resets the timer.
    pub fn advance_spread(&mut self, dt: f32, door_level: u8) -> bool {
        self.start_timer += dt / (1.0 + f32::from(door_level));
        if self.start_timer >= fire_constants::SPREAD_TIME {
            self.start_timer = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_starves_out() {
        let mut fire = Fire::new(0, 1);
        fire.starve(fire_constants::DEATH_TIME, 0);
        assert!(fire.is_out());
    }

    #[test]
    fn test_connected_fires_slow_death() {
        let mut fire = Fire::new(0, 1);
        fire.starve(fire_constants::DEATH_TIME, 1);
        assert!(!fire.is_out());
        fire.feed(1.0);
        assert_eq!(fire.death_timer, 0.0);
    }

    #[test]
    fn test_spread_slowed_by_doors() {
        let mut open = Fire::new(0, 1);
        let mut blast = Fire::new(0, 1);
        assert!(open.advance_spread(fire_constants::SPREAD_TIME, 0));
        assert!(!blast.advance_spread(fire_constants::SPREAD_TIME, 1));
        assert_eq!(open.start_timer, 0.0);
    }
}
