//! Per-room oxygen simulation: refill, breach loss, exchange and hazards.
//!
//! Oxygen is tracked as a percentage per room. The oxygen subsystem refills
//! rooms, hull breaches drain them, and unsealed connections let oxygen
//! flow between neighbours. Every per-tick amount passes through a single entry
//! point (`modify_room_oxygen` / `compute_air_loss`) so callers can scale it.

use serde::{Deserialize, Serialize};

/// Oxygen state for a single room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomAtmosphere {
    /// Oxygen level in percent (0 = vacuum, 100 = full).
    pub oxygen: f32,
    /// Whether the hull in this room is breached.
    pub breached: bool,
    /// Whether the room's doors are sealed (no exchange with neighbours).
    pub sealed: bool,
}

impl Default for RoomAtmosphere {
    fn default() -> Self {
        Self {
            oxygen: atmo_constants::FULL_OXYGEN,
            breached: false,
            sealed: false,
        }
    }
}

/// Atmospheric danger levels for crew safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtmosphereHazard {
    Safe,
    Warning,
    Lethal,
}

pub mod atmo_constants {
    pub const FULL_OXYGEN: f32 = 100.0;
    /// Below this crew start taking damage.
    pub const LOW_OXYGEN: f32 = 25.0;
    /// Below this fires cannot keep burning.
    pub const FIRE_MIN_OXYGEN: f32 = 10.0;
    /// Refill per tick per point of oxygen-subsystem power.
    pub const REFILL_PER_POWER: f32 = 1.2;
    /// Loss per tick through a hull breach.
    pub const BREACH_LOSS: f32 = 6.0;
    /// Oxygen burned per tick by a fire at full strength.
    pub const FIRE_OXYGEN_DRAW: f32 = 1.5;
    /// Fraction of the difference exchanged per tick between connected rooms.
    pub const EXCHANGE_RATE: f32 = 0.05;
    /// Crew health lost per tick in a room below `LOW_OXYGEN`.
    pub const SUFFOCATION_DAMAGE: f32 = 0.4;
}

/// Apply a signed oxygen change to a room, clamped to [0, 100].
pub fn modify_room_oxygen(atmo: &mut RoomAtmosphere, amount: f32) {
    atmo.oxygen = (atmo.oxygen + amount).clamp(0.0, atmo_constants::FULL_OXYGEN);
}

/// Drain oxygen through a breach. `amount` is the positive loss.
pub fn compute_air_loss(atmo: &mut RoomAtmosphere, amount: f32) {
    if atmo.breached {
        modify_room_oxygen(atmo, -amount);
    }
}

/// Native refill for one tick given the oxygen subsystem's effective power.
pub fn refill_amount(effective_power: i32, dt: f32) -> f32 {
    atmo_constants::REFILL_PER_POWER * effective_power.max(0) as f32 * dt
}

/// Oxygen that flows into `a` from `b` over one tick (negative when `a`
/// loses oxygen). Sealed rooms exchange nothing.
pub fn exchange_flow(a: &RoomAtmosphere, b: &RoomAtmosphere, dt: f32) -> f32 {
    if a.sealed || b.sealed {
        return 0.0;
    }
    (b.oxygen - a.oxygen) * atmo_constants::EXCHANGE_RATE * dt
}

pub fn assess_hazard(atmo: &RoomAtmosphere) -> AtmosphereHazard {
    if atmo.oxygen <= 0.0 {
        AtmosphereHazard::Lethal
    } else if atmo.oxygen < atmo_constants::LOW_OXYGEN {
        AtmosphereHazard::Warning
    } else {
        AtmosphereHazard::Safe
    }
}

/// Crew health damage per tick from the room's atmosphere.
pub fn suffocation_damage(atmo: &RoomAtmosphere) -> f32 {
    match assess_hazard(atmo) {
        AtmosphereHazard::Safe => 0.0,
        AtmosphereHazard::Warning => atmo_constants::SUFFOCATION_DAMAGE,
        AtmosphereHazard::Lethal => atmo_constants::SUFFOCATION_DAMAGE * 2.0,
    }
}

/// Whether a fire can keep burning in this room.
pub fn supports_fire(atmo: &RoomAtmosphere) -> bool {
    atmo.oxygen >= atmo_constants::FIRE_MIN_OXYGEN
}
