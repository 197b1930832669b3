//! Chronoship Core - Time Dilation Simulation Engine
//!
//! An ECS-based simulation of vessels whose temporal drive can speed up or
//! slow down time inside a single room. The effect lasts for a duration taken
//! from the level table, locks the drive for a cooldown afterward, and is
//! propagated as a multiplier into every per-tick process in the room:
//! oxygen, fire, subsystem damage, crew work and cloning.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Vessels, rooms, subsystems, crew, fires
//! - **Components**: Pure data attached to entities (Room, Subsystem, TemporalDrive, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! # Example
//!
//! ```rust,no_run
//! use chronoship_core::prelude::*;
//! use chronoship_logic::{Direction, LevelTable};
//!
//! let levels = LevelTable::builtin().unwrap_or_default();
//! let mut engine = SimulationEngine::with_levels(levels);
//! engine.spawn_vessel(Vessel::new(0, "Kestrel"));
//! engine.spawn_room(0, 1, "Bridge");
//! engine.spawn_subsystem(0, 1, SubsystemKind::Temporal, 2);
//!
//! engine.arm(0, Direction::Accelerate);
//! engine.select_target(0, TargetSelection::OwnRoom(1));
//!
//! loop {
//!     engine.update(1.0 / 60.0);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod propagation;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::SimulationEngine;
    pub use crate::propagation::{DilationScope, PropagationBus, RoomDilationMap};
    pub use crate::systems::{ArmState, ArmingSignal, TargetNotice, TargetOutcome, TargetSelection};
}
