//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! Behavior that spans entities lives in systems.

mod common;
mod hazards;
mod people;
mod ship;
mod temporal;

pub use common::*;
pub use hazards::*;
pub use people::*;
pub use ship::*;
pub use temporal::*;
