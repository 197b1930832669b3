//! Pure time-dilation logic for Chronoship.
//!
//! This crate contains the logic of the temporal drive that is independent
//! of any ECS or engine. Functions take plain data and return results, so
//! they are unit-testable and shared between the simulation core and the
//! headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`atmosphere`] | Per-room oxygen refill, breach loss, exchange, hazards |
//! | [`config`] | Level document parsing (`speed` / `slow` sections) |
//! | [`levels`] | Directions, level table, analytic fallbacks, previews |
//! | [`timer`] | Countdown timer with a goal re-read every tick |

pub mod atmosphere;
pub mod config;
pub mod levels;
pub mod timer;

pub use config::LevelConfigError;
pub use levels::{Direction, LevelPreview, LevelRecord, LevelTable, TemporalLevel};
pub use timer::CountdownTimer;
