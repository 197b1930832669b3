//! Systems - logic that operates on components

mod arming;
mod atmosphere;
mod clone;
mod crew;
mod damage;
mod fire;
mod locks;
mod query;
mod targeting;
mod temporal;

pub use arming::*;
pub use atmosphere::*;
pub use clone::*;
pub use crew::*;
pub use damage::*;
pub use fire::*;
pub use locks::*;
pub use query::*;
pub use targeting::*;
pub use temporal::*;
