//! Subsystem lock countdown.

use hecs::World;

use crate::components::Subsystem;

/// Count every timed lock down by `dt`. Runs before the dilation system so a
/// cooldown that expires this tick leaves the drive idle for the rest of it.
pub fn tick_locks(world: &mut World, dt: f32) {
    for (_, system) in world.query_mut::<&mut Subsystem>() {
        system.lock.tick(dt);
    }
}
