//! Frame clock update.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the [`WorldTime`] resource by one frame of `dt` seconds.
///
/// Must run before the scene manager so every consumer of
/// [`WorldTime::delta`] sees the same step.
pub fn update_world_time(world: &mut World, dt: f32) {
    if let Some(mut clock) = world.get_resource_mut::<WorldTime>() {
        clock.tick(dt);
    }
}
