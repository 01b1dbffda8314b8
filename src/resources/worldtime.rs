//! Frame clock.
//!
//! Scenes, transitions and the cog animation all read their step from
//! [`WorldTime::delta`], which [`update_world_time`](crate::systems::time::update_world_time)
//! refreshes at the start of every frame.

use bevy_ecs::prelude::Resource;

/// Longest step a single frame may take, in seconds. A stalled frontend
/// (debugger, window drag) would otherwise finish a fade or a move in one
/// frame.
pub const MAX_FRAME_DELTA: f32 = 0.25;

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    /// Scaled seconds since start.
    pub elapsed: f32,
    /// Scaled seconds of the current frame.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }

    /// Start a new frame of `dt` unscaled seconds.
    pub fn tick(&mut self, dt: f32) {
        let step = dt.clamp(0.0, MAX_FRAME_DELTA) * self.time_scale;
        self.delta = step;
        self.elapsed += step;
        self.frame_count += 1;
    }
}
