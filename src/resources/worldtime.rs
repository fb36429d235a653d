//! Simulation clock shared by every timed system.
//!
//! [`WorldTime`] is advanced once per frame by
//! [`update_world_time`](crate::systems::time::update_world_time). Transitions,
//! reveals, tweens and the loader all read `delta` from here, so a scaled
//! clock slows the whole choreography down uniformly.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Seconds simulated since the stage was created.
    pub elapsed: f32,
    /// Scaled seconds of the current frame.
    pub delta: f32,
    /// Multiplier applied to raw frame deltas.
    pub time_scale: f32,
    /// Frames simulated so far.
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
        self.time_scale = time_scale;
        self
    }
}
