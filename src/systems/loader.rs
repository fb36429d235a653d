//! Loader sequencer system.
//!
//! Runs the launch timeline while it is in the Running state: advances its
//! clock, drives the looping camera drift, and triggers
//! [`LoaderFinishedEvent`] on the single frame the timeline ends.

use bevy_ecs::prelude::*;

use crate::events::loader::LoaderFinishedEvent;
use crate::resources::camera::SceneCamera;
use crate::resources::loader::{LoaderSequencer, LoaderState};
use crate::resources::worldtime::WorldTime;
use crate::systems::tween::{advance, sample};

pub fn loader_system(
    mut commands: Commands,
    world_time: Res<WorldTime>,
    mut loader: ResMut<LoaderSequencer>,
    mut camera: ResMut<SceneCamera>,
) {
    if loader.state() != LoaderState::Running {
        return;
    }
    let dt = world_time.delta.max(0.0);

    advance(&mut loader.drift, dt);
    let drift = sample(&loader.drift);
    camera.set_position(drift);

    if loader.tick(dt) {
        commands.trigger(LoaderFinishedEvent {});
    }
}
