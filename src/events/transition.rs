//! Transition lifecycle events and the navigation observer.
//!
//! [`TransitionStartedEvent`] fires when the engine accepts a request.
//! [`TransitionFinishedEvent`] fires exactly once per accepted request, when
//! the camera lands (`completed = true`) or the transition is cancelled
//! (`completed = false`).
//!
//! When a landed transition navigated to its target route,
//! [`observe_transition_finished`] remounts the stage onto the target scene,
//! the way a router swaps the page component after a route change.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::resources::sceneregistry::SceneId;
use crate::systems::scenehost::mount_scene;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct TransitionStartedEvent {
    pub target: SceneId,
    pub hotspot: Option<String>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct TransitionFinishedEvent {
    pub target: SceneId,
    pub hotspot: Option<String>,
    pub completed: bool,
    /// The router moved to the target route.
    pub navigated: bool,
}

/// Observer that swaps the mounted scene after a navigating transition.
pub fn observe_transition_finished(trigger: On<TransitionFinishedEvent>, mut commands: Commands) {
    let event = trigger.event();
    if !event.navigated {
        debug!(
            "Transition to {} finished without navigation (completed={})",
            event.target, event.completed
        );
        return;
    }
    let target = event.target;
    commands.queue(move |world: &mut World| {
        if let Err(e) = mount_scene(world, target) {
            warn!("Could not mount {} after navigation: {}", target, e);
        }
    });
}
