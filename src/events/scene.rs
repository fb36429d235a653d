//! Scene mount/unmount events.
//!
//! [`SceneMountedEvent`] is the explicit "scene is ready" signal: it fires
//! after the scene host has spawned the scene's entities and placed the
//! camera. [`observe_scene_mounted`] answers it by starting the scene's
//! entry transition from its camera start to its camera end.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::resources::sceneregistry::SceneId;
use crate::resources::transitionstate::TransitionError;
use crate::systems::transition::{TransitionEngine, TransitionOrder};

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneMountedEvent {
    pub scene: SceneId,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneUnmountedEvent {
    pub scene: SceneId,
}

/// Observer that plays the entry transition of a freshly mounted scene.
pub fn observe_scene_mounted(trigger: On<SceneMountedEvent>, mut engine: TransitionEngine) {
    let scene = trigger.event().scene;
    let start = match engine.registry.get(scene) {
        Ok(def) => def.camera_start,
        Err(e) => {
            warn!("Mounted scene has no definition: {}", e);
            return;
        }
    };
    match engine.request(TransitionOrder::new(scene, start)) {
        Ok(_) => debug!("Entry transition of {} started", scene),
        Err(e @ TransitionError::AlreadyInFlight(_)) => debug!("No entry transition for {}: {}", scene, e),
        Err(e) => warn!("No entry transition for {}: {}", scene, e),
    }
}
