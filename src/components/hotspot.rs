//! Clickable hotspot component.
//!
//! A [`Hotspot`] is spawned by the scene host for every hotspot binding of the
//! mounted scene. Activation by id is resolved against these entities by
//! [`crate::events::hotspot::observe_hotspot_activated`].

use bevy_ecs::prelude::Component;

use crate::resources::sceneregistry::SceneId;

/// A named, clickable anchor that routes to another scene.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Hotspot {
    /// Identifier used by activation requests (e.g. `"about"`, `"spaceship"`).
    pub id: String,
    /// Scene the hotspot navigates to.
    pub target: SceneId,
}

impl Hotspot {
    pub fn new(id: impl Into<String>, target: SceneId) -> Self {
        Self {
            id: id.into(),
            target,
        }
    }
}
