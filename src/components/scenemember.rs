//! Scene membership marker component.
//!
//! Every entity spawned by the scene host carries a [`SceneMember`] naming the
//! scene it belongs to. Unmounting a scene despawns all of its members, so
//! nothing scene-scoped outlives the scene.

use bevy_ecs::prelude::Component;

use crate::resources::sceneregistry::SceneId;

/// Tag component binding an entity to the scene that spawned it.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneMember {
    pub scene: SceneId,
}
