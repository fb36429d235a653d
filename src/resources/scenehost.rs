//! Scene host resource.
//!
//! Tracks which scene is mounted and which scene a visit enters on once the
//! loader is done. Mounting and unmounting live in
//! [`crate::systems::scenehost`].

use bevy_ecs::prelude::Resource;

use crate::resources::sceneregistry::SceneId;

#[derive(Resource, Debug, Default, Clone)]
pub struct SceneHost {
    mounted: Option<SceneId>,
    mounts: u32,
    entry: SceneId,
}

impl SceneHost {
    pub fn with_entry(entry: SceneId) -> Self {
        Self {
            entry,
            ..Self::default()
        }
    }

    /// Scene mounted when a session starts.
    pub fn entry(&self) -> SceneId {
        self.entry
    }

    pub fn mounted(&self) -> Option<SceneId> {
        self.mounted
    }

    /// Scenes mounted since the stage was created.
    pub fn mount_count(&self) -> u32 {
        self.mounts
    }

    pub(crate) fn set_mounted(&mut self, scene: SceneId) {
        self.mounted = Some(scene);
        self.mounts += 1;
    }

    pub(crate) fn clear(&mut self) -> Option<SceneId> {
        self.mounted.take()
    }
}
