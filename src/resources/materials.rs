//! Transient scene materials.
//!
//! Scenes register the materials they create at mount time in the
//! [`MaterialStore`]. Cancelling a transition or unmounting a scene disposes
//! them. Disposal failures ([`DisposeError`]) are logged and swallowed: a
//! material that refuses to go away must never take the session down.

use bevy_ecs::prelude::Resource;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::resources::sceneregistry::SceneId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisposeError {
    #[error("material '{0}' was already disposed")]
    AlreadyDisposed(String),
}

/// Material operations the choreographer relies on.
pub trait MaterialHandle: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);
    fn dispose(&mut self) -> Result<(), DisposeError>;
}

/// Headless material: a name, an opacity and a disposed flag.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMaterial {
    name: String,
    opacity: f32,
    disposed: bool,
}

impl SceneMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            disposed: false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl MaterialHandle for SceneMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn dispose(&mut self) -> Result<(), DisposeError> {
        if self.disposed {
            return Err(DisposeError::AlreadyDisposed(self.name.clone()));
        }
        self.disposed = true;
        Ok(())
    }
}

/// Materials owned by each scene, disposed as a unit.
#[derive(Resource, Default)]
pub struct MaterialStore {
    by_scene: FxHashMap<SceneId, Vec<Box<dyn MaterialHandle>>>,
    failures: u32,
}

impl MaterialStore {
    pub fn register(&mut self, scene: SceneId, material: impl MaterialHandle) {
        self.by_scene
            .entry(scene)
            .or_default()
            .push(Box::new(material));
    }

    pub fn count(&self, scene: SceneId) -> usize {
        self.by_scene.get(&scene).map_or(0, Vec::len)
    }

    /// Dispose and forget every material of `scene`.
    ///
    /// Returns how many materials were disposed cleanly. Failures are logged
    /// at `warn` and counted.
    pub fn dispose_scene(&mut self, scene: SceneId) -> usize {
        let Some(materials) = self.by_scene.remove(&scene) else {
            return 0;
        };
        let mut disposed = 0;
        for mut material in materials {
            match material.dispose() {
                Ok(()) => disposed += 1,
                Err(e) => {
                    warn!("Ignoring material disposal failure in {}: {}", scene, e);
                    self.failures += 1;
                }
            }
        }
        debug!("Disposed {} materials of {}", disposed, scene);
        disposed
    }

    /// Disposal failures swallowed so far.
    pub fn failure_count(&self) -> u32 {
        self.failures
    }
}
