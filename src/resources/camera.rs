//! Scene camera capability.
//!
//! The choreographer never talks to a renderer directly. It drives a
//! [`CameraHandle`], the narrow set of camera operations it needs, stored in
//! the [`SceneCamera`] resource. [`PerspectiveCamera`] is the headless
//! default; a renderer integration supplies its own handle.

use std::ops::{Deref, DerefMut};

use bevy_ecs::prelude::Resource;
use glam::Vec3;

/// Camera operations used by transitions and the loader drift.
pub trait CameraHandle: Send + Sync + 'static {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    /// Re-aim the camera at a world-space point.
    fn look_at(&mut self, target: Vec3);
    /// Unit view direction.
    fn forward(&self) -> Vec3;
}

/// Plain perspective camera state.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub forward: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            fov: 75.0,
        }
    }
}

impl CameraHandle for PerspectiveCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn look_at(&mut self, target: Vec3) {
        // looking at our own position keeps the previous heading
        let dir = (target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.forward = dir;
        }
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }
}

/// Resource wrapping the active camera handle.
#[derive(Resource)]
pub struct SceneCamera(pub Box<dyn CameraHandle>);

impl SceneCamera {
    pub fn new(handle: impl CameraHandle) -> Self {
        Self(Box::new(handle))
    }

    pub fn handle_mut(&mut self) -> &mut dyn CameraHandle {
        self.0.as_mut()
    }
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::new(PerspectiveCamera::default())
    }
}

impl Deref for SceneCamera {
    type Target = dyn CameraHandle;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for SceneCamera {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
