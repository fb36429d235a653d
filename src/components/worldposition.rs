use bevy_ecs::prelude::Component;
use glam::Vec3;

/// World-space position of a scene entity (hotspot anchors, labels).
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct WorldPosition {
    pub pos: Vec3,
}

impl WorldPosition {
    pub fn new(pos: Vec3) -> Self {
        Self { pos }
    }
}
