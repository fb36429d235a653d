//! Reveal group component.
//!
//! A [`RevealGroup`] is the ordered set of a scene's dependent visuals (the
//! scene bodies dropping into place, project cards fading in) that only
//! appear once the camera is close to landing. The scene host spawns one per
//! mounted scene; it stays dormant, showing every element at its `from_*`
//! values, until a transition into its scene arms it.
//!
//! Arming assigns each element its start offset relative to transition
//! start: its own `start_at` when the layout fixes one, otherwise
//! `base + i * stagger` in insertion order. The reveal system then
//! runs the group's clock forward and eases every element into place.
//!
//! # Related
//! - [`crate::systems::reveal`] – advances armed groups
//! - [`crate::systems::transition::arm_late_reveal_groups`] – arms groups
//!   spawned after their transition began

use bevy_ecs::prelude::Component;
use glam::Vec3;
use smallvec::SmallVec;

use crate::resources::sceneregistry::{RevealSpec, SceneId};

/// One element of a reveal group with its live animated values.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealElement {
    pub spec: RevealSpec,
    /// Seconds after transition start at which this element begins; `None`
    /// while the group is dormant.
    pub start_offset: Option<f32>,
    pub opacity: f32,
    /// Displacement from the element's rest position.
    pub offset: Vec3,
    pub scale: f32,
}

impl RevealElement {
    pub fn new(spec: RevealSpec) -> Self {
        Self {
            opacity: spec.from_opacity,
            offset: spec.from_offset,
            scale: spec.from_scale,
            start_offset: None,
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Put the element back at its starting values.
    pub fn rewind(&mut self) {
        self.opacity = self.spec.from_opacity;
        self.offset = self.spec.from_offset;
        self.scale = self.spec.from_scale;
    }

    /// True once the element sits at its final values.
    pub fn is_revealed(&self) -> bool {
        self.opacity == self.spec.to_opacity
            && self.offset == Vec3::ZERO
            && self.scale == self.spec.to_scale
    }
}

#[derive(Component, Debug, Clone)]
pub struct RevealGroup {
    pub scene: SceneId,
    pub elements: SmallVec<[RevealElement; 4]>,
    /// Seconds since the arming transition started; `None` while dormant.
    pub clock: Option<f32>,
}

impl RevealGroup {
    pub fn new(scene: SceneId, specs: &[RevealSpec]) -> Self {
        Self {
            scene,
            elements: specs.iter().cloned().map(RevealElement::new).collect(),
            clock: None,
        }
    }

    /// Schedule every element relative to a transition that began `elapsed`
    /// seconds ago.
    pub fn arm(&mut self, base_offset: f32, stagger: f32, elapsed: f32) {
        for (i, element) in self.elements.iter_mut().enumerate() {
            let slot = base_offset + i as f32 * stagger;
            element.start_offset = Some(element.spec.start_at.unwrap_or(slot));
            element.rewind();
        }
        self.clock = Some(elapsed.max(0.0));
    }

    /// Stop the clock, leaving every element where it is.
    pub fn halt(&mut self) {
        self.clock = None;
    }

    pub fn is_armed(&self) -> bool {
        self.clock.is_some()
    }

    /// Armed and every element in place.
    pub fn is_finished(&self) -> bool {
        self.is_armed() && self.elements.iter().all(RevealElement::is_revealed)
    }

    pub fn element(&self, name: &str) -> Option<&RevealElement> {
        self.elements.iter().find(|e| e.name() == name)
    }
}
