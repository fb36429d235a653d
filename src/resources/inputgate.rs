//! Input gate resource.
//!
//! Owns the orbit controls and decides when the user may move the camera.
//! Transitions call [`InputGate::lock`] when they start and
//! [`InputGate::unlock`] with the target scene's [`ControlPolicy`] when they
//! land. Unlocking applies the policy field by field; it is never a blanket
//! enable, so a scene that forbids zoom stays zoom-free after its transition.

use bevy_ecs::prelude::Resource;
use log::debug;

use crate::resources::orbitcontrols::{OrbitControlHandle, OrbitControls};
use crate::resources::sceneregistry::ControlPolicy;

#[derive(Resource)]
pub struct InputGate {
    controls: Box<dyn OrbitControlHandle>,
    locked: bool,
    unlocks: u32,
    policy: Option<ControlPolicy>,
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new(OrbitControls::default())
    }
}

impl InputGate {
    pub fn new(controls: impl OrbitControlHandle) -> Self {
        Self {
            controls: Box::new(controls),
            locked: false,
            unlocks: 0,
            policy: None,
        }
    }

    /// Disable rotate, zoom and pan. Idempotent.
    pub fn lock(&mut self) {
        if !self.locked {
            debug!("Input gate locked");
        }
        self.controls.set_rotate_enabled(false);
        self.controls.set_zoom_enabled(false);
        self.controls.set_pan_enabled(false);
        self.locked = true;
    }

    /// Re-enable input as the scene policy allows.
    pub fn unlock(&mut self, policy: &ControlPolicy) {
        self.controls.set_rotate_enabled(policy.rotate);
        self.controls.set_zoom_enabled(policy.zoom);
        self.controls.set_pan_enabled(policy.pan);
        self.controls
            .set_polar_bounds(policy.min_polar, policy.max_polar);
        self.controls
            .set_distance_bounds(policy.min_distance, policy.max_distance);
        self.locked = false;
        self.unlocks += 1;
        self.policy = Some(*policy);
        debug!(
            "Input gate unlocked (rotate={}, zoom={}, pan={})",
            policy.rotate, policy.zoom, policy.pan
        );
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of unlocks since the gate was created.
    pub fn unlock_count(&self) -> u32 {
        self.unlocks
    }

    /// Policy applied by the most recent unlock.
    pub fn applied_policy(&self) -> Option<&ControlPolicy> {
        self.policy.as_ref()
    }

    pub fn controls(&self) -> &dyn OrbitControlHandle {
        self.controls.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_disables_everything_and_is_idempotent() {
        let mut gate = InputGate::default();
        gate.lock();
        gate.lock();
        assert!(gate.is_locked());
        assert!(gate.controls().is_fully_disabled());
        assert_eq!(gate.unlock_count(), 0);
    }

    #[test]
    fn test_unlock_applies_policy_not_blanket_enable() {
        let mut gate = InputGate::default();
        gate.lock();
        let policy = ControlPolicy::default().with_distance(2.0, 9.0);
        gate.unlock(&policy);

        let controls = gate.controls();
        assert!(!gate.is_locked());
        assert!(controls.rotate_enabled());
        assert!(!controls.zoom_enabled());
        assert!(!controls.pan_enabled());
        assert_eq!(controls.polar_bounds(), (policy.min_polar, policy.max_polar));
        assert_eq!(controls.distance_bounds(), (2.0, 9.0));
        assert_eq!(gate.unlock_count(), 1);
        assert_eq!(gate.applied_policy(), Some(&policy));
    }
}
