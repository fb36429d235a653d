//! Transition state resource.
//!
//! A transition moves the camera from an arbitrary start point to a scene's
//! entry end point, re-aiming it at the scene's look-at target on every step,
//! with user input locked for the whole flight. At most one transition is in
//! flight; a second request is rejected, never queued.
//!
//! Lifecycle:
//!
//! ```text
//! Idle --begin--> InFlight --elapsed >= duration--> Completing --> Idle
//!                    |
//!                    +--cancel--> Idle   (ticket resolves completed=false,
//!                                         gate stays locked)
//! ```
//!
//! Every accepted request hands out a [`TransitionTicket`], the receiving end
//! of a one-shot channel that resolves exactly once.
//!
//! # Related
//! - [`crate::systems::transition`] – the per-frame system and the
//!   [`TransitionEngine`](crate::systems::transition::TransitionEngine) facade
//! - [`crate::resources::inputgate`] – locked on begin, unlocked on completion

use bevy_ecs::prelude::Resource;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use glam::Vec3;
use log::{debug, info, warn};
use thiserror::Error;

use crate::components::tween::Easing;
use crate::resources::camera::CameraHandle;
use crate::resources::inputgate::InputGate;
use crate::resources::sceneregistry::{ControlPolicy, SceneId, SceneRegistry};
use crate::systems::tween::eased_lerp;

/// Elapsed time within this distance of the duration counts as arrived.
pub const COMPLETION_EPSILON: f32 = 1e-4;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransitionError {
    #[error("no scene or hotspot named '{0}'")]
    InvalidSceneTarget(String),
    #[error("a transition to {0} is already in flight")]
    AlreadyInFlight(SceneId),
    #[error("start position {0} is not finite")]
    InvalidFromPosition(Vec3),
    #[error("transition engine could not run: {0}")]
    EngineUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    InFlight,
    Completing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub target: SceneId,
    /// Hotspot that issued the request, if any.
    pub hotspot: Option<String>,
    /// World time at which the request was made.
    pub requested_at: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub completed: bool,
}

/// Pollable completion handle of a transition.
#[derive(Debug)]
pub struct TransitionTicket {
    rx: Receiver<TransitionResult>,
    resolved: Option<TransitionResult>,
}

impl TransitionTicket {
    fn pair() -> (Sender<TransitionResult>, TransitionTicket) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (tx, TransitionTicket { rx, resolved: None })
    }

    /// Outcome of the transition, once it has finished or been cancelled.
    pub fn try_result(&mut self) -> Option<TransitionResult> {
        if self.resolved.is_none() {
            match self.rx.try_recv() {
                Ok(result) => self.resolved = Some(result),
                // the engine dropped the sender without resolving: treat as cancelled
                Err(TryRecvError::Disconnected) => {
                    self.resolved = Some(TransitionResult { completed: false })
                }
                Err(TryRecvError::Empty) => {}
            }
        }
        self.resolved
    }

    pub fn is_pending(&mut self) -> bool {
        self.try_result().is_none()
    }
}

/// Transition currently owned by the engine.
#[derive(Debug)]
pub struct ActiveTransition {
    pub request: TransitionRequest,
    pub from: Vec3,
    pub to: Vec3,
    pub look_at: Vec3,
    pub duration: f32,
    pub easing: Easing,
    pub policy: ControlPolicy,
    /// Scene mounted when the transition began.
    pub origin: Option<SceneId>,
    /// Navigate to the target's route once the camera lands.
    pub route_on_complete: bool,
    tx: Sender<TransitionResult>,
}

impl ActiveTransition {
    fn resolve(&self, completed: bool) {
        // a dropped ticket is fine, nobody is waiting
        let _ = self.tx.try_send(TransitionResult { completed });
    }
}

/// Summary of a transition that left the InFlight phase.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedTransition {
    pub request: TransitionRequest,
    pub completed: bool,
    pub origin: Option<SceneId>,
    pub route_on_complete: bool,
}

#[derive(Resource, Debug, Default)]
pub struct TransitionState {
    phase: TransitionPhase,
    active: Option<ActiveTransition>,
    elapsed: f32,
}

impl TransitionState {
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    /// Seconds since the active transition began.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn active(&self) -> Option<&ActiveTransition> {
        self.active.as_ref()
    }

    /// Target of the transition in flight.
    pub fn target(&self) -> Option<SceneId> {
        self.active.as_ref().map(|a| a.request.target)
    }

    /// Validate a request and take ownership of it.
    ///
    /// Locks the gate on success. Rejections leave the state untouched.
    pub fn begin(
        &mut self,
        registry: &SceneRegistry,
        request: TransitionRequest,
        from: Vec3,
        origin: Option<SceneId>,
        route_on_complete: bool,
        gate: &mut InputGate,
    ) -> Result<TransitionTicket, TransitionError> {
        if let Some(active) = &self.active {
            let err = TransitionError::AlreadyInFlight(active.request.target);
            debug!("Rejected request for {}: {}", request.target, err);
            return Err(err);
        }
        let def = registry.get(request.target).inspect_err(|e| {
            warn!("Dropping transition request: {}", e);
        })?;
        if !from.is_finite() {
            let err = TransitionError::InvalidFromPosition(from);
            warn!("Dropping transition request for {}: {}", request.target, err);
            return Err(err);
        }

        gate.lock();
        let (tx, ticket) = TransitionTicket::pair();
        info!(
            "Transition to {} started ({:.2}s, {}) from {}",
            def.id, def.duration, def.easing, from
        );
        self.active = Some(ActiveTransition {
            request,
            from,
            to: def.camera_end,
            look_at: def.look_at,
            duration: def.duration,
            easing: def.easing,
            policy: def.policy,
            origin,
            route_on_complete,
            tx,
        });
        self.elapsed = 0.0;
        self.phase = TransitionPhase::InFlight;
        Ok(ticket)
    }

    /// Step the camera along the active path.
    ///
    /// Returns the finished transition on the frame the camera lands: the
    /// gate has been unlocked with the target policy and the ticket resolved
    /// with `completed = true`.
    pub fn advance(
        &mut self,
        dt: f32,
        camera: &mut dyn CameraHandle,
        gate: &mut InputGate,
    ) -> Option<FinishedTransition> {
        let active = self.active.as_ref()?;
        self.elapsed += dt.max(0.0);

        let arrived = self.elapsed >= active.duration - COMPLETION_EPSILON;
        let progress = if arrived || active.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / active.duration
        };
        camera.set_position(eased_lerp(active.from, active.to, active.easing, progress));
        camera.look_at(active.look_at);

        if !arrived {
            return None;
        }

        self.phase = TransitionPhase::Completing;
        let active = self.active.take()?;
        // pin the landing point exactly, the eased curve may be off by rounding
        camera.set_position(active.to);
        camera.look_at(active.look_at);
        gate.unlock(&active.policy);
        active.resolve(true);
        info!(
            "Transition to {} completed after {:.3}s",
            active.request.target, self.elapsed
        );
        self.phase = TransitionPhase::Idle;

        Some(FinishedTransition {
            request: active.request,
            completed: true,
            origin: active.origin,
            route_on_complete: active.route_on_complete,
        })
    }

    /// Stop the active transition where it is.
    ///
    /// Resolves its ticket with `completed = false`. The camera stays put and
    /// the gate stays locked.
    pub fn cancel(&mut self) -> Option<FinishedTransition> {
        let active = self.active.take()?;
        active.resolve(false);
        info!(
            "Transition to {} cancelled after {:.3}s",
            active.request.target, self.elapsed
        );
        self.phase = TransitionPhase::Idle;
        Some(FinishedTransition {
            request: active.request,
            completed: false,
            origin: active.origin,
            route_on_complete: active.route_on_complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::camera::PerspectiveCamera;
    use crate::resources::sceneregistry::SceneDef;

    fn registry() -> SceneRegistry {
        SceneRegistry::from_defs([
            SceneDef::new(SceneId::Home, Vec3::new(0.0, 0.0, 50.0), Vec3::new(0.0, 0.0, 6.0), 4.0),
            SceneDef::new(SceneId::About, Vec3::new(0.0, 0.0, 50.0), Vec3::new(0.0, 0.0, 9.0), 0.0),
        ])
    }

    fn request(target: SceneId) -> TransitionRequest {
        TransitionRequest {
            target,
            hotspot: None,
            requested_at: 0.0,
        }
    }

    #[test]
    fn test_begin_locks_gate_and_enters_flight() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let mut ticket = state
            .begin(&registry(), request(SceneId::Home), Vec3::new(0.0, 0.0, 50.0), None, false, &mut gate)
            .unwrap();
        assert_eq!(state.phase(), TransitionPhase::InFlight);
        assert_eq!(state.target(), Some(SceneId::Home));
        assert!(gate.is_locked());
        assert!(ticket.is_pending());
    }

    #[test]
    fn test_second_request_rejected() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let reg = registry();
        state
            .begin(&reg, request(SceneId::Home), Vec3::ZERO, None, false, &mut gate)
            .unwrap();
        let err = state
            .begin(&reg, request(SceneId::About), Vec3::ZERO, None, false, &mut gate)
            .unwrap_err();
        assert_eq!(err, TransitionError::AlreadyInFlight(SceneId::Home));
        assert_eq!(state.target(), Some(SceneId::Home));
    }

    #[test]
    fn test_rejects_unknown_scene_and_bad_start() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let reg = registry();
        assert!(matches!(
            state.begin(&reg, request(SceneId::Contact), Vec3::ZERO, None, false, &mut gate),
            Err(TransitionError::InvalidSceneTarget(_))
        ));
        assert!(matches!(
            state.begin(&reg, request(SceneId::Home), Vec3::new(f32::NAN, 0.0, 0.0), None, false, &mut gate),
            Err(TransitionError::InvalidFromPosition(_))
        ));
        assert!(state.is_idle());
        assert!(!gate.is_locked());
    }

    #[test]
    fn test_advance_reaches_end_and_resolves() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let mut camera = PerspectiveCamera::default();
        let mut ticket = state
            .begin(&registry(), request(SceneId::Home), Vec3::new(0.0, 0.0, 50.0), None, true, &mut gate)
            .unwrap();

        let mut finished = None;
        for _ in 0..240 {
            if let Some(f) = state.advance(1.0 / 60.0, &mut camera, &mut gate) {
                finished = Some(f);
                break;
            }
            assert!(gate.is_locked());
        }
        let finished = finished.expect("transition should land within 4s of frames");
        assert!(finished.completed);
        assert!(finished.route_on_complete);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 6.0));
        assert!(!gate.is_locked());
        assert_eq!(gate.unlock_count(), 1);
        assert_eq!(ticket.try_result(), Some(TransitionResult { completed: true }));
        assert!(state.is_idle());
    }

    #[test]
    fn test_zero_duration_completes_next_frame() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let mut camera = PerspectiveCamera::default();
        state
            .begin(&registry(), request(SceneId::About), Vec3::new(0.0, 0.0, 50.0), None, false, &mut gate)
            .unwrap();
        let finished = state.advance(0.0, &mut camera, &mut gate);
        assert!(finished.is_some());
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 9.0));
    }

    #[test]
    fn test_cancel_resolves_false_and_keeps_gate_locked() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let mut camera = PerspectiveCamera::default();
        let mut ticket = state
            .begin(&registry(), request(SceneId::Home), Vec3::new(0.0, 0.0, 50.0), None, true, &mut gate)
            .unwrap();
        state.advance(1.0, &mut camera, &mut gate);
        let stopped_at = camera.position();

        let cancelled = state.cancel().unwrap();
        assert!(!cancelled.completed);
        assert_eq!(ticket.try_result(), Some(TransitionResult { completed: false }));
        assert!(gate.is_locked());
        assert!(state.is_idle());

        assert!(state.advance(1.0, &mut camera, &mut gate).is_none());
        assert_eq!(camera.position(), stopped_at);
        assert!(state.cancel().is_none());
    }

    #[test]
    fn test_ticket_resolves_only_once() {
        let mut state = TransitionState::default();
        let mut gate = InputGate::default();
        let mut ticket = state
            .begin(&registry(), request(SceneId::Home), Vec3::ZERO, None, false, &mut gate)
            .unwrap();
        state.cancel();
        assert_eq!(ticket.try_result(), Some(TransitionResult { completed: false }));
        assert_eq!(ticket.try_result(), Some(TransitionResult { completed: false }));
        assert!(!ticket.is_pending());
    }
}
