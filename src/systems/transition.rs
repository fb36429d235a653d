//! Transition engine systems.
//!
//! - [`TransitionEngine`] – the request/force/cancel facade, usable from any
//!   system or observer
//! - [`transition_system`] – steps the in-flight transition each frame and
//!   navigates on landing
//! - [`arm_late_reveal_groups`] – arms reveal groups spawned after their
//!   transition already started
//! - [`request_transition`], [`force_transition`], [`cancel_transition`] –
//!   one-shot systems the [`Stage`](crate::stage::Stage) registers and runs
//!   with input
//!
//! # System Ordering
//!
//! `transition_system` runs after the tween and loader systems and before
//! `arm_late_reveal_groups` and the reveal system, so reveals see the same
//! elapsed time as the camera in a frame.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use glam::Vec3;
use log::debug;

use crate::components::revealgroup::RevealGroup;
use crate::events::transition::{TransitionFinishedEvent, TransitionStartedEvent};
use crate::resources::camera::SceneCamera;
use crate::resources::inputgate::InputGate;
use crate::resources::materials::MaterialStore;
use crate::resources::router::Router;
use crate::resources::scenehost::SceneHost;
use crate::resources::sceneregistry::{SceneId, SceneRegistry};
use crate::resources::transitionstate::{
    TransitionError, TransitionRequest, TransitionState, TransitionTicket,
};
use crate::resources::worldtime::WorldTime;

/// Input of the one-shot request systems.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOrder {
    pub target: SceneId,
    pub from: Vec3,
    pub hotspot: Option<String>,
    pub route_on_complete: bool,
}

impl TransitionOrder {
    pub fn new(target: SceneId, from: Vec3) -> Self {
        Self {
            target,
            from,
            hotspot: None,
            route_on_complete: false,
        }
    }

    pub fn navigating(mut self) -> Self {
        self.route_on_complete = true;
        self
    }
}

/// Bundled system parameters for starting and stopping transitions.
#[derive(SystemParam)]
pub struct TransitionEngine<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub state: ResMut<'w, TransitionState>,
    pub registry: Res<'w, SceneRegistry>,
    pub gate: ResMut<'w, InputGate>,
    pub camera: Res<'w, SceneCamera>,
    pub materials: ResMut<'w, MaterialStore>,
    pub host: Res<'w, SceneHost>,
    pub world_time: Res<'w, WorldTime>,
    pub reveals: Query<'w, 's, &'static mut RevealGroup>,
}

impl TransitionEngine<'_, '_> {
    /// Start a transition unless one is already in flight.
    ///
    /// On success the gate is locked, the target scene's reveal groups are
    /// armed and a [`TransitionStartedEvent`] is triggered.
    pub fn request(&mut self, order: TransitionOrder) -> Result<TransitionTicket, TransitionError> {
        let TransitionOrder {
            target,
            from,
            hotspot,
            route_on_complete,
        } = order;
        let request = TransitionRequest {
            target,
            hotspot: hotspot.clone(),
            requested_at: self.world_time.elapsed,
        };
        let origin = self.host.mounted();
        let ticket = self.state.begin(
            &self.registry,
            request,
            from,
            origin,
            route_on_complete,
            &mut self.gate,
        )?;

        let def = self.registry.get(target)?;
        let (base, stagger) = (def.reveal_base_offset(), def.reveal_stagger);
        for mut group in self.reveals.iter_mut() {
            if group.scene == target {
                group.arm(base, stagger, 0.0);
            }
        }

        self.commands
            .trigger(TransitionStartedEvent { target, hotspot });
        Ok(ticket)
    }

    /// Cancel whatever is in flight, then start `order`.
    pub fn force(&mut self, order: TransitionOrder) -> Result<TransitionTicket, TransitionError> {
        self.cancel();
        self.request(order)
    }

    /// Stop the in-flight transition, if any.
    ///
    /// Disposes the transient materials of the scene the transition started
    /// from and halts the target's reveal groups where they are. The gate
    /// stays locked. Returns false when nothing was in flight.
    pub fn cancel(&mut self) -> bool {
        let Some(cancelled) = self.state.cancel() else {
            return false;
        };
        let target = cancelled.request.target;
        if let Some(origin) = cancelled.origin {
            self.materials.dispose_scene(origin);
        }
        for mut group in self.reveals.iter_mut() {
            if group.scene == target {
                group.halt();
            }
        }
        self.commands.trigger(TransitionFinishedEvent {
            target,
            hotspot: cancelled.request.hotspot,
            completed: false,
            navigated: false,
        });
        true
    }

    /// Current camera position, the `from` of user-initiated transitions.
    pub fn camera_position(&self) -> Vec3 {
        self.camera.position()
    }
}

/// Step the in-flight transition and handle landing.
///
/// On the landing frame the gate has already been unlocked by the state; this
/// system navigates to the target route when the transition asked for it and
/// triggers [`TransitionFinishedEvent`].
pub fn transition_system(
    mut commands: Commands,
    world_time: Res<WorldTime>,
    mut state: ResMut<TransitionState>,
    mut gate: ResMut<InputGate>,
    mut camera: ResMut<SceneCamera>,
    mut router: ResMut<Router>,
) {
    let Some(finished) = state.advance(world_time.delta, camera.handle_mut(), &mut gate) else {
        return;
    };
    let target = finished.request.target;
    if finished.route_on_complete {
        router.navigate(target.route());
    }
    commands.trigger(TransitionFinishedEvent {
        target,
        hotspot: finished.request.hotspot,
        completed: finished.completed,
        navigated: finished.route_on_complete,
    });
}

/// Arm reveal groups that appeared while a transition into their scene was
/// already running, catching their clock up to the transition's.
pub fn arm_late_reveal_groups(
    state: Res<TransitionState>,
    registry: Res<SceneRegistry>,
    mut groups: Query<&mut RevealGroup, Added<RevealGroup>>,
) {
    let Some(target) = state.target() else {
        return;
    };
    let Ok(def) = registry.get(target) else {
        return;
    };
    for mut group in groups.iter_mut() {
        if group.scene == target && !group.is_armed() {
            debug!(
                "Arming late reveal group of {} at {:.3}s",
                target,
                state.elapsed()
            );
            group.arm(def.reveal_base_offset(), def.reveal_stagger, state.elapsed());
        }
    }
}

pub fn request_transition(
    In(order): In<TransitionOrder>,
    mut engine: TransitionEngine,
) -> Result<TransitionTicket, TransitionError> {
    engine.request(order)
}

pub fn force_transition(
    In(order): In<TransitionOrder>,
    mut engine: TransitionEngine,
) -> Result<TransitionTicket, TransitionError> {
    engine.force(order)
}

pub fn cancel_transition(mut engine: TransitionEngine) -> bool {
    engine.cancel()
}
