//! Hotspot activation event and the dispatcher observer.
//!
//! Activating a hotspot (a click on its label or mesh) triggers a
//! [`HotspotActivatedEvent`]. [`observe_hotspot_activated`] turns it into a
//! navigating transition toward the hotspot's target scene, starting from
//! wherever the camera currently is. Activations are debounced: while any
//! transition is in flight they are dropped, not queued.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::hotspot::Hotspot;
use crate::resources::dispatcher::HotspotDispatcher;
use crate::resources::session::Session;
use crate::resources::transitionstate::TransitionError;
use crate::systems::transition::{TransitionEngine, TransitionOrder};

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct HotspotActivatedEvent {
    pub hotspot_id: String,
}

impl HotspotActivatedEvent {
    pub fn new(hotspot_id: impl Into<String>) -> Self {
        Self {
            hotspot_id: hotspot_id.into(),
        }
    }
}

/// Dispatcher observer.
///
/// Contract
/// - Resolves the id against the mounted [`Hotspot`] entities; an unknown id
///   is logged as [`TransitionError::InvalidSceneTarget`] and dropped.
/// - Ignores the activation unless the transition state is Idle.
/// - Requests a transition that navigates to the target route on landing,
///   marks the hotspot visited and keeps the ticket in
///   [`HotspotDispatcher`].
pub fn observe_hotspot_activated(
    trigger: On<HotspotActivatedEvent>,
    hotspots: Query<&Hotspot>,
    mut session: ResMut<Session>,
    mut dispatcher: ResMut<HotspotDispatcher>,
    mut engine: TransitionEngine,
) {
    let id = trigger.event().hotspot_id.as_str();
    let Some(hotspot) = hotspots.iter().find(|h| h.id == id) else {
        warn!(
            "Dropping hotspot activation: {}",
            TransitionError::InvalidSceneTarget(id.to_string())
        );
        return;
    };
    if !engine.state.is_idle() {
        dispatcher.ignored += 1;
        debug!("Hotspot '{}' ignored while a transition is in flight", id);
        return;
    }

    let order = TransitionOrder {
        target: hotspot.target,
        from: engine.camera_position(),
        hotspot: Some(id.to_string()),
        route_on_complete: true,
    };
    match engine.request(order) {
        Ok(ticket) => {
            info!("Hotspot '{}' activated, heading to {}", id, hotspot.target);
            session.mark_visited(id);
            dispatcher.accepted += 1;
            dispatcher.pending = Some(ticket);
        }
        Err(e) => debug!("Hotspot '{}' request rejected: {}", id, e),
    }
}
