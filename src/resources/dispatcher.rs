//! Hotspot dispatcher bookkeeping.
//!
//! The dispatcher observer keeps the ticket of the transition it started
//! last, so callers that activated a hotspot can poll the outcome, plus
//! counters for accepted and debounced activations.

use bevy_ecs::prelude::Resource;

use crate::resources::transitionstate::TransitionTicket;

#[derive(Resource, Debug, Default)]
pub struct HotspotDispatcher {
    pub(crate) pending: Option<TransitionTicket>,
    pub(crate) accepted: u32,
    pub(crate) ignored: u32,
}

impl HotspotDispatcher {
    /// Take the ticket of the latest accepted activation.
    pub fn take_ticket(&mut self) -> Option<TransitionTicket> {
        self.pending.take()
    }

    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    /// Activations dropped because a transition was in flight.
    pub fn ignored(&self) -> u32 {
        self.ignored
    }
}
