//! Session state resource.
//!
//! Everything that outlives a single scene mount: whether the launch loader
//! has been shown, and which hotspots the visitor has already clicked. The
//! stage owns it; [`Session::reset`] starts a fresh visit.

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashSet;

#[derive(Resource, Debug, Default, Clone)]
pub struct Session {
    loading_shown: bool,
    visited: FxHashSet<String>,
}

impl Session {
    pub fn loading_shown(&self) -> bool {
        self.loading_shown
    }

    pub fn mark_loading_shown(&mut self) {
        self.loading_shown = true;
    }

    /// Record a hotspot click. Visits are never undone within a session.
    pub fn mark_visited(&mut self, hotspot_id: &str) {
        if self.visited.insert(hotspot_id.to_string()) {
            debug!("Hotspot '{}' visited", hotspot_id);
        }
    }

    pub fn is_visited(&self, hotspot_id: &str) -> bool {
        self.visited.contains(hotspot_id)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn reset(&mut self) {
        self.loading_shown = false;
        self.visited.clear();
    }
}
