//! Choreography systems.
//!
//! Submodules overview
//! - [`hotspot`] – keep hotspot label tints in sync with visited flags
//! - [`loader`] – run the launch timeline and the camera drift
//! - [`reveal`] – ease reveal elements into place
//! - [`scenehost`] – mount and unmount scenes
//! - [`time`] – update simulation time and delta
//! - [`transition`] – the transition engine and its per-frame system
//! - [`tween`] – easing curves and position tweens

pub mod hotspot;
pub mod loader;
pub mod reveal;
pub mod scenehost;
pub mod time;
pub mod transition;
pub mod tween;
