//! ECS components for scene entities.
//!
//! Submodules overview:
//! - [`hotspot`] – clickable anchor routing to another scene
//! - [`revealgroup`] – staggered reveal of a scene's dependent visuals
//! - [`scenemember`] – binds an entity to the scene that spawned it
//! - [`tint`] – label color, gray once a hotspot was visited
//! - [`tween`] – easing curves and position tweens
//! - [`worldposition`] – world-space position of an entity

pub mod hotspot;
pub mod revealgroup;
pub mod scenemember;
pub mod tint;
pub mod tween;
pub mod worldposition;
