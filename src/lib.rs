//! stardust: scene-transition choreographer for a 3D space portfolio.
//!
//! This module exposes the ECS components, resources, systems, and events
//! for use in integration tests and as a reusable library. [`stage::Stage`]
//! ties them together into a frame-driven session.

pub mod components;
pub mod events;
pub mod resources;
pub mod stage;
pub mod systems;
