//! Event types and observers used by the choreographer.
//!
//! This module groups the domain events exchanged across systems and the
//! corresponding observers that react to them. Events provide a decoupled
//! way for systems to communicate without tight coupling or direct
//! dependencies.
//!
//! Submodules:
//! - [`hotspot`] – hotspot activation and the dispatcher observer
//! - [`loader`] – launch sequence completion
//! - [`scene`] – scene mount/unmount signals and the entry-transition observer
//! - [`transition`] – transition start/finish and the navigation observer
pub mod hotspot;
pub mod loader;
pub mod scene;
pub mod transition;
