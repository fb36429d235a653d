//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `camera` – camera capability and the shared scene camera
//! - `dispatcher` – hotspot dispatcher ticket and counters
//! - `inputgate` – locks and restores orbit controls around transitions
//! - `loader` – one-shot launch timeline
//! - `materials` – transient scene materials and their disposal
//! - `orbitcontrols` – orbit control capability
//! - `router` – route navigation history
//! - `scenehost` – which scene is mounted
//! - `sceneregistry` – static scene definitions
//! - `session` – loader-shown flag and visited hotspots
//! - `stageconfig` – INI configuration
//! - `transitionstate` – the transition state machine and tickets
//! - `worldtime` – simulation time and delta
pub mod camera;
pub mod dispatcher;
pub mod inputgate;
pub mod loader;
pub mod materials;
pub mod orbitcontrols;
pub mod router;
pub mod scenehost;
pub mod sceneregistry;
pub mod session;
pub mod stageconfig;
pub mod transitionstate;
pub mod worldtime;
