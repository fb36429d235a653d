//! Tween components for animated interpolation.
//!
//! This module provides:
//! - [`Easing`] – the curves shared by camera transitions, reveals and tweens
//! - [`LoopMode`] – what a tween does when it reaches its end
//! - [`TweenPosition`] – animate a [`WorldPosition`](super::worldposition::WorldPosition)
//!
//! Easing names follow the timeline vocabulary used by scene definitions
//! (`"none"`, `"power2.inOut"`, ...), so scene tables can be written by hand.
//! See [`crate::systems::tween`] for the curves themselves and the update system.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Determines how a tween behaves when it reaches the end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once and stop.
    Once,
    /// Restart from the beginning when finished.
    Loop,
    /// Reverse direction when reaching either end.
    PingPong,
}

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves. `powerN` names map to
/// polynomials of degree N + 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    #[serde(rename = "none", alias = "linear")]
    Linear,
    /// Starts slow, accelerates (quadratic).
    #[serde(rename = "power1.in")]
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    #[serde(rename = "power1.out")]
    QuadOut,
    /// Slow start and end (quadratic).
    #[serde(rename = "power1.inOut")]
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    #[serde(rename = "power2.in")]
    CubicIn,
    /// Starts fast, decelerates (cubic).
    #[serde(rename = "power2.out")]
    CubicOut,
    /// Slow start and end (cubic).
    #[serde(rename = "power2.inOut")]
    CubicInOut,
    /// Starts slow, accelerates (quartic).
    #[serde(rename = "power3.in")]
    QuartIn,
    /// Starts fast, decelerates (quartic).
    #[serde(rename = "power3.out")]
    QuartOut,
    /// Slow start and end (quartic).
    #[serde(rename = "power3.inOut")]
    QuartInOut,
}

impl Easing {
    pub const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
    ];

    /// Canonical timeline name of this curve.
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "none",
            Easing::QuadIn => "power1.in",
            Easing::QuadOut => "power1.out",
            Easing::QuadInOut => "power1.inOut",
            Easing::CubicIn => "power2.in",
            Easing::CubicOut => "power2.out",
            Easing::CubicInOut => "power2.inOut",
            Easing::QuartIn => "power3.in",
            Easing::QuartOut => "power3.out",
            Easing::QuartInOut => "power3.inOut",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("linear") {
            return Ok(Easing::Linear);
        }
        Easing::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| format!("unknown easing '{}'", s))
    }
}

/// Animates an entity's [`WorldPosition`](super::worldposition::WorldPosition)
/// between two points.
///
/// The tween interpolates `from` to `to` over `duration` seconds using the
/// specified `easing` function and `loop_mode`. The loader also embeds one
/// of these to drive its looping camera drift.
#[derive(Component, Clone, Debug)]
pub struct TweenPosition {
    /// Starting position.
    pub from: Vec3,
    /// Ending position.
    pub to: Vec3,
    /// Duration in seconds.
    pub duration: f32,
    /// Easing function to use.
    pub easing: Easing,
    /// Behavior when the tween ends.
    pub loop_mode: LoopMode,
    /// Whether the tween is currently playing.
    pub playing: bool,
    /// Current time within the tween.
    pub time: f32,
    /// Direction of playback (true = forward).
    pub forward: bool,
}

impl TweenPosition {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        TweenPosition {
            from,
            to,
            duration,
            easing: Easing::Linear,
            loop_mode: LoopMode::Once,
            playing: true,
            time: 0.0,
            forward: true,
        }
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }
}
