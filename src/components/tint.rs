//! Label tint component.
//!
//! Hotspot labels carry a [`Tint`] that the
//! [`hotspot_tint_system`](crate::systems::hotspot::hotspot_tint_system) keeps
//! in sync with the session: labels of visited hotspots are drawn gray,
//! unvisited ones white.

use bevy_ecs::prelude::Component;

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const GRAY: Rgba = Rgba::new(128, 128, 128, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Color modulation applied to an entity's label.
#[derive(Component, Clone, Debug, Copy, PartialEq, Eq)]
pub struct Tint {
    pub color: Rgba,
}

impl Tint {
    /// Tint for a hotspot label given its visited flag.
    pub fn for_label(visited: bool) -> Self {
        Self {
            color: if visited { Rgba::GRAY } else { Rgba::WHITE },
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self { color: Rgba::WHITE }
    }
}
