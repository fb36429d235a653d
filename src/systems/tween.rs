//! Tween animation helpers and systems.
//!
//! The easing curves and interpolation helpers here are shared by everything
//! that moves over time: the camera transition, reveal groups, the loader's
//! camera drift and the floating hotspots driven by [`tween_position_system`].

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::tween::{Easing, LoopMode, TweenPosition};
use crate::components::worldposition::WorldPosition;
use crate::resources::worldtime::WorldTime;

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
        Easing::QuartIn => t * t * t * t,
        Easing::QuartOut => {
            let p = t - 1.0;
            1.0 - p * p * p * p
        }
        Easing::QuartInOut => {
            if t < 0.5 {
                8.0 * t * t * t * t
            } else {
                let p = t - 1.0;
                1.0 - 8.0 * p * p * p * p
            }
        }
    }
}

/// Linearly interpolate between two floats.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate `from` to `to` with an eased progress value.
pub fn eased_lerp(from: Vec3, to: Vec3, easing: Easing, progress: f32) -> Vec3 {
    from.lerp(to, ease(easing, progress))
}

/// Advance tween time and handle looping/completion.
pub(crate) fn advance(tw: &mut TweenPosition, dt: f32) {
    let dir = if tw.forward { 1.0 } else { -1.0 };
    tw.time += dt * dir;

    let finished_forward = tw.forward && tw.time >= tw.duration;
    let finished_backward = !tw.forward && tw.time <= 0.0;

    if finished_forward || finished_backward {
        match tw.loop_mode {
            LoopMode::Once => {
                tw.playing = false;
                tw.time = tw.time.clamp(0.0, tw.duration);
            }
            LoopMode::Loop => {
                // keep the overshoot so long loops don't drift behind the clock
                tw.time = if finished_forward {
                    (tw.time - tw.duration).clamp(0.0, tw.duration)
                } else {
                    (tw.time + tw.duration).clamp(0.0, tw.duration)
                };
            }
            LoopMode::PingPong => {
                tw.forward = !tw.forward;
                tw.time = tw.time.clamp(0.0, tw.duration);
            }
        }
    }
}

/// Current value of a position tween.
pub(crate) fn sample(tw: &TweenPosition) -> Vec3 {
    if tw.duration <= 0.0 {
        return tw.to;
    }
    eased_lerp(tw.from, tw.to, tw.easing, tw.time / tw.duration)
}

/// Animate entity positions based on [`TweenPosition`] components.
pub fn tween_position_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut WorldPosition, &mut TweenPosition)>,
) {
    let dt = world_time.delta.max(0.0);
    for (mut wp, mut tw) in query.iter_mut() {
        if !tw.playing {
            continue;
        }
        advance(&mut tw, dt);
        wp.pos = sample(&tw);
    }
}
