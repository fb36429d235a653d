//! Reveal animation system.
//!
//! Advances the clock of every armed [`RevealGroup`] and eases each element
//! from its `from_*` values to full presence once the clock passes the
//! element's start offset. Before that offset an element stays exactly at
//! its starting values.
//!
//! While the transition into a group's scene is in flight the group clock is
//! the transition's elapsed time, however late the group was armed. Once the
//! camera lands the clock runs on by the frame delta until every element is
//! in place.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::revealgroup::{RevealElement, RevealGroup};
use crate::resources::transitionstate::TransitionState;
use crate::resources::worldtime::WorldTime;
use crate::systems::tween::{ease, lerp_f32};

/// Place an element according to the group clock.
fn pose_element(element: &mut RevealElement, clock: f32) {
    let Some(start) = element.start_offset else {
        return;
    };
    let local = clock - start;
    if local < 0.0 {
        element.rewind();
        return;
    }
    let spec = &element.spec;
    let progress = if spec.duration <= 0.0 {
        1.0
    } else {
        local / spec.duration
    };
    if progress >= 1.0 {
        element.opacity = spec.to_opacity;
        element.offset = Vec3::ZERO;
        element.scale = spec.to_scale;
        return;
    }
    let e = ease(spec.easing, progress);
    element.opacity = lerp_f32(spec.from_opacity, spec.to_opacity, e);
    element.offset = spec.from_offset.lerp(Vec3::ZERO, e);
    element.scale = lerp_f32(spec.from_scale, spec.to_scale, e);
}

/// Advance armed reveal groups.
pub fn reveal_system(
    world_time: Res<WorldTime>,
    state: Res<TransitionState>,
    mut groups: Query<&mut RevealGroup>,
) {
    let dt = world_time.delta.max(0.0);
    let in_flight = state.target();
    for mut group in groups.iter_mut() {
        let Some(clock) = group.clock else {
            continue;
        };
        if group.is_finished() {
            continue;
        }
        let clock = if in_flight == Some(group.scene) {
            state.elapsed()
        } else {
            clock + dt
        };
        group.clock = Some(clock);
        for element in group.elements.iter_mut() {
            pose_element(element, clock);
        }
    }
}
