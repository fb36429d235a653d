//! Hotspot label tint system.
//!
//! Keeps every hotspot's [`Tint`] in step with the session: gray once the
//! hotspot has been visited, white before.

use bevy_ecs::prelude::*;

use crate::components::hotspot::Hotspot;
use crate::components::tint::Tint;
use crate::resources::session::Session;

pub fn hotspot_tint_system(session: Res<Session>, mut labels: Query<(&Hotspot, &mut Tint)>) {
    for (hotspot, mut tint) in labels.iter_mut() {
        let wanted = Tint::for_label(session.is_visited(&hotspot.id));
        if *tint != wanted {
            *tint = wanted;
        }
    }
}
