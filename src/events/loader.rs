//! Loader completion event and observer.
//!
//! [`LoaderFinishedEvent`] fires once, on the frame the launch timeline ends.
//! [`observe_loader_finished`] records that the loader has been shown and
//! mounts the entry scene, home unless the visit landed on another route.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::resources::scenehost::SceneHost;
use crate::resources::session::Session;
use crate::systems::scenehost::mount_scene;

#[derive(Event, Debug, Clone, Copy)]
pub struct LoaderFinishedEvent {}

pub fn observe_loader_finished(
    _trigger: On<LoaderFinishedEvent>,
    mut session: ResMut<Session>,
    host: Res<SceneHost>,
    mut commands: Commands,
) {
    let entry = host.entry();
    info!("Launch sequence complete, entering {}", entry);
    session.mark_loading_shown();
    commands.queue(move |world: &mut World| {
        if let Err(e) = mount_scene(world, entry) {
            warn!("Could not mount {}: {}", entry, e);
        }
    });
}
