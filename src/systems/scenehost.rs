//! Scene mounting and unmounting.
//!
//! These run with exclusive world access, either directly from the
//! [`Stage`](crate::stage::Stage) or queued as commands by observers.
//!
//! Mounting a scene:
//! 1. unmounts the current scene, if any
//! 2. spawns one floating [`Hotspot`] entity per hotspot binding, tinted by
//!    the session's visited flags
//! 3. spawns the scene's [`RevealGroup`]
//! 4. registers the scene's transient materials
//! 5. places the camera at the entry start, aimed at the look-at target
//! 6. triggers [`SceneMountedEvent`], which starts the entry transition
//!
//! Every spawned entity carries a [`SceneMember`] so unmounting can find it.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};

use crate::components::hotspot::Hotspot;
use crate::components::revealgroup::RevealGroup;
use crate::components::scenemember::SceneMember;
use crate::components::tint::Tint;
use crate::components::tween::{Easing, LoopMode, TweenPosition};
use crate::components::worldposition::WorldPosition;
use crate::events::scene::{SceneMountedEvent, SceneUnmountedEvent};
use crate::resources::camera::SceneCamera;
use crate::resources::materials::{MaterialStore, SceneMaterial};
use crate::resources::scenehost::SceneHost;
use crate::resources::sceneregistry::{SceneId, SceneRegistry};
use crate::resources::session::Session;
use crate::resources::transitionstate::TransitionError;
use crate::systems::transition::cancel_transition;

/// Vertical travel of a floating hotspot label.
const FLOAT_HEIGHT: f32 = 0.2;
const FLOAT_PERIOD: f32 = 2.0;

/// Mount `scene`, replacing whatever is mounted.
pub fn mount_scene(world: &mut World, scene: SceneId) -> Result<(), TransitionError> {
    let def = world.resource::<SceneRegistry>().get(scene)?.clone();
    unmount_scene(world);

    let visited: Vec<bool> = {
        let session = world.resource::<Session>();
        def.hotspots
            .iter()
            .map(|h| session.is_visited(&h.id))
            .collect()
    };
    for (binding, visited) in def.hotspots.iter().zip(visited) {
        let float = TweenPosition::new(
            binding.position,
            binding.position + Vec3::new(0.0, FLOAT_HEIGHT, 0.0),
            FLOAT_PERIOD,
        )
        .with_easing(Easing::QuadInOut)
        .with_loop_mode(LoopMode::PingPong);
        world.spawn((
            Hotspot::new(binding.id.clone(), binding.target),
            WorldPosition::new(binding.position),
            float,
            Tint::for_label(visited),
            SceneMember { scene },
        ));
    }

    if !def.reveals.is_empty() {
        world.spawn((RevealGroup::new(scene, &def.reveals), SceneMember { scene }));
    }

    {
        let mut materials = world.resource_mut::<MaterialStore>();
        materials.register(scene, SceneMaterial::new(format!("{}/backdrop", scene)));
        for reveal in &def.reveals {
            materials.register(scene, SceneMaterial::new(format!("{}/{}", scene, reveal.name)));
        }
    }

    {
        let mut camera = world.resource_mut::<SceneCamera>();
        camera.set_position(def.camera_start);
        camera.look_at(def.look_at);
    }

    world.resource_mut::<SceneHost>().set_mounted(scene);
    info!(
        "Mounted {} ({} hotspots, {} reveal elements)",
        scene,
        def.hotspots.len(),
        def.reveals.len()
    );
    world.trigger(SceneMountedEvent { scene });
    world.flush();
    Ok(())
}

/// Unmount the current scene. Returns the scene that was mounted.
///
/// Cancels any in-flight transition, despawns the scene's entities and
/// disposes its materials.
pub fn unmount_scene(world: &mut World) -> Option<SceneId> {
    let scene = world.resource::<SceneHost>().mounted()?;

    if let Ok(true) = world.run_system_cached(cancel_transition) {
        debug!("Unmounting {} cancelled the transition in flight", scene);
    }

    let members: Vec<Entity> = world
        .query::<(Entity, &SceneMember)>()
        .iter(world)
        .filter(|(_, member)| member.scene == scene)
        .map(|(entity, _)| entity)
        .collect();
    for entity in &members {
        world.despawn(*entity);
    }

    world.resource_mut::<MaterialStore>().dispose_scene(scene);
    world.resource_mut::<SceneHost>().clear();
    info!("Unmounted {} ({} entities)", scene, members.len());
    world.trigger(SceneUnmountedEvent { scene });
    world.flush();
    Some(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::dispatcher::HotspotDispatcher;
    use crate::resources::inputgate::InputGate;
    use crate::resources::router::Router;
    use crate::resources::transitionstate::TransitionState;
    use crate::resources::worldtime::WorldTime;

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(TransitionState::default());
        world.insert_resource(SceneRegistry::builtin());
        world.insert_resource(InputGate::default());
        world.insert_resource(SceneCamera::default());
        world.insert_resource(MaterialStore::default());
        world.insert_resource(SceneHost::default());
        world.insert_resource(Router::default());
        world.insert_resource(Session::default());
        world.insert_resource(HotspotDispatcher::default());
        world
    }

    fn count<T: Component>(world: &mut World) -> usize {
        world.query::<&T>().iter(world).count()
    }

    #[test]
    fn test_mount_spawns_scene_entities_and_places_camera() {
        let mut world = world();
        mount_scene(&mut world, SceneId::Home).unwrap();

        assert_eq!(world.resource::<SceneHost>().mounted(), Some(SceneId::Home));
        assert_eq!(count::<Hotspot>(&mut world), 4);
        assert_eq!(count::<RevealGroup>(&mut world), 0);
        assert_eq!(world.resource::<MaterialStore>().count(SceneId::Home), 1);
        assert_eq!(
            world.resource::<SceneCamera>().position(),
            Vec3::new(0.0, 0.0, 20.0)
        );
    }

    #[test]
    fn test_mount_replaces_previous_scene() {
        let mut world = world();
        mount_scene(&mut world, SceneId::Home).unwrap();
        mount_scene(&mut world, SceneId::Projects).unwrap();

        assert_eq!(count::<Hotspot>(&mut world), 1);
        assert_eq!(count::<RevealGroup>(&mut world), 1);
        assert_eq!(world.resource::<MaterialStore>().count(SceneId::Home), 0);
        assert_eq!(world.resource::<MaterialStore>().count(SceneId::Projects), 5);
        assert_eq!(world.resource::<SceneHost>().mount_count(), 2);
    }

    #[test]
    fn test_unmount_clears_everything() {
        let mut world = world();
        mount_scene(&mut world, SceneId::About).unwrap();
        assert_eq!(unmount_scene(&mut world), Some(SceneId::About));
        assert_eq!(count::<SceneMember>(&mut world), 0);
        assert_eq!(world.resource::<SceneHost>().mounted(), None);
        assert_eq!(unmount_scene(&mut world), None);
    }
}
