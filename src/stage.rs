//! Stage: the session controller.
//!
//! A [`Stage`] owns the ECS world and the per-frame schedule. It wires the
//! resources, observers and one-shot systems together, and exposes the
//! operations a host (a renderer loop, the headless binary, tests) drives
//! the choreography with.
//!
//! Per frame, [`Stage::tick`] advances [`WorldTime`] and then runs, in order:
//! tweens → loader → transitions → late reveal arming → reveals → label tint.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use glam::Vec3;
use log::{error, info, warn};

use crate::components::hotspot::Hotspot;
use crate::components::revealgroup::RevealGroup;
use crate::components::tint::Tint;
use crate::events::hotspot::{HotspotActivatedEvent, observe_hotspot_activated};
use crate::events::loader::observe_loader_finished;
use crate::events::scene::observe_scene_mounted;
use crate::events::transition::observe_transition_finished;
use crate::resources::camera::{CameraHandle, PerspectiveCamera, SceneCamera};
use crate::resources::dispatcher::HotspotDispatcher;
use crate::resources::inputgate::InputGate;
use crate::resources::loader::{LoaderSequencer, LoaderState};
use crate::resources::materials::MaterialStore;
use crate::resources::orbitcontrols::{OrbitControlHandle, OrbitControls};
use crate::resources::router::Router;
use crate::resources::scenehost::SceneHost;
use crate::resources::sceneregistry::{SceneId, SceneRegistry};
use crate::resources::session::Session;
use crate::resources::stageconfig::StageConfig;
use crate::resources::transitionstate::{
    TransitionError, TransitionPhase, TransitionState, TransitionTicket,
};
use crate::resources::worldtime::WorldTime;
use crate::systems::hotspot::hotspot_tint_system;
use crate::systems::loader::loader_system;
use crate::systems::reveal::reveal_system;
use crate::systems::scenehost::{mount_scene, unmount_scene};
use crate::systems::time::update_world_time;
use crate::systems::transition::{
    TransitionOrder, arm_late_reveal_groups, cancel_transition, force_transition,
    request_transition, transition_system,
};
use crate::systems::tween::tween_position_system;

type TransitionSystemId = SystemId<In<TransitionOrder>, Result<TransitionTicket, TransitionError>>;

/// One-shot systems registered in the world.
struct StageSystems {
    request: TransitionSystemId,
    force: TransitionSystemId,
    cancel: SystemId<(), bool>,
}

pub struct Stage {
    world: World,
    schedule: Schedule,
    systems: StageSystems,
}

impl Stage {
    /// Stage with headless camera and orbit controls.
    pub fn new(config: StageConfig, registry: SceneRegistry) -> Self {
        Self::with_handles(
            config,
            registry,
            PerspectiveCamera::default(),
            OrbitControls::default(),
        )
    }

    /// Stage driving the given camera and orbit controls.
    pub fn with_handles(
        config: StageConfig,
        registry: SceneRegistry,
        camera: impl CameraHandle,
        controls: impl OrbitControlHandle,
    ) -> Self {
        let registry = match config.reveal_stagger {
            Some(stagger) => registry.with_reveal_stagger(stagger),
            None => registry,
        };
        let mut loader = LoaderSequencer::default();
        loader.auto_launch = config.auto_launch;

        let router = Router::new(config.route_base.clone());
        let entry = router.resolve(&config.initial_route).unwrap_or_else(|e| {
            warn!("Ignoring initial route: {}, entering {}", e, SceneId::Home);
            SceneId::Home
        });
        let router = router.with_landing(entry.route());

        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        world.insert_resource(registry);
        world.insert_resource(TransitionState::default());
        world.insert_resource(InputGate::new(controls));
        world.insert_resource(SceneCamera::new(camera));
        world.insert_resource(MaterialStore::default());
        world.insert_resource(router);
        world.insert_resource(SceneHost::with_entry(entry));
        world.insert_resource(Session::default());
        world.insert_resource(HotspotDispatcher::default());
        world.insert_resource(loader);
        world.insert_resource(config);

        world.add_observer(observe_hotspot_activated);
        world.add_observer(observe_scene_mounted);
        world.add_observer(observe_transition_finished);
        world.add_observer(observe_loader_finished);

        let systems = StageSystems {
            request: world.register_system(request_transition),
            force: world.register_system(force_transition),
            cancel: world.register_system(cancel_transition),
        };
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                tween_position_system,
                loader_system,
                transition_system,
                arm_late_reveal_groups,
                reveal_system,
                hotspot_tint_system,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            systems,
        }
    }

    /// Begin the session: mount the entry scene when the loader has already
    /// been shown, otherwise bring up the loader.
    pub fn start(&mut self) {
        if self.world.resource::<StageConfig>().skip_loader {
            self.world.resource_mut::<Session>().mark_loading_shown();
        }
        if self.world.resource::<Session>().loading_shown() {
            let entry = self.entry_scene();
            info!("Loader already shown this session, mounting {}", entry);
            if let Err(e) = self.mount(entry) {
                error!("Could not mount {}: {}", entry, e);
            }
            return;
        }
        let mut loader = self.world.resource_mut::<LoaderSequencer>();
        if loader.auto_launch {
            loader.launch();
        } else {
            info!("Loader awaiting launch");
        }
    }

    /// Advance one frame of `dt` unscaled seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Activate a hotspot of the mounted scene.
    ///
    /// Returns the ticket of the transition it started, or `None` when the
    /// activation was dropped or debounced.
    pub fn activate_hotspot(&mut self, hotspot_id: &str) -> Option<TransitionTicket> {
        self.world.resource_mut::<HotspotDispatcher>().take_ticket();
        self.world.trigger(HotspotActivatedEvent::new(hotspot_id));
        self.world.flush();
        self.world.resource_mut::<HotspotDispatcher>().take_ticket()
    }

    pub fn request_transition(
        &mut self,
        order: TransitionOrder,
    ) -> Result<TransitionTicket, TransitionError> {
        self.run_order(self.systems.request, order)
    }

    pub fn force_transition(
        &mut self,
        order: TransitionOrder,
    ) -> Result<TransitionTicket, TransitionError> {
        self.run_order(self.systems.force, order)
    }

    /// Cancel the transition in flight. Returns false when there was none.
    pub fn cancel_transition(&mut self) -> bool {
        match self.world.run_system(self.systems.cancel) {
            Ok(cancelled) => cancelled,
            Err(e) => {
                error!("Transition engine failed to cancel: {}", e);
                false
            }
        }
    }

    /// Hand the camera back to the user after a cancelled transition.
    ///
    /// Applies the mounted scene's control policy. Does nothing and returns
    /// false while a transition is in flight or when no scene is mounted.
    pub fn unlock_input(&mut self) -> bool {
        if !self.world.resource::<TransitionState>().is_idle() {
            warn!("Not unlocking input while a transition is in flight");
            return false;
        }
        let Some(scene) = self.mounted_scene() else {
            return false;
        };
        let policy = match self.registry().get(scene) {
            Ok(def) => def.policy,
            Err(e) => {
                warn!("Cannot unlock input: {}", e);
                return false;
            }
        };
        self.world.resource_mut::<InputGate>().unlock(&policy);
        info!("Input unlocked with the {} controls", scene);
        true
    }

    fn run_order(
        &mut self,
        system: TransitionSystemId,
        order: TransitionOrder,
    ) -> Result<TransitionTicket, TransitionError> {
        self.world
            .run_system_with(system, order)
            .unwrap_or_else(|e| Err(TransitionError::EngineUnavailable(e.to_string())))
    }

    pub fn mount(&mut self, scene: SceneId) -> Result<(), TransitionError> {
        mount_scene(&mut self.world, scene)
    }

    pub fn unmount(&mut self) -> Option<SceneId> {
        unmount_scene(&mut self.world)
    }

    /// The launch button.
    pub fn launch_loader(&mut self) -> bool {
        self.world.resource_mut::<LoaderSequencer>().launch()
    }

    pub fn cancel_loader(&mut self) {
        self.world.resource_mut::<LoaderSequencer>().cancel();
    }

    /// Forget the loader and visited hotspots, as for a new visitor.
    pub fn reset_session(&mut self) {
        self.world.resource_mut::<Session>().reset();
    }

    /// Nothing is animating: no transition in flight and no loader running.
    pub fn is_settled(&self) -> bool {
        self.transition_phase() == TransitionPhase::Idle
            && self.loader().state() != LoaderState::Running
    }

    pub fn transition_phase(&self) -> TransitionPhase {
        self.world.resource::<TransitionState>().phase()
    }

    pub fn camera_position(&self) -> Vec3 {
        self.world.resource::<SceneCamera>().position()
    }

    pub fn camera_forward(&self) -> Vec3 {
        self.world.resource::<SceneCamera>().forward()
    }

    pub fn mounted_scene(&self) -> Option<SceneId> {
        self.world.resource::<SceneHost>().mounted()
    }

    /// Scene a session enters on.
    pub fn entry_scene(&self) -> SceneId {
        self.world.resource::<SceneHost>().entry()
    }

    pub fn gate(&self) -> &InputGate {
        self.world.resource::<InputGate>()
    }

    pub fn router(&self) -> &Router {
        self.world.resource::<Router>()
    }

    pub fn session(&self) -> &Session {
        self.world.resource::<Session>()
    }

    pub fn loader(&self) -> &LoaderSequencer {
        self.world.resource::<LoaderSequencer>()
    }

    pub fn registry(&self) -> &SceneRegistry {
        self.world.resource::<SceneRegistry>()
    }

    pub fn materials(&self) -> &MaterialStore {
        self.world.resource::<MaterialStore>()
    }

    pub fn materials_mut(&mut self) -> Mut<'_, MaterialStore> {
        self.world.resource_mut::<MaterialStore>()
    }

    pub fn dispatcher(&self) -> &HotspotDispatcher {
        self.world.resource::<HotspotDispatcher>()
    }

    pub fn config(&self) -> &StageConfig {
        self.world.resource::<StageConfig>()
    }

    pub fn elapsed(&self) -> f32 {
        self.world.resource::<WorldTime>().elapsed
    }

    /// Reveal group of `scene`, if one is spawned.
    pub fn reveal_group(&mut self, scene: SceneId) -> Option<RevealGroup> {
        self.world
            .query::<&RevealGroup>()
            .iter(&self.world)
            .find(|g| g.scene == scene)
            .cloned()
    }

    /// Label tint of a mounted hotspot.
    pub fn hotspot_tint(&mut self, hotspot_id: &str) -> Option<Tint> {
        self.world
            .query::<(&Hotspot, &Tint)>()
            .iter(&self.world)
            .find(|(h, _)| h.id == hotspot_id)
            .map(|(_, tint)| *tint)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
