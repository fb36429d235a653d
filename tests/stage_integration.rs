//! Stage integration tests: session start, hotspot dispatch, navigation
//! with scene remounting, visited labels, lifecycle events and non-fatal
//! cleanup.

use bevy_ecs::prelude::*;
use glam::Vec3;

use stardust::components::hotspot::Hotspot;
use stardust::components::revealgroup::RevealGroup;
use stardust::components::scenemember::SceneMember;
use stardust::components::tint::Tint;
use stardust::components::worldposition::WorldPosition;
use stardust::events::scene::SceneUnmountedEvent;
use stardust::events::transition::TransitionStartedEvent;
use stardust::resources::materials::{MaterialHandle, SceneMaterial};
use stardust::resources::sceneregistry::{SceneId, SceneRegistry};
use stardust::resources::stageconfig::StageConfig;
use stardust::resources::transitionstate::{TransitionPhase, TransitionResult, TransitionState};
use stardust::stage::Stage;
use stardust::systems::transition::TransitionOrder;

/// 1/64 s: exact in f32, so scene durations land on whole frames.
const DT: f32 = 1.0 / 64.0;
const EPSILON: f32 = 1e-3;

fn approx_eq_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn run_for(stage: &mut Stage, seconds: f32) {
    let frames = (seconds / DT).round() as usize;
    for _ in 0..frames {
        stage.tick(DT);
    }
}

/// Tick until nothing animates, with a generous cap.
fn settle(stage: &mut Stage) {
    for _ in 0..(30.0 / DT) as usize {
        if stage.is_settled() {
            return;
        }
        stage.tick(DT);
    }
    panic!("stage did not settle");
}

fn skip_loader_config() -> StageConfig {
    let mut config = StageConfig::new();
    config.skip_loader = true;
    config
}

/// Stage that has landed on the home scene.
fn home_stage() -> Stage {
    let mut stage = Stage::new(skip_loader_config(), SceneRegistry::builtin());
    stage.start();
    settle(&mut stage);
    stage
}

fn hotspot_count(stage: &mut Stage) -> usize {
    stage.world_mut().query::<&Hotspot>().iter(stage.world()).count()
}

fn transition_elapsed(stage: &Stage) -> f32 {
    stage.world().resource::<TransitionState>().elapsed()
}

/// Lifecycle events seen by the test observers, in trigger order.
#[derive(Resource, Default)]
struct Lifecycle {
    started: Vec<(SceneId, Option<String>)>,
    unmounted: Vec<SceneId>,
}

fn record_lifecycle(stage: &mut Stage) {
    let world = stage.world_mut();
    world.insert_resource(Lifecycle::default());
    world.add_observer(|trigger: On<TransitionStartedEvent>, mut log: ResMut<Lifecycle>| {
        let event = trigger.event();
        log.started.push((event.target, event.hotspot.clone()));
    });
    world.add_observer(|trigger: On<SceneUnmountedEvent>, mut log: ResMut<Lifecycle>| {
        log.unmounted.push(trigger.event().scene);
    });
    world.flush();
}

#[test]
fn skip_loader_mounts_home_and_plays_entry() {
    let mut stage = Stage::new(skip_loader_config(), SceneRegistry::builtin());
    stage.start();

    assert!(stage.session().loading_shown());
    assert_eq!(stage.mounted_scene(), Some(SceneId::Home));
    assert_eq!(stage.transition_phase(), TransitionPhase::InFlight);
    assert!(stage.gate().is_locked());
    assert_eq!(stage.camera_position(), Vec3::new(0.0, 0.0, 20.0));
    assert_eq!(hotspot_count(&mut stage), 4);

    run_for(&mut stage, 4.5 - DT);
    assert!(stage.gate().is_locked());
    stage.tick(DT);

    assert_eq!(stage.transition_phase(), TransitionPhase::Idle);
    assert!(approx_eq_vec(stage.camera_position(), Vec3::new(0.0, 0.0, 6.0)));
    assert_eq!(stage.gate().unlock_count(), 1);
    assert_eq!(stage.gate().controls().distance_bounds(), (5.0, 20.0));
    assert!(!stage.gate().controls().zoom_enabled());
    // the entry flight does not navigate
    assert!(stage.router().history().is_empty());
    assert_eq!(stage.router().location(), "/Space_Portofilio/");
}

#[test]
fn hotspot_ignored_during_entry_flight() {
    let mut stage = Stage::new(skip_loader_config(), SceneRegistry::builtin());
    stage.start();
    run_for(&mut stage, 1.0);

    assert!(stage.activate_hotspot("about").is_none());
    assert_eq!(stage.dispatcher().ignored(), 1);
    assert!(!stage.session().is_visited("about"));
    assert_eq!(stage.hotspot_tint("about"), Some(Tint::for_label(false)));
}

#[test]
fn hotspot_dive_navigates_and_remounts_target() {
    let mut stage = home_stage();
    let mut ticket = stage.activate_hotspot("about").expect("transition started");
    assert_eq!(stage.dispatcher().accepted(), 1);
    assert!(stage.session().is_visited("about"));
    assert!(stage.gate().is_locked());

    run_for(&mut stage, 4.0 - DT);
    assert!(ticket.is_pending());
    assert_eq!(stage.mounted_scene(), Some(SceneId::Home));
    stage.tick(DT);

    assert_eq!(ticket.try_result(), Some(TransitionResult { completed: true }));
    assert_eq!(stage.router().history(), ["/about"]);
    assert_eq!(stage.router().location(), "/Space_Portofilio/about");
    // the target scene is mounted and replays its own entry flight
    assert_eq!(stage.mounted_scene(), Some(SceneId::About));
    assert_eq!(stage.transition_phase(), TransitionPhase::InFlight);
    assert_eq!(stage.camera_position(), Vec3::new(0.0, 0.0, 50.0));
    assert_eq!(hotspot_count(&mut stage), 1);
    assert_eq!(stage.materials().count(SceneId::Home), 0);

    settle(&mut stage);
    assert!(approx_eq_vec(stage.camera_position(), Vec3::new(0.0, 0.0, 9.0)));
    assert_eq!(stage.gate().controls().distance_bounds(), (2.0, 9.0));
    assert_eq!(stage.router().history().len(), 1);

    run_for(&mut stage, 1.0);
    let group = stage.reveal_group(SceneId::About).expect("about reveals");
    assert!(group.is_finished());
    assert_eq!(group.element("inner_body").unwrap().offset, Vec3::ZERO);
}

#[test]
fn second_hotspot_is_debounced() {
    let mut stage = home_stage();
    let first = stage.activate_hotspot("about");
    let second = stage.activate_hotspot("contact");

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(stage.dispatcher().accepted(), 1);
    assert_eq!(stage.dispatcher().ignored(), 1);
    assert!(!stage.session().is_visited("contact"));

    run_for(&mut stage, 4.0);
    assert_eq!(stage.router().history(), ["/about"]);
}

#[test]
fn unknown_hotspot_is_dropped() {
    let mut stage = home_stage();
    assert!(stage.activate_hotspot("blackhole").is_none());
    // the spaceship only exists in sub-scenes
    assert!(stage.activate_hotspot("spaceship").is_none());

    assert_eq!(stage.transition_phase(), TransitionPhase::Idle);
    assert_eq!(stage.dispatcher().accepted(), 0);
    assert_eq!(stage.dispatcher().ignored(), 0);
    assert_eq!(stage.session().visited_count(), 0);
}

#[test]
fn visited_labels_stay_gray_across_remounts() {
    let mut stage = home_stage();
    stage.activate_hotspot("about").expect("dive to about");
    settle(&mut stage);
    assert_eq!(stage.mounted_scene(), Some(SceneId::About));

    stage.activate_hotspot("spaceship").expect("fly home");
    settle(&mut stage);
    assert_eq!(stage.mounted_scene(), Some(SceneId::Home));
    assert_eq!(stage.router().history(), ["/about", "/"]);
    assert_eq!(stage.router().location(), "/Space_Portofilio/");

    assert_eq!(stage.hotspot_tint("about"), Some(Tint::for_label(true)));
    assert_eq!(stage.hotspot_tint("contact"), Some(Tint::for_label(false)));
    assert_eq!(stage.session().visited_count(), 2);

    stage.reset_session();
    stage.tick(DT);
    assert_eq!(stage.hotspot_tint("about"), Some(Tint::for_label(false)));
    assert!(!stage.session().loading_shown());
}

#[test]
fn full_tour_visits_every_scene() {
    let mut stage = home_stage();
    for (hotspot, scene) in [
        ("about", SceneId::About),
        ("knowledge", SceneId::Knowledge),
        ("projects", SceneId::Projects),
        ("contact", SceneId::Contact),
    ] {
        stage.activate_hotspot(hotspot).expect("dive");
        settle(&mut stage);
        assert_eq!(stage.mounted_scene(), Some(scene));
        let end = stage.registry().get(scene).unwrap().camera_end;
        assert!(approx_eq_vec(stage.camera_position(), end));

        stage.activate_hotspot("spaceship").expect("return");
        settle(&mut stage);
        assert_eq!(stage.mounted_scene(), Some(SceneId::Home));
    }
    assert_eq!(
        stage.router().history(),
        ["/about", "/", "/knowledge", "/", "/projects", "/", "/contact", "/"]
    );
    assert_eq!(stage.dispatcher().accepted(), 8);
    assert_eq!(stage.session().visited_count(), 5);
    assert_eq!(stage.materials().failure_count(), 0);
}

#[test]
fn material_disposal_failure_is_not_fatal() {
    let mut stage = home_stage();
    let mut broken = SceneMaterial::new("home/broken");
    broken.dispose().unwrap();
    stage.materials_mut().register(SceneId::Home, broken);

    stage.activate_hotspot("projects").expect("dive");
    settle(&mut stage);

    assert_eq!(stage.materials().failure_count(), 1);
    assert_eq!(stage.mounted_scene(), Some(SceneId::Projects));
    assert_eq!(stage.materials().count(SceneId::Projects), 5);
}

#[test]
fn late_reveal_group_joins_the_running_entry() {
    let mut stage = home_stage();
    stage.activate_hotspot("projects").expect("dive");
    run_for(&mut stage, 4.0);
    assert_eq!(stage.mounted_scene(), Some(SceneId::Projects));
    run_for(&mut stage, 1.0);

    let specs = stage.registry().get(SceneId::Projects).unwrap().reveals.clone();
    let late = stage
        .world_mut()
        .spawn((
            RevealGroup::new(SceneId::Projects, &specs),
            SceneMember {
                scene: SceneId::Projects,
            },
        ))
        .id();
    stage.tick(DT);

    let group = stage.world().get::<RevealGroup>(late).unwrap().clone();
    assert!(group.is_armed());
    assert_eq!(group.clock, Some(transition_elapsed(&stage)));
    assert!(group.clock.unwrap() >= 1.0);
    // body on the staggered slot, cards on their own schedule
    let starts: Vec<f32> = group.elements.iter().filter_map(|e| e.start_offset).collect();
    assert_eq!(starts.len(), 4);
    for (start, expected) in starts.iter().zip([2.0, 2.0, 2.2, 2.4]) {
        assert!((start - expected).abs() < EPSILON, "{} != {}", start, expected);
    }

    settle(&mut stage);
    run_for(&mut stage, 2.0);
    assert!(stage.world().get::<RevealGroup>(late).unwrap().is_finished());

    stage.unmount();
    assert!(stage.world().get_entity(late).is_err());
}

#[test]
fn hotspot_labels_float() {
    let mut stage = home_stage();
    let rest = stage.registry().get(SceneId::Home).unwrap().hotspots[0].position;
    run_for(&mut stage, 1.0);

    let mut query = stage.world_mut().query::<(&Hotspot, &WorldPosition)>();
    let (_, pos) = query
        .iter(stage.world())
        .find(|(h, _)| h.id == "about")
        .unwrap();
    assert!(pos.pos.y > rest.y);
    assert!(pos.pos.y <= rest.y + 0.2 + EPSILON);
    assert!((pos.pos.x - rest.x).abs() < EPSILON);
}

#[test]
fn cancel_leaves_gate_locked_until_next_landing() {
    let mut stage = Stage::new(skip_loader_config(), SceneRegistry::builtin());
    stage.start();
    run_for(&mut stage, 2.0);
    let stopped_at = stage.camera_position();

    assert!(stage.cancel_transition());
    assert!(!stage.cancel_transition());
    assert!(stage.gate().is_locked());
    run_for(&mut stage, 1.0);
    assert_eq!(stage.camera_position(), stopped_at);

    stage.activate_hotspot("knowledge").expect("dive after cancel");
    settle(&mut stage);
    assert!(!stage.gate().is_locked());
    assert_eq!(stage.mounted_scene(), Some(SceneId::Knowledge));
}

#[test]
fn force_transition_overrides_entry_flight() {
    let mut stage = Stage::new(skip_loader_config(), SceneRegistry::builtin());
    stage.start();
    run_for(&mut stage, 1.0);

    let from = stage.camera_position();
    let mut ticket = stage
        .force_transition(TransitionOrder::new(SceneId::Contact, from).navigating())
        .unwrap();
    run_for(&mut stage, 4.0);

    assert_eq!(ticket.try_result(), Some(TransitionResult { completed: true }));
    assert_eq!(stage.router().history(), ["/contact"]);
    assert_eq!(stage.mounted_scene(), Some(SceneId::Contact));
}

#[test]
fn unmount_cancels_flight_and_clears_scene() {
    let mut stage = Stage::new(skip_loader_config(), SceneRegistry::builtin());
    stage.start();
    run_for(&mut stage, 1.0);

    assert_eq!(stage.unmount(), Some(SceneId::Home));
    assert_eq!(stage.transition_phase(), TransitionPhase::Idle);
    assert_eq!(stage.mounted_scene(), None);
    assert_eq!(hotspot_count(&mut stage), 0);
    assert_eq!(stage.unmount(), None);
}

#[test]
fn unmount_mid_dive_resolves_ticket_and_freezes_camera() {
    let mut stage = home_stage();
    let mut ticket = stage.activate_hotspot("about").expect("dive");
    run_for(&mut stage, 1.0);
    let stopped_at = stage.camera_position();

    assert_eq!(stage.unmount(), Some(SceneId::Home));
    assert_eq!(ticket.try_result(), Some(TransitionResult { completed: false }));
    assert!(stage.router().history().is_empty());
    assert!(stage.gate().is_locked());

    run_for(&mut stage, 4.0);
    assert_eq!(stage.camera_position(), stopped_at);
    assert!(stage.router().history().is_empty());
    assert_eq!(stage.mounted_scene(), None);
    assert!(stage.gate().is_locked());
}

#[test]
fn dive_reports_start_and_unmount_events() {
    let mut stage = home_stage();
    record_lifecycle(&mut stage);

    stage.activate_hotspot("about").expect("dive");
    {
        let log = stage.world().resource::<Lifecycle>();
        assert_eq!(log.started, [(SceneId::About, Some("about".to_string()))]);
        assert!(log.unmounted.is_empty());
    }

    settle(&mut stage);
    let log = stage.world().resource::<Lifecycle>();
    // the dive, then the entry flight of the remounted scene
    assert_eq!(
        log.started,
        [(SceneId::About, Some("about".to_string())), (SceneId::About, None)]
    );
    assert_eq!(log.unmounted, [SceneId::Home]);

    stage.unmount();
    assert_eq!(stage.world().resource::<Lifecycle>().unmounted, [SceneId::Home, SceneId::About]);
}

#[test]
fn unlock_input_restores_scene_controls_after_cancel() {
    let mut stage = home_stage();
    stage.activate_hotspot("about").expect("dive");
    // refused while the dive is in flight
    assert!(!stage.unlock_input());
    run_for(&mut stage, 1.0);

    assert!(stage.cancel_transition());
    assert!(stage.gate().is_locked());
    let unlocks = stage.gate().unlock_count();

    assert!(stage.unlock_input());
    assert!(!stage.gate().is_locked());
    assert_eq!(stage.gate().unlock_count(), unlocks + 1);
    assert_eq!(stage.gate().controls().distance_bounds(), (5.0, 20.0));
    assert!(!stage.gate().controls().zoom_enabled());

    stage.unmount();
    assert!(!stage.unlock_input());
}

#[test]
fn initial_route_selects_the_entry_scene() {
    let mut config = skip_loader_config();
    config.initial_route = "/Space_Portofilio/projects".to_string();
    let mut stage = Stage::new(config, SceneRegistry::builtin());
    assert_eq!(stage.entry_scene(), SceneId::Projects);
    assert_eq!(stage.router().location(), "/Space_Portofilio/projects");

    stage.start();
    assert_eq!(stage.mounted_scene(), Some(SceneId::Projects));
    assert_eq!(stage.camera_position(), Vec3::new(0.0, 0.0, 70.0));
    settle(&mut stage);
    assert!(approx_eq_vec(stage.camera_position(), Vec3::new(0.0, 0.0, 12.0)));
    assert_eq!(stage.gate().controls().distance_bounds(), (2.0, 20.0));
    assert!(stage.router().history().is_empty());

    stage.activate_hotspot("spaceship").expect("fly home");
    settle(&mut stage);
    assert_eq!(stage.mounted_scene(), Some(SceneId::Home));
    assert_eq!(stage.router().location(), "/Space_Portofilio/");
}

#[test]
fn unknown_initial_route_falls_back_to_home() {
    let mut config = skip_loader_config();
    config.initial_route = "/blackhole".to_string();
    let mut stage = Stage::new(config, SceneRegistry::builtin());
    assert_eq!(stage.entry_scene(), SceneId::Home);

    stage.start();
    assert_eq!(stage.mounted_scene(), Some(SceneId::Home));
    assert_eq!(stage.router().location(), "/Space_Portofilio/");
}

#[test]
fn config_scales_time_and_overrides_stagger() {
    let mut config = skip_loader_config();
    config.time_scale = 2.0;
    config.reveal_stagger = Some(0.3);
    let mut stage = Stage::new(config, SceneRegistry::builtin());

    for scene in SceneId::ALL {
        assert_eq!(stage.registry().get(scene).unwrap().reveal_stagger, 0.3);
    }

    stage.start();
    run_for(&mut stage, 2.25);
    assert_eq!(stage.transition_phase(), TransitionPhase::Idle);
    assert!(approx_eq_vec(stage.camera_position(), Vec3::new(0.0, 0.0, 6.0)));
}
