//! stardust headless runner.
//!
//! Simulates a visit to the portfolio frame by frame and logs the
//! choreography: the launch loader, the entry scene's flight in, then an
//! optional tour through sub-scenes by clicking their hotspots (and the
//! spaceship to fly back home in between).
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --tour about,projects --fps 30
//! cargo run -- --route /Space_Portofilio/projects --skip-loader
//! cargo run -- --dump-scenes scenes.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use stardust::resources::loader::LoaderState;
use stardust::resources::sceneregistry::{SceneId, SceneRegistry};
use stardust::resources::stageconfig::StageConfig;
use stardust::stage::Stage;

/// Hotspot that flies back to the home scene from any sub-scene.
const HOME_HOTSPOT: &str = "spaceship";

/// Scene-transition choreographer for the space portfolio
#[derive(Parser, Debug)]
#[command(version, about = "Headless simulation of the space portfolio's scene choreography")]
struct Cli {
    /// INI configuration file (default: ./stardust.ini, optional).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON scene table overriding the built-in scenes.
    #[arg(long, value_name = "PATH")]
    scenes: Option<PathBuf>,

    /// Comma-separated scenes to visit after the entry flight lands.
    #[arg(long, value_name = "SCENES", value_delimiter = ',')]
    tour: Vec<SceneId>,

    /// Route the visit lands on (e.g. /projects); defaults to home.
    #[arg(long, value_name = "ROUTE")]
    route: Option<String>,

    /// Start as if the loader had already been shown.
    #[arg(long)]
    skip_loader: bool,

    /// Simulated frames per second.
    #[arg(long, value_name = "N")]
    fps: Option<u32>,

    /// Write the scene table as JSON and exit.
    /// Optionally provide a path (default: stdout).
    #[arg(long, value_name = "PATH")]
    dump_scenes: Option<Option<PathBuf>>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = StageConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                error!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            config
        }
        None => {
            let mut config = StageConfig::new();
            if config.load_from_file().is_err() {
                info!("No config at {:?}, using defaults", config.config_path);
            }
            config
        }
    };
    if let Some(scenes) = cli.scenes {
        config.scenes_path = Some(scenes);
    }
    if let Some(route) = cli.route {
        config.initial_route = route;
    }
    if cli.skip_loader {
        config.skip_loader = true;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = fps.max(1);
    }

    let registry = match &config.scenes_path {
        Some(path) => match SceneRegistry::load_from_file(path) {
            Ok(registry) => registry,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SceneRegistry::builtin(),
    };

    // Early-exit: dump the scene table
    if let Some(maybe_path) = cli.dump_scenes {
        return dump_scenes(&registry, maybe_path);
    }

    run(config, registry, &cli.tour);
    ExitCode::SUCCESS
}

fn dump_scenes(registry: &SceneRegistry, path: Option<PathBuf>) -> ExitCode {
    let result = match path {
        Some(path) => registry.save_to_file(&path),
        None => registry.to_json().map(|json| println!("{}", json)),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Could not dump scenes: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Frame budget shared by every phase of the run.
struct Clock {
    dt: f32,
    frames_left: u64,
}

impl Clock {
    /// Tick until the stage is settled. Returns false if the budget ran out.
    fn settle(&mut self, stage: &mut Stage) -> bool {
        let mut shown: Vec<String> = Vec::new();
        while !stage.is_settled() {
            if self.frames_left == 0 {
                return false;
            }
            stage.tick(self.dt);
            self.frames_left -= 1;

            if stage.loader().state() == LoaderState::Running {
                let visible: Vec<String> = stage
                    .loader()
                    .visible_messages()
                    .into_iter()
                    .map(|(message, _)| message.to_string())
                    .collect();
                for message in visible.iter().filter(|m| !shown.contains(m)) {
                    info!("[{:6.2}s] {}", stage.elapsed(), message);
                }
                shown = visible;
            }
        }
        true
    }
}

fn run(config: StageConfig, registry: SceneRegistry, tour: &[SceneId]) {
    let mut clock = Clock {
        dt: config.frame_delta(),
        frames_left: (config.max_seconds * config.target_fps as f32) as u64,
    };
    let mut stage = Stage::new(config, registry);
    stage.start();
    if stage.loader().state() == LoaderState::AwaitingStart {
        // nobody is here to press the launch button
        stage.launch_loader();
    }

    if !clock.settle(&mut stage) {
        warn!("Simulation budget exhausted before the entry flight landed");
        return;
    }
    info!(
        "Landed at {} (camera {})",
        stage.router().location(),
        stage.camera_position()
    );

    for &scene in tour {
        if stage.mounted_scene() != Some(SceneId::Home) && !visit(&mut stage, &mut clock, HOME_HOTSPOT) {
            return;
        }
        if scene == SceneId::Home {
            continue;
        }
        if !visit(&mut stage, &mut clock, scene.name()) {
            return;
        }
    }

    let session = stage.session();
    info!(
        "Done after {:.2}s: {} navigations, {} hotspots visited, at {}",
        stage.elapsed(),
        stage.router().history().len(),
        session.visited_count(),
        stage.router().location()
    );
}

/// Click a hotspot and wait for the target scene's entry flight to land.
fn visit(stage: &mut Stage, clock: &mut Clock, hotspot_id: &str) -> bool {
    if stage.activate_hotspot(hotspot_id).is_none() {
        warn!("Hotspot '{}' did not start a transition", hotspot_id);
        return false;
    }
    if !clock.settle(stage) {
        warn!("Simulation budget exhausted while following '{}'", hotspot_id);
        return false;
    }
    info!(
        "Arrived at {} (camera {}, zoom {}, pan {})",
        stage.router().location(),
        stage.camera_position(),
        stage.gate().controls().zoom_enabled(),
        stage.gate().controls().pan_enabled()
    );
    true
}
