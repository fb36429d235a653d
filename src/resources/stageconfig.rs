//! Stage configuration resource.
//!
//! Settings loaded from an INI configuration file. Provides defaults for a
//! safe start and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [scenes]
//! path = ./scenes.json
//!
//! [router]
//! base = /Space_Portofilio
//! initial = /
//!
//! [loader]
//! auto_launch = false
//! skip = false
//!
//! [transition]
//! reveal_stagger = 0.1
//!
//! [simulation]
//! fps = 60
//! time_scale = 1.0
//! max_seconds = 120
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::router::DEFAULT_ROUTE_BASE;

/// Default safe values for startup
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_MAX_SECONDS: f32 = 120.0;
const DEFAULT_AUTO_LAUNCH: bool = false;
const DEFAULT_SKIP_LOADER: bool = false;
const DEFAULT_INITIAL_ROUTE: &str = "/";
const DEFAULT_CONFIG_PATH: &str = "./stardust.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StageConfig {
    /// Optional JSON scene table laid over the built-in scenes.
    pub scenes_path: Option<PathBuf>,
    /// Base path prefixed to every route.
    pub route_base: String,
    /// Route the visit lands on, with or without the base.
    pub initial_route: String,
    /// Start the loader as soon as the stage starts.
    pub auto_launch: bool,
    /// Behave as if the loader had already been shown.
    pub skip_loader: bool,
    /// Overrides every scene's reveal stagger when set.
    pub reveal_stagger: Option<f32>,
    /// Simulated frames per second.
    pub target_fps: u32,
    /// Multiplier applied to frame deltas.
    pub time_scale: f32,
    /// Simulation cap for the headless run, in simulated seconds.
    pub max_seconds: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StageConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            scenes_path: None,
            route_base: DEFAULT_ROUTE_BASE.to_string(),
            initial_route: DEFAULT_INITIAL_ROUTE.to_string(),
            auto_launch: DEFAULT_AUTO_LAUNCH,
            skip_loader: DEFAULT_SKIP_LOADER,
            reveal_stagger: None,
            target_fps: DEFAULT_TARGET_FPS,
            time_scale: DEFAULT_TIME_SCALE,
            max_seconds: DEFAULT_MAX_SECONDS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Seconds per simulated frame.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [scenes] section
        if let Some(path) = config.get("scenes", "path").filter(|p| !p.trim().is_empty()) {
            self.scenes_path = Some(PathBuf::from(path.trim()));
        }

        // [router] section
        if let Some(base) = config.get("router", "base") {
            self.route_base = base.trim().to_string();
        }
        if let Some(initial) = config.get("router", "initial").filter(|r| !r.trim().is_empty()) {
            self.initial_route = initial.trim().to_string();
        }

        // [loader] section
        if let Some(auto_launch) = config.getbool("loader", "auto_launch").ok().flatten() {
            self.auto_launch = auto_launch;
        }
        if let Some(skip) = config.getbool("loader", "skip").ok().flatten() {
            self.skip_loader = skip;
        }

        // [transition] section
        if let Some(stagger) = config.getfloat("transition", "reveal_stagger").ok().flatten() {
            self.reveal_stagger = Some((stagger as f32).max(0.0));
        }

        // [simulation] section
        if let Some(fps) = config.getuint("simulation", "fps").ok().flatten() {
            self.target_fps = (fps as u32).max(1);
        }
        if let Some(scale) = config.getfloat("simulation", "time_scale").ok().flatten() {
            self.time_scale = (scale as f32).max(0.0);
        }
        if let Some(max) = config.getfloat("simulation", "max_seconds").ok().flatten() {
            self.max_seconds = (max as f32).max(0.0);
        }

        info!(
            "Loaded config: scenes={:?}, base={}, initial={}, auto_launch={}, skip_loader={}, fps={}, time_scale={}",
            self.scenes_path,
            self.route_base,
            self.initial_route,
            self.auto_launch,
            self.skip_loader,
            self.target_fps,
            self.time_scale
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        if let Some(path) = &self.scenes_path {
            config.set("scenes", "path", Some(path.display().to_string()));
        }

        config.set("router", "base", Some(self.route_base.clone()));
        config.set("router", "initial", Some(self.initial_route.clone()));

        config.set("loader", "auto_launch", Some(self.auto_launch.to_string()));
        config.set("loader", "skip", Some(self.skip_loader.to_string()));

        if let Some(stagger) = self.reveal_stagger {
            config.set("transition", "reveal_stagger", Some(stagger.to_string()));
        }

        config.set("simulation", "fps", Some(self.target_fps.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));
        config.set("simulation", "max_seconds", Some(self.max_seconds.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
