//! Scene registry resource.
//!
//! Static table mapping every [`SceneId`] to its [`SceneDef`]: the entry
//! camera path, the control policy restored when a transition lands, the
//! reveal layout and the hotspot bindings. All per-scene choreography lives
//! here as data; the transition engine itself is scene-agnostic.
//!
//! The built-in table can be overridden from a JSON file with the same
//! schema that [`SceneRegistry::to_json`] produces:
//!
//! ```json
//! {
//!   "scenes": [
//!     {
//!       "id": "about",
//!       "camera_start": [0.0, 0.0, 50.0],
//!       "camera_end": [0.0, 0.0, 9.0],
//!       "duration": 4.0,
//!       "easing": "power2.inOut",
//!       "reveal_lead": 0.5,
//!       "reveals": [{ "name": "inner_body", "from_offset": [0.0, 100.0, 0.0], "duration": 1.0 }]
//!     }
//!   ]
//! }
//! ```
//!
//! Scenes present in the file replace their built-in definition; scenes
//! missing from it keep the built-in one.
//!
//! # Related
//! - [`crate::resources::transitionstate`] – consumes definitions to plan transitions
//! - [`crate::systems::scenehost`] – spawns hotspots and reveal groups from them

use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::tween::Easing;
use crate::resources::transitionstate::TransitionError;

/// Default delay between consecutive reveal elements.
pub const DEFAULT_REVEAL_STAGGER: f32 = 0.1;

/// The fixed set of navigable scenes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SceneId {
    #[default]
    Home,
    About,
    Knowledge,
    Projects,
    Contact,
}

impl SceneId {
    pub const ALL: [SceneId; 5] = [
        SceneId::Home,
        SceneId::About,
        SceneId::Knowledge,
        SceneId::Projects,
        SceneId::Contact,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SceneId::Home => "home",
            SceneId::About => "about",
            SceneId::Knowledge => "knowledge",
            SceneId::Projects => "projects",
            SceneId::Contact => "contact",
        }
    }

    /// Route path of the scene, relative to the router base.
    pub fn route(&self) -> &'static str {
        match self {
            SceneId::Home => "/",
            SceneId::About => "/about",
            SceneId::Knowledge => "/knowledge",
            SceneId::Projects => "/projects",
            SceneId::Contact => "/contact",
        }
    }

    /// Scene whose route matches `route` exactly.
    pub fn from_route(route: &str) -> Option<SceneId> {
        SceneId::ALL.into_iter().find(|s| s.route() == route)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneId {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SceneId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| TransitionError::InvalidSceneTarget(needle.to_string()))
    }
}

/// Orbit-control settings applied when a transition into the scene completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPolicy {
    pub rotate: bool,
    pub zoom: bool,
    pub pan: bool,
    /// Polar angle bounds in radians.
    pub min_polar: f32,
    pub max_polar: f32,
    /// Orbit distance bounds.
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlPolicy {
    /// Horizontal-only orbit: rotate on the equator, no zoom, no pan.
    fn default() -> Self {
        Self {
            rotate: true,
            zoom: false,
            pan: false,
            min_polar: FRAC_PI_2,
            max_polar: FRAC_PI_2,
            min_distance: 0.0,
            max_distance: f32::MAX,
        }
    }
}

impl ControlPolicy {
    pub fn with_distance(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Bounds must be ordered numbers; distances cannot be negative.
    fn validate(&self) -> Result<(), &'static str> {
        let bounds = [self.min_polar, self.max_polar, self.min_distance, self.max_distance];
        if bounds.iter().any(|b| b.is_nan()) {
            return Err("control policy bounds must be numbers");
        }
        if self.min_polar > self.max_polar {
            return Err("min_polar exceeds max_polar");
        }
        if self.min_distance < 0.0 {
            return Err("min_distance must be non-negative");
        }
        if self.min_distance > self.max_distance {
            return Err("min_distance exceeds max_distance");
        }
        Ok(())
    }
}

/// Layout of one element of a scene's reveal group.
///
/// Elements animate from their `from_*` values to full presence: opacity
/// `to_opacity`, zero offset from their rest position and `to_scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSpec {
    pub name: String,
    pub from_opacity: f32,
    pub to_opacity: f32,
    pub from_offset: Vec3,
    pub from_scale: f32,
    pub to_scale: f32,
    pub duration: f32,
    pub easing: Easing,
    /// Fixed start, in seconds after transition start. Overrides the
    /// staggered slot the element would otherwise get.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<f32>,
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            from_opacity: 0.0,
            to_opacity: 1.0,
            from_offset: Vec3::ZERO,
            from_scale: 1.0,
            to_scale: 1.0,
            duration: 1.0,
            easing: Easing::CubicOut,
            start_at: None,
        }
    }
}

impl RevealSpec {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            ..Self::default()
        }
    }
    pub fn with_opacity(mut self, from: f32, to: f32) -> Self {
        self.from_opacity = from;
        self.to_opacity = to;
        self
    }
    pub fn with_offset(mut self, from_offset: Vec3) -> Self {
        self.from_offset = from_offset;
        self
    }
    pub fn with_scale(mut self, from: f32, to: f32) -> Self {
        self.from_scale = from;
        self.to_scale = to;
        self
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
    pub fn with_start_at(mut self, seconds: f32) -> Self {
        self.start_at = Some(seconds);
        self
    }
}

/// A clickable hotspot placed in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotBinding {
    pub id: String,
    pub target: SceneId,
    #[serde(default)]
    pub position: Vec3,
}

impl HotspotBinding {
    pub fn new(id: impl Into<String>, target: SceneId, position: Vec3) -> Self {
        Self {
            id: id.into(),
            target,
            position,
        }
    }
}

/// Immutable description of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub id: SceneId,
    pub camera_start: Vec3,
    pub camera_end: Vec3,
    #[serde(default)]
    pub look_at: Vec3,
    pub duration: f32,
    #[serde(default = "default_easing")]
    pub easing: Easing,
    #[serde(default)]
    pub policy: ControlPolicy,
    /// Seconds before the camera lands at which the reveals begin.
    #[serde(default)]
    pub reveal_lead: f32,
    #[serde(default = "default_stagger")]
    pub reveal_stagger: f32,
    #[serde(default)]
    pub reveals: Vec<RevealSpec>,
    #[serde(default)]
    pub hotspots: Vec<HotspotBinding>,
}

fn default_stagger() -> f32 {
    DEFAULT_REVEAL_STAGGER
}

fn default_easing() -> Easing {
    Easing::CubicInOut
}

impl SceneDef {
    pub fn new(id: SceneId, camera_start: Vec3, camera_end: Vec3, duration: f32) -> Self {
        Self {
            id,
            camera_start,
            camera_end,
            look_at: Vec3::ZERO,
            duration,
            easing: Easing::CubicInOut,
            policy: ControlPolicy::default(),
            reveal_lead: 0.0,
            reveal_stagger: DEFAULT_REVEAL_STAGGER,
            reveals: Vec::new(),
            hotspots: Vec::new(),
        }
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
    pub fn with_policy(mut self, policy: ControlPolicy) -> Self {
        self.policy = policy;
        self
    }
    pub fn with_reveals(mut self, lead: f32, stagger: f32, reveals: Vec<RevealSpec>) -> Self {
        self.reveal_lead = lead;
        self.reveal_stagger = stagger;
        self.reveals = reveals;
        self
    }
    pub fn with_hotspot(mut self, binding: HotspotBinding) -> Self {
        self.hotspots.push(binding);
        self
    }

    /// Seconds after transition start at which the first reveal element starts.
    pub fn reveal_base_offset(&self) -> f32 {
        (self.duration - self.reveal_lead).max(0.0)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::Invalid {
            scene: self.id,
            reason: reason.to_string(),
        };
        if !self.camera_start.is_finite() || !self.camera_end.is_finite() {
            return Err(invalid("camera positions must be finite"));
        }
        if !self.look_at.is_finite() {
            return Err(invalid("look_at must be finite"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(invalid("duration must be a non-negative number"));
        }
        if !self.reveal_stagger.is_finite() || self.reveal_stagger < 0.0 {
            return Err(invalid("reveal_stagger must be a non-negative number"));
        }
        if self.reveals.iter().any(|r| !r.duration.is_finite() || r.duration < 0.0) {
            return Err(invalid("reveal durations must be non-negative numbers"));
        }
        if self
            .reveals
            .iter()
            .filter_map(|r| r.start_at)
            .any(|t| !t.is_finite() || t < 0.0)
        {
            return Err(invalid("reveal start_at must be a non-negative number"));
        }
        self.policy.validate().map_err(invalid)
    }
}

/// Failure to load or save a scene table.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("scene table I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene '{scene}' is invalid: {reason}")]
    Invalid { scene: SceneId, reason: String },
}

#[derive(Serialize, Deserialize)]
struct SceneTable {
    scenes: Vec<SceneDef>,
}

/// Resource holding every scene definition.
#[derive(Resource, Debug, Clone)]
pub struct SceneRegistry {
    scenes: FxHashMap<SceneId, SceneDef>,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SceneRegistry {
    /// Registry holding exactly the given definitions.
    pub fn from_defs(defs: impl IntoIterator<Item = SceneDef>) -> Self {
        let mut scenes = FxHashMap::default();
        for def in defs {
            scenes.insert(def.id, def);
        }
        Self { scenes }
    }

    /// The portfolio's built-in scene table.
    pub fn builtin() -> Self {
        let body_drop = |name: &str, height: f32| {
            RevealSpec::new(name, 1.0)
                .with_offset(Vec3::new(0.0, height, 0.0))
                .with_easing(Easing::CubicOut)
        };
        // cards keep their own schedule next to the body drop
        let card = |name: &str, start_at: f32| {
            RevealSpec::new(name, 1.5)
                .with_opacity(0.0, 0.9)
                .with_offset(Vec3::new(0.0, 0.0, 100.0))
                .with_scale(0.5, 1.0)
                .with_easing(Easing::CubicOut)
                .with_start_at(start_at)
        };
        let back_to_home = HotspotBinding::new("spaceship", SceneId::Home, Vec3::new(-0.15, 0.065, -0.01));

        Self::from_defs([
            SceneDef::new(SceneId::Home, Vec3::new(0.0, 0.0, 20.0), Vec3::new(0.0, 0.0, 6.0), 4.5)
                .with_policy(ControlPolicy::default().with_distance(5.0, 20.0))
                .with_hotspot(HotspotBinding::new("about", SceneId::About, Vec3::new(2.0, 2.67, -2.21)))
                .with_hotspot(HotspotBinding::new("knowledge", SceneId::Knowledge, Vec3::new(-3.57, 0.93, 0.0)))
                .with_hotspot(HotspotBinding::new("projects", SceneId::Projects, Vec3::new(-2.87, 2.86, -1.12)))
                .with_hotspot(HotspotBinding::new("contact", SceneId::Contact, Vec3::new(3.75, 1.28, 0.0))),
            SceneDef::new(SceneId::About, Vec3::new(0.0, 0.0, 50.0), Vec3::new(0.0, 0.0, 9.0), 4.0)
                .with_policy(ControlPolicy::default().with_distance(2.0, 9.0))
                .with_reveals(
                    0.5,
                    DEFAULT_REVEAL_STAGGER,
                    vec![body_drop("inner_body", 100.0), body_drop("outer_body", 100.0)],
                )
                .with_hotspot(back_to_home.clone()),
            SceneDef::new(SceneId::Knowledge, Vec3::new(0.0, 0.0, 50.0), Vec3::new(0.0, 0.0, 12.0), 4.0)
                .with_policy(ControlPolicy::default().with_distance(2.0, 20.0))
                .with_reveals(
                    2.0,
                    DEFAULT_REVEAL_STAGGER,
                    vec![body_drop("inner_body", 200.0), body_drop("outer_body", 200.0)],
                )
                .with_hotspot(back_to_home.clone()),
            SceneDef::new(SceneId::Projects, Vec3::new(0.0, 0.0, 70.0), Vec3::new(0.0, 0.0, 12.0), 4.0)
                .with_policy(ControlPolicy::default().with_distance(2.0, 20.0))
                .with_reveals(
                    2.0,
                    DEFAULT_REVEAL_STAGGER,
                    vec![
                        RevealSpec::new("body", 2.0)
                            .with_offset(Vec3::new(0.0, 200.0, 0.0))
                            .with_easing(Easing::CubicOut),
                        card("card_1", 2.0),
                        card("card_2", 2.2),
                        card("card_3", 2.4),
                    ],
                )
                .with_hotspot(back_to_home.clone()),
            SceneDef::new(SceneId::Contact, Vec3::new(0.0, 0.0, 50.0), Vec3::new(0.0, 0.0, 9.0), 4.0)
                .with_policy(ControlPolicy::default().with_distance(2.0, 9.0))
                .with_reveals(
                    1.0,
                    DEFAULT_REVEAL_STAGGER,
                    vec![body_drop("inner_body", 200.0), body_drop("outer_body", 200.0)],
                )
                .with_hotspot(back_to_home),
        ])
    }

    /// Replace the reveal stagger of every scene.
    pub fn with_reveal_stagger(mut self, stagger: f32) -> Self {
        for def in self.scenes.values_mut() {
            def.reveal_stagger = stagger.max(0.0);
        }
        self
    }

    /// Look up a scene definition.
    pub fn get(&self, id: SceneId) -> Result<&SceneDef, TransitionError> {
        self.scenes
            .get(&id)
            .ok_or_else(|| TransitionError::InvalidSceneTarget(id.to_string()))
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.scenes.contains_key(&id)
    }

    /// Definitions in canonical scene order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneDef> {
        SceneId::ALL.into_iter().filter_map(|id| self.scenes.get(&id))
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Parse a scene table and lay it over the built-in definitions.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let table: SceneTable = serde_json::from_str(json)?;
        let mut registry = Self::builtin();
        for def in table.scenes {
            def.validate()?;
            registry.scenes.insert(def.id, def);
        }
        Ok(registry)
    }

    /// Load a scene table from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&json)?;
        info!("Loaded {} scene definitions from {:?}", registry.len(), path);
        Ok(registry)
    }

    pub fn to_json(&self) -> Result<String, RegistryError> {
        let table = SceneTable {
            scenes: self.iter().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&table)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!("Saved scene table to {:?}", path);
        Ok(())
    }

    /// Hotspot binding `hotspot_id` of `scene`, if the scene declares it.
    pub fn hotspot(&self, scene: SceneId, hotspot_id: &str) -> Option<&HotspotBinding> {
        self.scenes
            .get(&scene)
            .and_then(|def| def.hotspots.iter().find(|h| h.id == hotspot_id))
    }
}
