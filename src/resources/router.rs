//! Navigation router resource.
//!
//! Records route changes made by the choreographer. Routes are scene paths
//! such as `/about`; [`Router::location`] prefixes them with the configured
//! base, which defaults to the site's deploy path. Before the first
//! navigation the location is the landing route the visit started on.

use bevy_ecs::prelude::Resource;
use log::info;

use crate::resources::sceneregistry::SceneId;
use crate::resources::transitionstate::TransitionError;

pub const DEFAULT_ROUTE_BASE: &str = "/Space_Portofilio";

#[derive(Resource, Debug, Clone)]
pub struct Router {
    base: String,
    landing: String,
    history: Vec<String>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_BASE)
    }
}

impl Router {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            landing: "/".to_string(),
            history: Vec::new(),
        }
    }

    /// Route the visit starts on.
    pub fn with_landing(mut self, route: impl Into<String>) -> Self {
        self.landing = route.into();
        self
    }

    /// Scene addressed by `path`, with or without the base prefix.
    ///
    /// `/Space_Portofilio/projects`, `/projects` and `projects/` all resolve
    /// to the projects scene; the bare base resolves to home.
    pub fn resolve(&self, path: &str) -> Result<SceneId, TransitionError> {
        let trimmed = path.trim();
        let relative = match trimmed.strip_prefix(self.base.as_str()) {
            Some(rest) if !self.base.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                rest
            }
            _ => trimmed,
        };
        let route = format!("/{}", relative.trim_matches('/'));
        SceneId::from_route(&route)
            .ok_or_else(|| TransitionError::InvalidSceneTarget(path.to_string()))
    }

    pub fn navigate(&mut self, route: &str) {
        self.history.push(route.to_string());
        info!("Navigated to {}", self.location());
    }

    /// Route of the latest navigation.
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Full path of the latest navigation, base included.
    pub fn location(&self) -> String {
        match self.current().unwrap_or(self.landing.as_str()) {
            "/" => format!("{}/", self.base),
            route => format!("{}{}", self.base, route),
        }
    }

    pub fn landing(&self) -> &str {
        &self.landing
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}
