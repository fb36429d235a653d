//! Orbit control capability.
//!
//! [`OrbitControlHandle`] exposes the knobs the input gate flips: the
//! rotate/zoom/pan switches and the polar and distance bounds. The gate is
//! the only writer. [`OrbitControls`] is the headless default.

/// Orbit-control settings driven by the input gate.
pub trait OrbitControlHandle: Send + Sync + 'static {
    fn set_rotate_enabled(&mut self, enabled: bool);
    fn set_zoom_enabled(&mut self, enabled: bool);
    fn set_pan_enabled(&mut self, enabled: bool);
    fn set_polar_bounds(&mut self, min: f32, max: f32);
    fn set_distance_bounds(&mut self, min: f32, max: f32);

    fn rotate_enabled(&self) -> bool;
    fn zoom_enabled(&self) -> bool;
    fn pan_enabled(&self) -> bool;
    fn polar_bounds(&self) -> (f32, f32);
    fn distance_bounds(&self) -> (f32, f32);

    /// True when no user input can move the camera.
    fn is_fully_disabled(&self) -> bool {
        !self.rotate_enabled() && !self.zoom_enabled() && !self.pan_enabled()
    }
}

/// Plain orbit-control state.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub rotate: bool,
    pub zoom: bool,
    pub pan: bool,
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            rotate: true,
            zoom: true,
            pan: true,
            min_polar: 0.0,
            max_polar: std::f32::consts::PI,
            min_distance: 0.0,
            max_distance: f32::MAX,
        }
    }
}

impl OrbitControlHandle for OrbitControls {
    fn set_rotate_enabled(&mut self, enabled: bool) {
        self.rotate = enabled;
    }
    fn set_zoom_enabled(&mut self, enabled: bool) {
        self.zoom = enabled;
    }
    fn set_pan_enabled(&mut self, enabled: bool) {
        self.pan = enabled;
    }
    fn set_polar_bounds(&mut self, min: f32, max: f32) {
        self.min_polar = min;
        self.max_polar = max;
    }
    fn set_distance_bounds(&mut self, min: f32, max: f32) {
        self.min_distance = min;
        self.max_distance = max;
    }

    fn rotate_enabled(&self) -> bool {
        self.rotate
    }
    fn zoom_enabled(&self) -> bool {
        self.zoom
    }
    fn pan_enabled(&self) -> bool {
        self.pan
    }
    fn polar_bounds(&self) -> (f32, f32) {
        (self.min_polar, self.max_polar)
    }
    fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }
}
