//! Loader sequencer resource.
//!
//! The one-shot launch timeline shown before the first scene is painted. A
//! list of [`LoaderSegment`]s (a message with a start delay and a duration)
//! plays against a single clock; each message fades in over its first second,
//! holds, and fades out over its last second. While the timeline runs the
//! camera drifts forward through the star field on a looping path.
//!
//! States:
//!
//! ```text
//! AwaitingStart --launch--> Running --elapsed >= total--> Finished
//!       ^                      |
//!       +-------cancel---------+
//! ```
//!
//! Finished is terminal. [`loader_system`](crate::systems::loader::loader_system)
//! fires the completion event exactly once on the Running → Finished edge.

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use log::{debug, info};

use crate::components::tween::{LoopMode, TweenPosition};

/// Depth the camera drifts to during one loop of the loader.
pub const DRIFT_DEPTH: f32 = -700.0;
/// Seconds per drift loop.
pub const DRIFT_PERIOD: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderState {
    #[default]
    AwaitingStart,
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSegment {
    pub message: String,
    /// Seconds after launch at which the segment appears.
    pub delay: f32,
    pub duration: f32,
}

impl LoaderSegment {
    pub fn new(message: impl Into<String>, delay: f32, duration: f32) -> Self {
        Self {
            message: message.into(),
            delay,
            duration,
        }
    }

    /// Opacity of the segment at `t` seconds after launch.
    pub fn opacity_at(&self, t: f32) -> f32 {
        let local = t - self.delay;
        if local < 0.0 || local > self.duration {
            return 0.0;
        }
        local.min(1.0).min(self.duration - local).clamp(0.0, 1.0)
    }

    fn end(&self) -> f32 {
        self.delay + self.duration
    }
}

/// The launch script of the site.
pub fn builtin_segments() -> Vec<LoaderSegment> {
    vec![
        LoaderSegment::new("Initiating cosmic alignment...", 0.0, 4.0),
        LoaderSegment::new("Loading the stars, one by one...", 4.0, 4.0),
        LoaderSegment::new(
            "Your journey through the universe of creativity is about to begin...",
            8.0,
            4.0,
        ),
        LoaderSegment::new("Hold on tight, you're about to explore new dimensions.", 12.0, 4.0),
        LoaderSegment::new("Reaching In 3...", 16.0, 2.0),
        LoaderSegment::new("2...", 18.0, 2.0),
        LoaderSegment::new("1...", 20.0, 2.0),
    ]
}

#[derive(Resource, Debug, Clone)]
pub struct LoaderSequencer {
    state: LoaderState,
    segments: Vec<LoaderSegment>,
    total_duration: f32,
    elapsed: f32,
    /// Launch without waiting for [`LoaderSequencer::launch`].
    pub auto_launch: bool,
    /// Looping camera drift played while running.
    pub drift: TweenPosition,
}

impl Default for LoaderSequencer {
    fn default() -> Self {
        Self::new(builtin_segments())
    }
}

impl LoaderSequencer {
    /// Sequencer whose total duration ends with the last segment.
    pub fn new(segments: Vec<LoaderSegment>) -> Self {
        let total = segments.iter().map(LoaderSegment::end).fold(0.0, f32::max);
        Self::with_total_duration(segments, total)
    }

    pub fn with_total_duration(segments: Vec<LoaderSegment>, total_duration: f32) -> Self {
        Self {
            state: LoaderState::AwaitingStart,
            segments,
            total_duration: total_duration.max(0.0),
            elapsed: 0.0,
            auto_launch: false,
            drift: TweenPosition::new(Vec3::ZERO, Vec3::new(0.0, 0.0, DRIFT_DEPTH), DRIFT_PERIOD)
                .with_loop_mode(LoopMode::Loop),
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn segments(&self) -> &[LoaderSegment] {
        &self.segments
    }

    /// Start the timeline. Returns false when it was not awaiting start.
    pub fn launch(&mut self) -> bool {
        if self.state != LoaderState::AwaitingStart {
            debug!("Loader launch ignored in state {:?}", self.state);
            return false;
        }
        info!(
            "Loader launched ({} segments, {:.1}s)",
            self.segments.len(),
            self.total_duration
        );
        self.state = LoaderState::Running;
        self.elapsed = 0.0;
        self.drift.time = 0.0;
        self.drift.playing = true;
        true
    }

    /// Drop a running timeline without completing it.
    pub fn cancel(&mut self) {
        if self.state == LoaderState::Running {
            info!("Loader cancelled at {:.2}s", self.elapsed);
            self.state = LoaderState::AwaitingStart;
            self.elapsed = 0.0;
        }
    }

    /// Advance the clock. Returns true on the frame the timeline finishes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.state != LoaderState::Running {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.total_duration {
            self.state = LoaderState::Finished;
            info!("Loader finished at {:.2}s", self.elapsed);
            return true;
        }
        false
    }

    /// Opacity of segment `index` at the current time.
    pub fn opacity_of(&self, index: usize) -> f32 {
        match (self.state, self.segments.get(index)) {
            (LoaderState::Running, Some(segment)) => segment.opacity_at(self.elapsed),
            _ => 0.0,
        }
    }

    /// Messages currently on screen with their opacity.
    pub fn visible_messages(&self) -> Vec<(&str, f32)> {
        (0..self.segments.len())
            .filter_map(|i| {
                let opacity = self.opacity_of(i);
                (opacity > 0.0).then(|| (self.segments[i].message.as_str(), opacity))
            })
            .collect()
    }
}
