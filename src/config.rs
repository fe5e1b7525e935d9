//! Runtime configuration.
//!
//! A single [`GameConfig`] is built once at startup and handed to [`crate::game::Game`]; nothing reads
//! process-wide mutable state. Every field falls back to the defaults in [`crate::constants`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants;
use crate::error::ConfigError;

/// Particle pool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Hard cap on live particles; spawning past it evicts the oldest.
    pub max_particles: usize,
    pub burst_speed: f32,
    pub burst_lifetime: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: constants::particles::MAX_PARTICLES,
            burst_speed: constants::particles::BURST_SPEED,
            burst_lifetime: constants::particles::BURST_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Intensity lost per second.
    pub decay_per_second: f32,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            decay_per_second: constants::emotion::DECAY_PER_SECOND,
        }
    }
}

/// Immutable game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Window scale factor on the desktop platform.
    pub scale: f32,
    pub target_fps: u32,
    /// Upper bound for a single simulation step, in seconds.
    pub max_frame_delta: f32,
    /// Downward acceleration in pixels per second squared.
    pub gravity: f32,
    /// Camera smoothing factor in `(0, 1]`; `None` snaps the camera every frame.
    pub camera_lerp: Option<f32>,
    pub particles: ParticleConfig,
    pub emotion: EmotionConfig,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Draws the frame-time readout in the HUD.
    pub show_frame_timings: bool,
    /// Where progress is persisted.
    pub save_path: PathBuf,
    /// Seed for the gameplay RNG; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Level entered from the menu.
    pub first_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: constants::VIEWPORT_SIZE.x,
            viewport_height: constants::VIEWPORT_SIZE.y,
            scale: constants::SCALE,
            target_fps: 60,
            max_frame_delta: constants::MAX_FRAME_DELTA,
            gravity: constants::physics::GRAVITY,
            camera_lerp: constants::camera::LERP,
            particles: ParticleConfig::default(),
            emotion: EmotionConfig::default(),
            log_level: "info".to_string(),
            show_frame_timings: cfg!(debug_assertions),
            save_path: PathBuf::from(constants::DEFAULT_SAVE_PATH),
            seed: None,
            first_level: constants::FIRST_LEVEL.to_string(),
        }
    }
}

impl GameConfig {
    /// Reads, parses and validates a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(invalid("viewport", format!("{}x{}", self.viewport_width, self.viewport_height)));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid("scale", self.scale.to_string()));
        }
        if self.target_fps == 0 {
            return Err(invalid("target_fps", "must be positive".to_string()));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(invalid("max_frame_delta", self.max_frame_delta.to_string()));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", self.gravity.to_string()));
        }
        if let Some(lerp) = self.camera_lerp {
            if !(lerp > 0.0 && lerp <= 1.0) {
                return Err(invalid("camera_lerp", format!("{lerp} is outside (0, 1]")));
            }
        }
        if self.particles.max_particles == 0 {
            return Err(invalid("particles.max_particles", "must be positive".to_string()));
        }
        if !(self.emotion.decay_per_second.is_finite() && self.emotion.decay_per_second >= 0.0) {
            return Err(invalid("emotion.decay_per_second", self.emotion.decay_per_second.to_string()));
        }
        if self.first_level.is_empty() {
            return Err(invalid("first_level", "must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width as f32, self.viewport_height as f32)
    }

    /// Target duration of one frame.
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
