use glam::Vec2;

use crate::helpers::{clamp_or_min, is_finite_vec, lerp};

/// Follows a target and keeps the view inside the level.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    offset: Vec2,
    viewport: Vec2,
    /// Fraction of the remaining distance covered per update; `None` snaps.
    lerp: Option<f32>,
}

impl Camera {
    pub fn new(viewport: Vec2, lerp: Option<f32>) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            lerp: lerp.filter(|factor| *factor > 0.0 && *factor < 1.0),
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// The offset that centers `target`, clamped to `[0, level_size - viewport]` on each axis.
    ///
    /// On an axis where the level is smaller than the viewport the offset is 0.
    pub fn desired_offset(&self, target: Vec2, level_size: Vec2) -> Vec2 {
        let desired = target - self.viewport / 2.0;
        let max = level_size - self.viewport;
        Vec2::new(
            clamp_or_min(desired.x, 0.0, max.x),
            clamp_or_min(desired.y, 0.0, max.y),
        )
    }

    pub fn update(&mut self, target: Vec2, level_size: Vec2) {
        if !is_finite_vec(target) {
            return;
        }

        let desired = self.desired_offset(target, level_size);
        self.offset = match self.lerp {
            Some(factor) => Vec2::new(
                lerp(self.offset.x, desired.x, factor),
                lerp(self.offset.y, desired.y, factor),
            ),
            None => desired,
        };
    }

    /// Jumps straight to the target, e.g. when a level starts.
    pub fn snap_to(&mut self, target: Vec2, level_size: Vec2) {
        if is_finite_vec(target) {
            self.offset = self.desired_offset(target, level_size);
        }
    }

    /// Converts world coordinates to screen coordinates.
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }
}
