//! This module contains all the constants used in the game.
//!
//! Most of these are defaults: the values actually used at runtime live in [`crate::config::GameConfig`],
//! which is built from these and optionally overridden by a config file.

use std::time::Duration;

use glam::{UVec2, Vec2};

/// Target duration of a single frame (60 FPS).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Upper bound for a single simulation step, in seconds.
///
/// Anything longer (window drags, breakpoints, slow disks) is clamped so bodies cannot jump through geometry.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// The size of each tile, in pixels.
pub const TILE_SIZE: u32 = 32;

/// The size of the visible viewport, in pixels (25 x 20 tiles).
pub const VIEWPORT_SIZE: UVec2 = UVec2::new(800, 640);

/// The scale factor for the window.
pub const SCALE: f32 = 1.0;

pub mod physics {
    /// Downward acceleration, in pixels per second squared.
    pub const GRAVITY: f32 = 1800.0;
    /// Terminal fall speed, in pixels per second.
    pub const MAX_FALL_SPEED: f32 = 900.0;
    /// Upward velocity applied on jump, in pixels per second.
    pub const JUMP_SPEED: f32 = 720.0;
    /// Horizontal player speed, in pixels per second.
    pub const WALK_SPEED: f32 = 240.0;
    /// Horizontal speed during a dash, in pixels per second.
    pub const DASH_SPEED: f32 = 720.0;
}

pub mod player {
    use glam::Vec2;

    pub const SIZE: Vec2 = Vec2::new(24.0, 44.0);
    pub const MAX_HEALTH: u32 = 100;
    /// Seconds of invulnerability after being hit.
    pub const INVULNERABILITY: f32 = 1.0;
    /// Amount of health restored by a heart.
    pub const HEART_HEAL: u32 = 25;
    /// Seconds after death before the game over screen.
    pub const DEATH_DELAY: f32 = 1.0;
    /// Health at or below which the player counts as being in danger.
    pub const LOW_HEALTH: u32 = 25;
    /// Damage dealt by hazard tiles.
    pub const HAZARD_DAMAGE: u32 = 20;
}

pub mod ability {
    /// Duration of a sword swing, in seconds.
    pub const SWORD_ACTIVE: f32 = 0.3;
    pub const SWORD_COOLDOWN: f32 = 0.45;
    pub const SWORD_DAMAGE: u32 = 1;
    /// Sword hitbox size; the hitbox extends in front of the player.
    pub const SWORD_REACH: f32 = 56.0;
    pub const SWORD_HEIGHT: f32 = 30.0;

    pub const BOW_ACTIVE: f32 = 0.2;
    pub const BOW_COOLDOWN: f32 = 0.6;

    pub const DASH_ACTIVE: f32 = 0.15;
    pub const DASH_COOLDOWN: f32 = 1.2;
}

pub mod projectile {
    use glam::Vec2;

    pub const ARROW_SIZE: Vec2 = Vec2::new(20.0, 6.0);
    pub const ARROW_SPEED: f32 = 720.0;
    pub const ARROW_DAMAGE: u32 = 25;
    /// Seconds before an arrow that hit nothing disappears.
    pub const ARROW_LIFETIME: f32 = 2.0;
}

pub mod enemy {
    use glam::Vec2;

    pub const SLIME_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const SLIME_HEALTH: u32 = 1;
    pub const SLIME_DAMAGE: u32 = 10;
    /// Patrol speed, in pixels per second.
    pub const PATROL_SPEED: f32 = 90.0;
    /// Chasing is faster than patrolling by this factor.
    pub const CHASE_MULTIPLIER: f32 = 2.5;
    /// Horizontal distance at which an enemy notices the player.
    pub const DETECTION_RANGE: f32 = 150.0;
    /// Vertical tolerance for detection; the player must not be far above the enemy.
    pub const DETECTION_HEIGHT: f32 = 50.0;
    /// Chasing stops once this close, horizontally.
    pub const CHASE_MIN_DISTANCE: f32 = 24.0;
    pub const ATTACK_RANGE: f32 = 60.0;
    pub const ATTACK_COOLDOWN: f32 = 1.5;
    /// Distance at which a waypoint counts as reached.
    pub const WAYPOINT_TOLERANCE: f32 = 5.0;
    /// Horizontal extent of the generated patrol route on each side of the spawn.
    pub const PATROL_RADIUS: f32 = 96.0;

    pub const SPAWN_INTERVAL: f32 = 10.0;
    pub const MIN_ALIVE: usize = 2;
    pub const MAX_ALIVE: usize = 5;
}

pub mod item {
    use glam::Vec2;

    pub const SIZE: Vec2 = Vec2::new(20.0, 20.0);
    pub const COIN_POINTS: u32 = 50;
    /// Vertical bob amplitude, in pixels.
    pub const BOB_AMPLITUDE: f32 = 4.0;
    /// Bob frequency, in cycles per second.
    pub const BOB_FREQUENCY: f32 = 1.5;
}

pub mod companion {
    use glam::Vec2;

    pub const SIZE: Vec2 = Vec2::new(16.0, 16.0);
    /// Where the companion hovers relative to the player's center, mirrored by facing.
    pub const FOLLOW_OFFSET: Vec2 = Vec2::new(-36.0, -40.0);
    /// Fraction of the remaining distance covered per second.
    pub const FOLLOW_RATE: f32 = 6.0;
    /// Within this distance of its target the companion waits.
    pub const SETTLE_DISTANCE: f32 = 4.0;
    /// Seconds spent cheering after a trigger.
    pub const CHEER_TIME: f32 = 1.2;
}

pub mod score {
    pub const KILL_POINTS: u32 = 100;
    /// Kills closer together than this (seconds) extend the combo.
    pub const COMBO_WINDOW: f32 = 2.0;
    pub const COMBO_STEP: f32 = 0.1;
    pub const MAX_MULTIPLIER: f32 = 3.0;
    /// Lifetime of a floating score popup, in seconds.
    pub const POPUP_LIFETIME: f32 = 1.0;
    /// Popup rise speed, in pixels per second.
    pub const POPUP_RISE: f32 = 120.0;
}

pub mod particles {
    pub const MAX_PARTICLES: usize = 512;
    pub const BURST_SPEED: f32 = 160.0;
    pub const BURST_LIFETIME: f32 = 0.6;
    pub const DEATH_BURST: usize = 24;
    pub const PICKUP_BURST: usize = 12;
    pub const HIT_BURST: usize = 8;
}

pub mod emotion {
    /// Intensity lost per second.
    pub const DECAY_PER_SECOND: f32 = 0.2;
}

pub mod camera {
    /// Default smoothing factor; `None` disables smoothing.
    pub const LERP: Option<f32> = Some(0.15);
}

pub mod inventory {
    pub const SLOTS: usize = 10;
}

/// Palette used by the flat-color renderer.
pub mod palette {
    use crate::render::Color;

    pub const DAY_SKY: Color = Color::rgb(135, 206, 235);
    pub const NIGHT_SKY: Color = Color::rgb(6, 12, 23);
    pub const TILE: Color = Color::rgb(94, 72, 54);
    pub const HAZARD: Color = Color::rgb(200, 40, 40);
    pub const EXIT: Color = Color::rgb(250, 220, 90);
    pub const PLAYER: Color = Color::rgb(196, 247, 255);
    pub const SLIME: Color = Color::rgb(90, 200, 90);
    pub const HEART: Color = Color::rgb(230, 50, 80);
    pub const COIN: Color = Color::rgb(255, 200, 0);
    pub const COMPANION: Color = Color::rgb(255, 165, 0);
    pub const ARROW: Color = Color::rgb(220, 220, 220);
    pub const TEXT: Color = Color::rgb(255, 255, 255);
    pub const TEXT_DIM: Color = Color::rgb(160, 160, 160);
    pub const HEALTH_BACK: Color = Color::rgb(255, 0, 0);
    pub const HEALTH_FRONT: Color = Color::rgb(0, 255, 0);
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 160);
}

/// Position of the HUD origin, in screen pixels.
pub const HUD_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);

/// Name of the level the game starts on.
pub const FIRST_LEVEL: &str = "forest";

/// Default location of the progress file.
pub const DEFAULT_SAVE_PATH: &str = "luna_progress.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_frame_delta_exceeds_loop_time() {
        assert!(MAX_FRAME_DELTA > LOOP_TIME.as_secs_f32());
    }

    #[test]
    fn test_viewport_is_whole_tiles() {
        assert_eq!(VIEWPORT_SIZE.x % TILE_SIZE, 0);
        assert_eq!(VIEWPORT_SIZE.y % TILE_SIZE, 0);
        assert_eq!(VIEWPORT_SIZE / TILE_SIZE, UVec2::new(25, 20));
    }

    #[test]
    fn test_bodies_fit_in_a_tile_gap() {
        // Every moving body must be narrower than two tiles, or single-tile corridors become impassable.
        for size in [player::SIZE, enemy::SLIME_SIZE, item::SIZE, companion::SIZE] {
            assert!(size.x <= (TILE_SIZE * 2) as f32);
        }
    }

    #[test]
    fn test_spawner_bounds() {
        assert!(enemy::MIN_ALIVE <= enemy::MAX_ALIVE);
    }

    #[test]
    fn test_jump_clears_a_tile() {
        // Apex height of a jump: v^2 / 2g
        let apex = physics::JUMP_SPEED.powi(2) / (2.0 * physics::GRAVITY);
        assert!(apex > TILE_SIZE as f32 * 2.0);
    }

    #[test]
    fn test_combo_multiplier_reaches_cap() {
        assert!(1.0 + score::COMBO_STEP * 20.0 >= score::MAX_MULTIPLIER);
    }
}
