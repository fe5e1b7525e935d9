//! The abstract drawing surface everything renders through.
//!
//! Scenes, the background and the HUD only ever issue draw calls against a [`DrawSurface`]. The desktop platform
//! implements it on top of an SDL2 canvas; [`RecordingSurface`] captures the calls for headless runs and tests.

use glam::Vec2;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::error::GameResult;
use crate::helpers::Rect;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha scaled by `factor` (clamped to `0..=1`).
    pub fn faded(self, factor: f32) -> Self {
        let factor = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            a: (self.a as f32 * factor).round() as u8,
            ..self
        }
    }
}

/// Everything that can be drawn as a sprite.
///
/// Image assets are outside the scope of the simulation, so every sprite has a flat placeholder color the
/// desktop renderer falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Sprite {
    Player,
    PlayerHurt,
    Slime,
    Heart,
    Coin,
    Companion,
    Arrow,
    SolidTile,
    HazardTile,
    ExitTile,
}

impl Sprite {
    /// The flat color used when the sprite is drawn without an image.
    pub fn placeholder_color(self) -> Color {
        use crate::constants::palette;
        match self {
            Sprite::Player => palette::PLAYER,
            Sprite::PlayerHurt => palette::HAZARD,
            Sprite::Slime => palette::SLIME,
            Sprite::Heart => palette::HEART,
            Sprite::Coin => palette::COIN,
            Sprite::Companion => palette::COMPANION,
            Sprite::Arrow => palette::ARROW,
            Sprite::SolidTile => palette::TILE,
            Sprite::HazardTile => palette::HAZARD,
            Sprite::ExitTile => palette::EXIT,
        }
    }
}

/// Draw calls understood by every renderer.
///
/// Coordinates are screen pixels; callers subtract the camera offset themselves.
pub trait DrawSurface {
    /// Fills the whole surface.
    fn clear(&mut self, color: Color) -> GameResult<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> GameResult<()>;

    /// Draws a sprite with its top-left corner at `position`, scaled to `size`.
    fn draw_sprite(&mut self, sprite: Sprite, position: Vec2, size: Vec2, flip_x: bool) -> GameResult<()>;

    /// Draws a single line of text with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) -> GameResult<()>;

    /// The logical size of the surface, in pixels.
    fn size(&self) -> Vec2;
}

/// A single captured draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, Color),
    Sprite {
        sprite: Sprite,
        position: Vec2,
        size: Vec2,
        flip_x: bool,
    },
    Text {
        text: String,
        position: Vec2,
        color: Color,
    },
}

/// A surface that records draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops everything recorded so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// All text drawn since the last reset, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of times `sprite` was drawn since the last reset.
    pub fn sprite_count(&self, sprite: Sprite) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Sprite { sprite: s, .. } if *s == sprite))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) -> GameResult<()> {
        self.commands.push(DrawCommand::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> GameResult<()> {
        self.commands.push(DrawCommand::FillRect(rect, color));
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: Sprite, position: Vec2, size: Vec2, flip_x: bool) -> GameResult<()> {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            position,
            size,
            flip_x,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) -> GameResult<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
        });
        Ok(())
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}
