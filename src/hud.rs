//! The heads-up display drawn over the level.
//!
//! The HUD only reads state; it has no simulation logic of its own.

use glam::Vec2;
use thousands::Separable;

use crate::camera::Camera;
use crate::constants::{palette, HUD_ORIGIN};
use crate::emotion::{Emotion, Mood};
use crate::entity::ability::{AbilityKind, Unlocks, Weapon};
use crate::entity::item::ItemKind;
use crate::entity::player::Player;
use crate::error::GameResult;
use crate::helpers::Rect;
use crate::render::{Color, DrawSurface};
use crate::score::Score;
use crate::timing::FrameTimings;

/// Width of one character of the built-in bitmap font.
pub const GLYPH_WIDTH: f32 = 8.0;
/// Height of one line of text.
pub const LINE_HEIGHT: f32 = 12.0;

const HEALTH_BAR: Vec2 = Vec2::new(200.0, 16.0);
const SLOT_SIZE: f32 = 18.0;

/// Everything the HUD shows for one frame.
pub struct HudView<'a> {
    pub player: &'a Player,
    pub companion: Option<&'a Emotion>,
    pub score: &'a Score,
    pub unlocks: Unlocks,
    pub level_name: &'a str,
    pub camera: &'a Camera,
    pub timings: Option<&'a FrameTimings>,
}

pub fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Neutral => Color::rgb(200, 200, 200),
        Mood::Happy => Color::rgb(255, 220, 80),
        Mood::Sad => Color::rgb(90, 130, 230),
        Mood::Scared => Color::rgb(200, 90, 220),
        Mood::Determined => Color::rgb(240, 110, 60),
    }
}

/// Pixel width of `text` in the bitmap font.
pub fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * GLYPH_WIDTH
}

pub fn render(surface: &mut dyn DrawSurface, view: &HudView<'_>) -> GameResult<()> {
    let screen = surface.size();
    let mut cursor = HUD_ORIGIN;

    // Health
    let health = view.player.actor.health;
    surface.fill_rect(Rect::from_position_size(cursor, HEALTH_BAR), palette::HEALTH_BACK)?;
    surface.fill_rect(
        Rect::from_position_size(cursor, Vec2::new(HEALTH_BAR.x * health.fraction(), HEALTH_BAR.y)),
        palette::HEALTH_FRONT,
    )?;
    surface.draw_text(
        &format!("HP {}/{}", health.current(), health.max()),
        cursor + Vec2::new(HEALTH_BAR.x + 8.0, 4.0),
        palette::TEXT,
    )?;
    cursor.y += HEALTH_BAR.y + 6.0;

    // Mood
    render_mood(surface, "Luna", &view.player.emotion, cursor)?;
    cursor.y += LINE_HEIGHT;
    if let Some(companion) = view.companion {
        render_mood(surface, "Friend", companion, cursor)?;
        cursor.y += LINE_HEIGHT;
    }

    // Weapon and cooldowns
    let weapon: &'static str = view.player.abilities.weapon().into();
    surface.draw_text(&format!("Weapon: {weapon}"), cursor, palette::TEXT)?;
    cursor.y += LINE_HEIGHT;
    for kind in [AbilityKind::Sword, AbilityKind::Bow, AbilityKind::Dash] {
        if !view.unlocks.contains(kind.required_unlock()) {
            continue;
        }
        let ability = view.player.abilities.get(kind);
        let name: &'static str = kind.into();
        let selected = matches!(
            (kind, view.player.abilities.weapon()),
            (AbilityKind::Sword, Weapon::Sword) | (AbilityKind::Bow, Weapon::Bow)
        );
        let color = if ability.is_ready() { palette::TEXT } else { palette::TEXT_DIM };
        let label = format!("{}{name}", if selected { ">" } else { " " });
        surface.draw_text(&label, cursor, color)?;
        let bar = Rect::new(cursor.x + 64.0, cursor.y + 2.0, 48.0 * (1.0 - ability.recharge_fraction()), 6.0);
        surface.fill_rect(bar, color)?;
        cursor.y += LINE_HEIGHT;
    }

    // Inventory
    if view.unlocks.contains(Unlocks::HEARTS) {
        render_inventory(surface, view.player, cursor)?;
    }

    // Score, right-aligned
    let score = format!("Score {}", view.score.points().separate_with_commas());
    let x = screen.x - HUD_ORIGIN.x - text_width(&score);
    surface.draw_text(&score, Vec2::new(x, HUD_ORIGIN.y), palette::TEXT)?;
    if view.score.is_chained() {
        let combo = format!("Combo {} x{:.1}", view.score.combo(), view.score.multiplier());
        let x = screen.x - HUD_ORIGIN.x - text_width(&combo);
        surface.draw_text(&combo, Vec2::new(x, HUD_ORIGIN.y + LINE_HEIGHT), palette::COIN)?;
    }
    let x = screen.x - HUD_ORIGIN.x - text_width(view.level_name);
    surface.draw_text(view.level_name, Vec2::new(x, HUD_ORIGIN.y + LINE_HEIGHT * 2.0), palette::TEXT_DIM)?;

    // Popups follow the world
    for popup in view.score.popups() {
        let text = format!("+{}", popup.points);
        let position = view.camera.to_screen(popup.position()) - Vec2::new(text_width(&text) / 2.0, 0.0);
        surface.draw_text(&text, position, palette::COIN.faded(popup.opacity()))?;
    }

    if let Some(timings) = view.timings {
        let lines = timings.lines();
        let mut y = screen.y - HUD_ORIGIN.y - LINE_HEIGHT * lines.len() as f32;
        for line in &lines {
            surface.draw_text(line, Vec2::new(HUD_ORIGIN.x, y), palette::TEXT_DIM)?;
            y += LINE_HEIGHT;
        }
    }
    Ok(())
}

fn render_mood(surface: &mut dyn DrawSurface, who: &str, emotion: &Emotion, at: Vec2) -> GameResult<()> {
    let mood: &'static str = emotion.mood().into();
    let color = mood_color(emotion.mood());
    surface.draw_text(&format!("{who}: {mood}"), at, color)?;
    let intensity = Rect::new(at.x + 120.0, at.y + 2.0, 40.0 * emotion.intensity().clamp(0.0, 1.0), 6.0);
    surface.fill_rect(intensity, color)
}

fn render_inventory(surface: &mut dyn DrawSurface, player: &Player, at: Vec2) -> GameResult<()> {
    for (index, slot) in player.inventory.slots().iter().enumerate() {
        let position = at + Vec2::new(index as f32 * (SLOT_SIZE + 4.0), 0.0);
        let frame = if index == player.inventory.selected() {
            palette::TEXT
        } else {
            palette::TEXT_DIM
        };
        surface.fill_rect(Rect::from_position_size(position, Vec2::splat(SLOT_SIZE)), frame.faded(0.5))?;
        if let Some(item) = slot {
            let color = match item {
                ItemKind::Heart => palette::HEART,
                ItemKind::Coin => palette::COIN,
            };
            surface.fill_rect(
                Rect::from_position_size(position + Vec2::splat(4.0), Vec2::splat(SLOT_SIZE - 8.0)),
                color,
            )?;
        }
    }
    Ok(())
}
