use glam::Vec2;
use thousands::Separable;

use crate::constants::palette;
use crate::entity::ability::Unlocks;
use crate::error::GameResult;
use crate::events::{Action, InputEvent};
use crate::hud::{text_width, LINE_HEIGHT};
use crate::render::DrawSurface;
use crate::scene::{RenderContext, SceneContext, SceneId, Transition};
use crate::score::ScoreBreakdown;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSummary {
    pub victory: bool,
    pub level: String,
    pub breakdown: ScoreBreakdown,
    pub new_best: bool,
    /// What the death unlocked, if anything.
    pub unlocked: Option<Unlocks>,
}

pub struct GameOverScene {
    summary: GameOverSummary,
    pending: Transition,
}

impl GameOverScene {
    pub fn new(summary: GameOverSummary) -> Self {
        Self {
            summary,
            pending: Transition::None,
        }
    }

    pub fn summary(&self) -> &GameOverSummary {
        &self.summary
    }

    /// Confirm plays again from the first level; cancel returns to the menu.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext<'_>) -> bool {
        match *event {
            InputEvent::Pressed(Action::Confirm | Action::Jump) => {
                self.pending = Transition::Switch(SceneId::level(ctx.config.first_level.clone()));
            }
            InputEvent::Pressed(Action::Cancel) => {
                self.pending = Transition::Switch(SceneId::menu());
            }
            _ => {}
        }
        true
    }

    pub fn update(&mut self, _dt: f32) -> Transition {
        std::mem::take(&mut self.pending)
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext<'_>) -> GameResult<()> {
        let screen = surface.size();
        surface.clear(palette::NIGHT_SKY)?;

        let breakdown = &self.summary.breakdown;
        let (title, color) = if self.summary.victory {
            ("Luna made it through the night!", palette::EXIT)
        } else {
            ("Luna has fallen", palette::HAZARD)
        };

        let mut lines = vec![
            (title.to_string(), color),
            (String::new(), palette::TEXT),
            (format!("Score     {}", breakdown.score.separate_with_commas()), palette::TEXT),
            (format!("Defeated  {}", breakdown.enemies_defeated), palette::TEXT),
            (format!("Coins     {}", breakdown.coins), palette::TEXT),
            (format!("Max combo {}", breakdown.max_combo), palette::TEXT),
            (format!("Survived  {:.1}s", breakdown.survival_time), palette::TEXT),
            (
                format!("Best      {}", ctx.progress.best_score.separate_with_commas()),
                palette::TEXT_DIM,
            ),
        ];
        if self.summary.new_best {
            lines.push(("New best score!".to_string(), palette::COIN));
        }
        if let Some(unlocked) = self.summary.unlocked {
            let text = if unlocked.contains(Unlocks::BOW) {
                "Luna learned to use the bow"
            } else {
                "Luna learned to heal with hearts"
            };
            lines.push((text.to_string(), palette::HEART));
        }
        lines.push((String::new(), palette::TEXT));
        lines.push(("Confirm to try again, Cancel for the menu".to_string(), palette::TEXT_DIM));

        let mut y = screen.y * 0.2;
        for (text, color) in &lines {
            surface.draw_text(text, Vec2::new((screen.x - text_width(text)) / 2.0, y), *color)?;
            y += LINE_HEIGHT * 1.5;
        }
        Ok(())
    }
}
