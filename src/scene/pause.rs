use glam::Vec2;

use crate::constants::palette;
use crate::error::GameResult;
use crate::events::{Action, InputEvent};
use crate::helpers::Rect;
use crate::hud::{text_width, LINE_HEIGHT};
use crate::render::DrawSurface;
use crate::scene::{SceneId, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseOption {
    #[default]
    Resume,
    QuitToMenu,
}

/// An overlay over the level. It consumes all input, so nothing reaches the level while paused.
#[derive(Debug, Default)]
pub struct PauseScene {
    selected: PauseOption,
    pending: Transition,
}

impl PauseScene {
    pub fn selected(&self) -> PauseOption {
        self.selected
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Pressed(action) = *event {
            match action {
                Action::Up | Action::Down => {
                    self.selected = match self.selected {
                        PauseOption::Resume => PauseOption::QuitToMenu,
                        PauseOption::QuitToMenu => PauseOption::Resume,
                    };
                }
                Action::Pause | Action::Cancel => self.pending = Transition::Pop,
                Action::Confirm | Action::Jump => {
                    self.pending = match self.selected {
                        PauseOption::Resume => Transition::Pop,
                        PauseOption::QuitToMenu => Transition::Switch(SceneId::menu()),
                    };
                }
                _ => {}
            }
        }
        true
    }

    pub fn update(&mut self) -> Transition {
        std::mem::take(&mut self.pending)
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) -> GameResult<()> {
        let screen = surface.size();
        surface.fill_rect(Rect::from_position_size(Vec2::ZERO, screen), palette::OVERLAY)?;

        let lines = [
            ("Paused", palette::EXIT, true),
            ("Resume", palette::TEXT, self.selected == PauseOption::Resume),
            ("Quit to menu", palette::TEXT, self.selected == PauseOption::QuitToMenu),
        ];
        let mut y = screen.y * 0.4;
        for (text, color, highlighted) in lines {
            let color = if highlighted { color } else { palette::TEXT_DIM };
            surface.draw_text(text, Vec2::new((screen.x - text_width(text)) / 2.0, y), color)?;
            y += LINE_HEIGHT * 1.5;
        }
        Ok(())
    }
}
