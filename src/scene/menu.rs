use glam::Vec2;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use thousands::Separable;
use tracing::info;

use crate::constants::palette;
use crate::error::GameResult;
use crate::events::{Action, InputEvent};
use crate::hud::{text_width, LINE_HEIGHT};
use crate::render::DrawSurface;
use crate::scene::{RenderContext, SceneContext, SceneId, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum MenuOption {
    #[strum(serialize = "Start")]
    Start,
    #[strum(serialize = "Reset progress")]
    ResetProgress,
    #[strum(serialize = "Quit")]
    Quit,
}

pub struct MenuScene {
    notice: Option<String>,
    selected: usize,
    dialogue: &'static [&'static str],
    pending: Transition,
}

impl MenuScene {
    pub fn new(notice: Option<String>) -> Self {
        Self {
            notice,
            selected: 0,
            dialogue: &[],
            pending: Transition::None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn selected(&self) -> MenuOption {
        MenuOption::iter().nth(self.selected).unwrap_or(MenuOption::Start)
    }

    pub fn dialogue(&self) -> &'static [&'static str] {
        self.dialogue
    }

    pub fn enter(&mut self, ctx: &mut SceneContext<'_>) {
        self.dialogue = ctx.progress.story_dialogue();
        if let Some(notice) = &self.notice {
            info!(notice = %notice, "Menu opened with a notice");
        }
    }

    /// The menu consumes every input event.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext<'_>) -> bool {
        let InputEvent::Pressed(action) = *event else {
            return true;
        };

        match action {
            Action::Up | Action::PrevSlot => {
                self.selected = (self.selected + MenuOption::COUNT - 1) % MenuOption::COUNT;
            }
            Action::Down | Action::NextSlot => {
                self.selected = (self.selected + 1) % MenuOption::COUNT;
            }
            Action::Confirm | Action::Jump => self.activate(ctx),
            Action::Cancel => self.pending = Transition::Quit,
            _ => {}
        }
        true
    }

    fn activate(&mut self, ctx: &mut SceneContext<'_>) {
        match self.selected() {
            MenuOption::Start => {
                ctx.progress.seen_intro = true;
                ctx.save_progress();
                self.pending = Transition::Switch(SceneId::level(ctx.config.first_level.clone()));
            }
            MenuOption::ResetProgress => {
                ctx.progress.reset();
                ctx.save_progress();
                self.dialogue = ctx.progress.story_dialogue();
                self.notice = Some("Progress reset".to_string());
                info!("Progress reset from the menu");
            }
            MenuOption::Quit => self.pending = Transition::Quit,
        }
    }

    pub fn update(&mut self, _dt: f32) -> Transition {
        std::mem::take(&mut self.pending)
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext<'_>) -> GameResult<()> {
        let screen = surface.size();
        surface.clear(palette::NIGHT_SKY)?;

        let centered = |text: &str, y: f32| Vec2::new((screen.x - text_width(text)) / 2.0, y);
        let title = "Luna's Endless Lesson";
        surface.draw_text(title, centered(title, screen.y * 0.15), palette::EXIT)?;

        let mut y = screen.y * 0.25;
        for line in self.dialogue {
            surface.draw_text(line, centered(line, y), palette::TEXT)?;
            y += LINE_HEIGHT;
        }

        let mut y = screen.y * 0.55;
        for (index, option) in MenuOption::iter().enumerate() {
            let label: &'static str = option.into();
            let text = if index == self.selected {
                format!("> {label} <")
            } else {
                label.to_string()
            };
            let color = if index == self.selected { palette::TEXT } else { palette::TEXT_DIM };
            surface.draw_text(&text, centered(&text, y), color)?;
            y += LINE_HEIGHT * 1.5;
        }

        if let Some(notice) = &self.notice {
            surface.draw_text(notice, centered(notice, screen.y * 0.75), palette::HAZARD)?;
        }

        let stats = format!(
            "Deaths {}   Best {}",
            ctx.progress.deaths,
            ctx.progress.best_score.separate_with_commas()
        );
        surface.draw_text(&stats, centered(&stats, screen.y * 0.9), palette::TEXT_DIM)
    }
}
