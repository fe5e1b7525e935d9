//! Scenes: one screen of the game each.
//!
//! [`Scene`] is a closed set of variants with explicit dispatch. Scenes never touch the stack themselves; they ask
//! for changes by returning a [`Transition`] from `update`, which the game applies once `update` has returned.

use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::InputEvent;
use crate::progress::Progress;
use crate::render::DrawSurface;
use crate::score::Score;
use crate::timing::FrameTimings;

pub mod game_over;
pub mod level;
pub mod menu;
pub mod pause;

use game_over::{GameOverScene, GameOverSummary};
use level::LevelScene;
use menu::MenuScene;
use pause::PauseScene;

/// Shared state scenes may read and change.
pub struct SceneContext<'a> {
    pub config: &'a GameConfig,
    pub progress: &'a mut Progress,
    pub rng: &'a mut SmallRng,
}

impl SceneContext<'_> {
    /// Saves progress, logging instead of failing.
    pub fn save_progress(&self) {
        if let Err(error) = self.progress.save(&self.config.save_path) {
            tracing::warn!(%error, "Failed to save progress");
        }
    }
}

/// Read-only state available while rendering.
pub struct RenderContext<'a> {
    pub config: &'a GameConfig,
    pub progress: &'a Progress,
    pub timings: Option<&'a FrameTimings>,
}

/// A description of a scene to build.
#[derive(Debug, Clone)]
pub enum SceneId {
    /// The main menu, optionally showing a message.
    Menu { notice: Option<String> },
    /// A level by name, optionally continuing an earlier level's score.
    Level { name: String, score: Option<Box<Score>> },
    Pause,
    GameOver(Box<GameOverSummary>),
}

impl SceneId {
    pub fn menu() -> Self {
        SceneId::Menu { notice: None }
    }

    pub fn level(name: impl Into<String>) -> Self {
        SceneId::Level {
            name: name.into(),
            score: None,
        }
    }
}

/// A change to the scene stack.
#[derive(Debug, Clone, Default)]
pub enum Transition {
    #[default]
    None,
    /// Puts a scene on top of the current one.
    Push(SceneId),
    /// Removes the top scene.
    Pop,
    /// Swaps the top scene for another.
    Replace(SceneId),
    /// Empties the stack and starts over with one scene.
    Switch(SceneId),
    Quit,
}

impl Transition {
    pub fn is_none(&self) -> bool {
        matches!(self, Transition::None)
    }
}

pub enum Scene {
    Menu(MenuScene),
    Level(Box<LevelScene>),
    Pause(PauseScene),
    GameOver(GameOverScene),
}

impl Scene {
    /// Builds the scene `id` describes. Nothing is loaded until [`Scene::enter`].
    pub fn build(id: SceneId) -> Self {
        match id {
            SceneId::Menu { notice } => Scene::Menu(MenuScene::new(notice)),
            SceneId::Level { name, score } => Scene::Level(Box::new(LevelScene::new(name, score.map(|score| *score)))),
            SceneId::Pause => Scene::Pause(PauseScene::default()),
            SceneId::GameOver(summary) => Scene::GameOver(GameOverScene::new(*summary)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scene::Menu(_) => "menu",
            Scene::Level(_) => "level",
            Scene::Pause(_) => "pause",
            Scene::GameOver(_) => "game_over",
        }
    }

    /// Overlays are drawn on top of the scene below them.
    pub fn is_overlay(&self) -> bool {
        matches!(self, Scene::Pause(_))
    }

    /// Prepares the scene; levels load their data here.
    pub fn enter(&mut self, ctx: &mut SceneContext<'_>) -> GameResult<()> {
        match self {
            Scene::Menu(scene) => {
                scene.enter(ctx);
                Ok(())
            }
            Scene::Level(scene) => scene.enter(ctx),
            Scene::Pause(_) | Scene::GameOver(_) => Ok(()),
        }
    }

    /// Called when the scene above this one is popped.
    pub fn resume(&mut self) {
        if let Scene::Level(scene) = self {
            scene.resume();
        }
    }

    pub fn update(&mut self, dt: f32, ctx: &mut SceneContext<'_>) -> GameResult<Transition> {
        match self {
            Scene::Menu(scene) => Ok(scene.update(dt)),
            Scene::Level(scene) => scene.update(dt, ctx),
            Scene::Pause(scene) => Ok(scene.update()),
            Scene::GameOver(scene) => Ok(scene.update(dt)),
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext<'_>) -> GameResult<()> {
        match self {
            Scene::Menu(scene) => scene.render(surface, ctx),
            Scene::Level(scene) => scene.render(surface, ctx),
            Scene::Pause(scene) => scene.render(surface),
            Scene::GameOver(scene) => scene.render(surface, ctx),
        }
    }

    pub fn exit(&mut self, ctx: &mut SceneContext<'_>) {
        if let Scene::Level(scene) = self {
            scene.exit(ctx);
        }
    }

    /// Offers an input event to the scene. Returns `true` if it was consumed.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext<'_>) -> bool {
        match self {
            Scene::Menu(scene) => scene.handle_event(event, ctx),
            Scene::Level(scene) => scene.handle_event(event),
            Scene::Pause(scene) => scene.handle_event(event),
            Scene::GameOver(scene) => scene.handle_event(event, ctx),
        }
    }
}
