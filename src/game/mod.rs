//! This module contains the main game logic and state.
//!
//! [`Game`] owns the configuration, the saved progress and a stack of scenes. The top scene is the only one that
//! updates; input falls through the stack from the top until a scene consumes it; rendering starts at the topmost
//! scene that is not an overlay.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error, info, trace, warn};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::events::InputEvent;
use crate::progress::Progress;
use crate::render::DrawSurface;
use crate::scene::{RenderContext, Scene, SceneContext, SceneId, Transition};
use crate::timing::FrameTimings;

/// Core game state manager.
pub struct Game {
    config: GameConfig,
    progress: Progress,
    stack: Vec<Scene>,
    rng: SmallRng,
    quit: bool,
}

impl Game {
    /// Creates the game on the main menu.
    ///
    /// # Errors
    ///
    /// Propagates a failure to enter the menu.
    pub fn new(config: GameConfig, progress: Progress) -> GameResult<Self> {
        let seed = config.seed.unwrap_or_else(clock_seed);
        debug!(seed, "Seeding gameplay RNG");

        let mut game = Self {
            config,
            progress,
            stack: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            quit: false,
        };
        let menu = game.open(SceneId::menu())?;
        game.stack.extend(menu);
        info!(deaths = game.progress.deaths, best = game.progress.best_score, "Game initialized");
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Scene names from the bottom of the stack to the top.
    pub fn scene_names(&self) -> Vec<&'static str> {
        self.stack.iter().map(Scene::name).collect()
    }

    pub fn top(&self) -> Option<&Scene> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Scene> {
        self.stack.last_mut()
    }

    /// Offers an input event to the scenes, top first, until one consumes it.
    pub fn handle_input(&mut self, event: InputEvent) {
        if event == InputEvent::Quit {
            info!("Exit requested");
            self.quit = true;
            return;
        }

        let Self {
            config,
            progress,
            rng,
            stack,
            ..
        } = self;
        let mut ctx = SceneContext { config, progress, rng };
        for scene in stack.iter_mut().rev() {
            if scene.handle_event(&event, &mut ctx) {
                trace!(scene = scene.name(), ?event, "Input consumed");
                return;
            }
        }
        trace!(?event, "Input not consumed by any scene");
    }

    /// Updates the top scene, then applies the transition it returned.
    ///
    /// # Errors
    ///
    /// Propagates fatal scene errors. A level that fails to load is not fatal: the game returns to the menu.
    pub fn update(&mut self, dt: f32) -> GameResult<()> {
        if self.quit {
            return Ok(());
        }

        let transition = {
            let Self {
                config,
                progress,
                rng,
                stack,
                ..
            } = self;
            let top = stack
                .last_mut()
                .ok_or_else(|| GameError::InvalidState("scene stack is empty".to_string()))?;
            let mut ctx = SceneContext { config, progress, rng };
            top.update(dt, &mut ctx)?
        };
        self.apply_transition(transition)
    }

    /// Draws the topmost opaque scene and every overlay above it.
    ///
    /// # Errors
    ///
    /// Propagates errors from the surface.
    pub fn render(&self, surface: &mut dyn DrawSurface, timings: Option<&FrameTimings>) -> GameResult<()> {
        let ctx = RenderContext {
            config: &self.config,
            progress: &self.progress,
            timings,
        };
        let base = self.stack.iter().rposition(|scene| !scene.is_overlay()).unwrap_or(0);
        for scene in &self.stack[base..] {
            scene.render(surface, &ctx)?;
        }
        Ok(())
    }

    /// Applies a scene transition. Never leaves the stack empty.
    ///
    /// # Errors
    ///
    /// Propagates failures to enter a scene, other than level load errors.
    pub fn apply_transition(&mut self, transition: Transition) -> GameResult<()> {
        match transition {
            Transition::None => {}
            Transition::Quit => {
                info!("Quit requested by scene");
                self.quit = true;
            }
            Transition::Push(id) => {
                debug!(scene = scene_label(&id), "Pushing scene");
                if let Some(scene) = self.open(id)? {
                    self.stack.push(scene);
                }
            }
            Transition::Pop => {
                if self.stack.len() <= 1 {
                    warn!("Ignoring pop of the last scene");
                    return Ok(());
                }
                if let Some(scene) = self.stack.pop() {
                    debug!(scene = scene.name(), "Popping scene");
                    self.close(scene);
                }
                if let Some(top) = self.stack.last_mut() {
                    top.resume();
                }
            }
            Transition::Replace(id) => {
                debug!(scene = scene_label(&id), "Replacing top scene");
                if let Some(scene) = self.stack.pop() {
                    self.close(scene);
                }
                if let Some(scene) = self.open(id)? {
                    self.stack.push(scene);
                }
                self.ensure_not_empty()?;
            }
            Transition::Switch(id) => {
                debug!(scene = scene_label(&id), "Switching scenes");
                self.close_all();
                if let Some(scene) = self.open(id)? {
                    self.stack.push(scene);
                }
                self.ensure_not_empty()?;
            }
        }
        trace!(stack = ?self.scene_names(), "Scene stack");
        Ok(())
    }

    /// Exits every scene and saves progress.
    pub fn shutdown(&mut self) {
        self.close_all();
        match self.progress.save(&self.config.save_path) {
            Ok(()) => info!(path = %self.config.save_path.display(), "Progress saved"),
            Err(error) => warn!(%error, "Failed to save progress on exit"),
        }
    }

    /// Builds and enters a scene. A level that fails to load resets the stack to the menu with a notice, and
    /// `None` is returned.
    fn open(&mut self, id: SceneId) -> GameResult<Option<Scene>> {
        let mut scene = Scene::build(id);
        let result = {
            let mut ctx = SceneContext {
                config: &self.config,
                progress: &mut self.progress,
                rng: &mut self.rng,
            };
            scene.enter(&mut ctx)
        };

        match result {
            Ok(()) => Ok(Some(scene)),
            Err(GameError::LevelLoad(load_error)) => {
                error!(error = %load_error, "Level failed to load, returning to the menu");
                self.close_all();
                let mut menu = Scene::build(SceneId::Menu {
                    notice: Some(format!("Could not load level: {load_error}")),
                });
                let mut ctx = SceneContext {
                    config: &self.config,
                    progress: &mut self.progress,
                    rng: &mut self.rng,
                };
                menu.enter(&mut ctx)?;
                self.stack.push(menu);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    fn close(&mut self, mut scene: Scene) {
        let mut ctx = SceneContext {
            config: &self.config,
            progress: &mut self.progress,
            rng: &mut self.rng,
        };
        scene.exit(&mut ctx);
    }

    fn close_all(&mut self) {
        while let Some(scene) = self.stack.pop() {
            self.close(scene);
        }
    }

    fn ensure_not_empty(&mut self) -> GameResult<()> {
        if self.stack.is_empty() {
            warn!("Scene stack emptied, returning to the menu");
            if let Some(menu) = self.open(SceneId::menu())? {
                self.stack.push(menu);
            }
        }
        Ok(())
    }
}

fn scene_label(id: &SceneId) -> &str {
    match id {
        SceneId::Menu { .. } => "menu",
        SceneId::Level { name, .. } => name,
        SceneId::Pause => "pause",
        SceneId::GameOver(_) => "game_over",
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
