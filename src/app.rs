use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::error::GameResult;
use crate::events::InputEvent;
use crate::formatter;
use crate::game::Game;
use crate::render::DrawSurface;
use crate::timing::{FrameTimings, TimingPhase};

/// What the main loop needs from a windowing backend.
pub trait Platform {
    /// Input received since the last call, in the order it happened.
    fn poll_events(&mut self) -> GameResult<Vec<InputEvent>>;

    /// The surface the next frame is drawn to.
    fn surface(&mut self) -> &mut dyn DrawSurface;

    /// Shows the finished frame.
    fn present(&mut self) -> GameResult<()>;

    fn sleep(&mut self, duration: Duration);

    /// A fixed simulation step overriding wall-clock time, for deterministic runs.
    fn fixed_delta(&self) -> Option<f32> {
        None
    }
}

/// Main application wrapper: owns the game and the platform and drives the frame loop.
pub struct App<P: Platform> {
    pub game: Game,
    platform: P,
    timings: FrameTimings,
    last_tick: Instant,
    frame_time: Duration,
    max_frame_delta: f32,
}

impl<P: Platform> App<P> {
    pub fn new(game: Game, platform: P) -> Self {
        let frame_time = game.config().frame_time();
        let max_frame_delta = game.config().max_frame_delta;
        Self {
            game,
            platform,
            timings: FrameTimings::default(),
            last_tick: Instant::now(),
            frame_time,
            max_frame_delta,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn timings(&self) -> &FrameTimings {
        &self.timings
    }

    /// Runs frames until the game quits. Progress is saved on the way out, also after a failure.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the game or the platform; the loop is not restarted.
    pub fn run(&mut self) -> GameResult<()> {
        info!(frame_time = ?self.frame_time, "Starting game loop");
        let result = loop {
            match self.run_frame() {
                Ok(true) => continue,
                Ok(false) => break Ok(()),
                Err(error) => break Err(error),
            }
        };
        self.game.shutdown();
        info!(frames = self.timings.frames(), "Game loop finished");
        result
    }

    /// Runs a single frame: input, update, render, present, then sleep for the rest of the frame.
    ///
    /// Returns `false` once the game wants to quit.
    pub fn run_frame(&mut self) -> GameResult<bool> {
        let start = Instant::now();
        let elapsed = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = start;
        let dt = self.platform.fixed_delta().unwrap_or(elapsed);
        if dt > self.max_frame_delta {
            debug!(dt, clamped = self.max_frame_delta, "Clamping long frame");
        }
        let dt = dt.clamp(0.0, self.max_frame_delta);

        formatter::increment_frame();

        for event in self.platform.poll_events()? {
            self.game.handle_input(event);
        }
        if self.game.should_quit() {
            return Ok(false);
        }

        let update_start = Instant::now();
        self.game.update(dt)?;
        self.timings.record(TimingPhase::Update, update_start.elapsed());
        if self.game.should_quit() {
            return Ok(false);
        }

        let render_start = Instant::now();
        self.game.render(self.platform.surface(), Some(&self.timings))?;
        self.platform.present()?;
        self.timings.record(TimingPhase::Render, render_start.elapsed());

        let frame = start.elapsed();
        self.timings.record(TimingPhase::Frame, frame);
        if frame < self.frame_time {
            self.platform.sleep(self.frame_time - frame);
        } else {
            trace!(behind = ?(frame - self.frame_time), "Frame over budget");
            if frame > self.frame_time * 4 {
                warn!(frame = ?frame, "Game loop far behind schedule");
            }
        }
        Ok(true)
    }
}
