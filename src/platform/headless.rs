//! A windowless platform: scripted input, recorded drawing, a fixed time step.

use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec2;
use tracing::debug;

use crate::app::Platform;
use crate::error::GameResult;
use crate::events::InputEvent;
use crate::render::{DrawSurface, RecordingSurface};

pub struct HeadlessPlatform {
    surface: RecordingSurface,
    /// Events to deliver, keyed by the frame they arrive on.
    script: BTreeMap<u64, Vec<InputEvent>>,
    frame: u64,
    max_frames: Option<u64>,
    step: f32,
}

impl HeadlessPlatform {
    pub fn new(size: Vec2, step: f32) -> Self {
        Self {
            surface: RecordingSurface::new(size),
            script: BTreeMap::new(),
            frame: 0,
            max_frames: None,
            step,
        }
    }

    /// Sends [`InputEvent::Quit`] once `frames` frames have run.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Queues `event` for delivery at the start of frame `frame`, counted from zero.
    pub fn schedule(&mut self, frame: u64, event: InputEvent) {
        self.script.entry(frame).or_default().push(event);
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The draw calls of the last presented frame.
    pub fn recorded(&self) -> &RecordingSurface {
        &self.surface
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> GameResult<Vec<InputEvent>> {
        let mut events = self.script.remove(&self.frame).unwrap_or_default();
        if self.max_frames.is_some_and(|max| self.frame >= max) {
            debug!(frame = self.frame, "Frame limit reached");
            events.push(InputEvent::Quit);
        }
        self.surface.reset();
        Ok(events)
    }

    fn surface(&mut self) -> &mut dyn DrawSurface {
        &mut self.surface
    }

    fn present(&mut self) -> GameResult<()> {
        self.frame += 1;
        Ok(())
    }

    fn sleep(&mut self, _duration: Duration) {}

    fn fixed_delta(&self) -> Option<f32> {
        Some(self.step)
    }
}
