//! SDL2 window, input and flat-color rendering.

use std::time::Duration;

use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;
use sdl2::{EventPump, Sdl};
use tracing::{debug, info, trace};

use crate::app::Platform;
use crate::config::GameConfig;
use crate::error::{GameError, GameResult, PlatformError};
use crate::events::InputEvent;
use crate::helpers::Rect;
use crate::input::{Bindings, Key, KeyEvent};
use crate::render::{Color, DrawSurface, Sprite};

/// Maps an SDL keycode to a game key. Unknown keys are ignored.
pub fn map_keycode(keycode: Keycode) -> Option<Key> {
    let key = match keycode {
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::A => Key::A,
        Keycode::D => Key::D,
        Keycode::W => Key::W,
        Keycode::S => Key::S,
        Keycode::Space => Key::Space,
        Keycode::F => Key::F,
        Keycode::G => Key::G,
        Keycode::E => Key::E,
        Keycode::Q => Key::Q,
        Keycode::R => Key::R,
        Keycode::Tab => Key::Tab,
        Keycode::P => Key::P,
        Keycode::Escape => Key::Escape,
        Keycode::Return => Key::Return,
        Keycode::Backspace => Key::Backspace,
        Keycode::LShift => Key::LeftShift,
        Keycode::Comma => Key::Comma,
        Keycode::Period => Key::Period,
        _ => return None,
    };
    Some(key)
}

fn sdl_color(color: Color) -> pixels::Color {
    pixels::Color::RGBA(color.r, color.g, color.b, color.a)
}

fn render_error(error: String) -> GameError {
    GameError::Render(error)
}

/// A [`DrawSurface`] over an SDL2 window canvas.
pub struct CanvasSurface {
    canvas: Canvas<Window>,
    size: Vec2,
}

impl CanvasSurface {
    fn fill(&mut self, rect: Rect, color: Color) -> GameResult<()> {
        if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
            return Ok(());
        }
        self.canvas.set_draw_color(sdl_color(color));
        let sdl_rect = sdl2::rect::Rect::new(
            rect.position.x.round() as i32,
            rect.position.y.round() as i32,
            rect.size.x.round().max(1.0) as u32,
            rect.size.y.round().max(1.0) as u32,
        );
        self.canvas.fill_rect(sdl_rect).map_err(render_error)
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, color: Color) -> GameResult<()> {
        self.canvas.set_draw_color(sdl_color(color));
        self.canvas.clear();
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> GameResult<()> {
        self.fill(rect, color)
    }

    fn draw_sprite(&mut self, sprite: Sprite, position: Vec2, size: Vec2, flip_x: bool) -> GameResult<()> {
        self.fill(Rect::from_position_size(position, size), sprite.placeholder_color())?;

        // Characters get an eye so their facing reads at a glance.
        if matches!(sprite, Sprite::Player | Sprite::PlayerHurt | Sprite::Slime) {
            let eye = Vec2::splat(4.0);
            let x = if flip_x { position.x + 4.0 } else { position.x + size.x - 8.0 };
            self.fill(Rect::from_position_size(Vec2::new(x, position.y + 6.0), eye), Color::rgb(20, 20, 20))?;
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) -> GameResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.canvas
            .string(position.x.round() as i16, position.y.round() as i16, text, sdl_color(color))
            .map_err(render_error)
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

pub struct DesktopPlatform {
    surface: CanvasSurface,
    event_pump: EventPump,
    bindings: Bindings,
    focused: bool,
    // Keeps SDL initialized for as long as the platform lives.
    _sdl_context: Sdl,
}

impl DesktopPlatform {
    /// Opens a window sized from the configured viewport and scale.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Init`] if any SDL initialization step fails.
    pub fn new(config: &GameConfig) -> Result<Self, PlatformError> {
        info!("Initializing SDL2");
        let sdl_context = sdl2::init().map_err(PlatformError::Init)?;
        let video_subsystem = sdl_context.video().map_err(PlatformError::Init)?;
        let event_pump = sdl_context.event_pump().map_err(PlatformError::Init)?;

        let width = (config.viewport_width as f32 * config.scale).round() as u32;
        let height = (config.viewport_height as f32 * config.scale).round() as u32;
        trace!(width, height, scale = config.scale, "Creating game window");
        let window = video_subsystem
            .window("Luna's Endless Lesson", width, height)
            .resizable()
            .position_centered()
            .build()
            .map_err(|error| PlatformError::Init(error.to_string()))?;

        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|error| PlatformError::Init(error.to_string()))?;
        canvas
            .set_logical_size(config.viewport_width, config.viewport_height)
            .map_err(|error| PlatformError::Init(error.to_string()))?;
        canvas.set_blend_mode(BlendMode::Blend);
        debug!(renderer_info = ?canvas.info(), "Canvas renderer initialized");

        Ok(Self {
            surface: CanvasSurface {
                canvas,
                size: config.viewport(),
            },
            event_pump,
            bindings: Bindings::default(),
            focused: true,
            _sdl_context: sdl_context,
        })
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }
}

impl Platform for DesktopPlatform {
    fn poll_events(&mut self) -> GameResult<Vec<InputEvent>> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            let key_event = match event {
                Event::Quit { .. } => {
                    events.push(InputEvent::Quit);
                    continue;
                }
                Event::Window { win_event, .. } => {
                    match win_event {
                        WindowEvent::FocusGained => {
                            debug!("Window focus gained");
                            self.focused = true;
                        }
                        WindowEvent::FocusLost => {
                            debug!("Window focus lost");
                            self.focused = false;
                        }
                        _ => {}
                    }
                    continue;
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => map_keycode(keycode).map(KeyEvent::Down),
                Event::KeyUp {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => map_keycode(keycode).map(KeyEvent::Up),
                _ => None,
            };

            match key_event {
                Some(KeyEvent::Down(Key::Q)) => events.push(InputEvent::Quit),
                Some(key_event) => events.extend(self.bindings.translate(key_event)),
                None => {}
            }
        }
        Ok(events)
    }

    fn surface(&mut self) -> &mut dyn DrawSurface {
        &mut self.surface
    }

    fn present(&mut self) -> GameResult<()> {
        self.surface.canvas.present();
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        if self.focused {
            spin_sleep::sleep(duration);
        } else {
            std::thread::sleep(duration);
        }
    }
}
