//! Parallax scenery and weather overlays.
//!
//! Layers scroll at a fraction of the camera's movement (farther layers move less) and repeat horizontally. Weather
//! is drawn last in screen space, so it ignores the camera; its only state is a time accumulator.

use glam::Vec2;
use serde::Deserialize;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::constants::palette;
use crate::error::GameResult;
use crate::helpers::Rect;
use crate::map::Theme;
use crate::render::{Color, DrawSurface};

const RAIN_DROPS: usize = 80;
const RAIN_SPEED: f32 = 520.0;
const FIREFLIES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, EnumIter, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fireflies,
}

/// One repeating band of scenery.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    /// Fraction of camera movement applied to the layer, in `[0, 1]`.
    pub factor: f32,
    pub color: Color,
    /// Screen-space top of the band when the camera is at the origin.
    pub top: f32,
    /// Width of one repetition.
    pub period: f32,
    /// Heights of the columns making up one repetition, as fractions of `height`.
    pub profile: Vec<f32>,
    pub height: f32,
}

impl ParallaxLayer {
    /// Screen offset of the layer for a camera offset.
    pub fn offset(&self, camera_offset: Vec2) -> Vec2 {
        -camera_offset * self.factor
    }

    fn render(&self, surface: &mut dyn DrawSurface, camera_offset: Vec2) -> GameResult<()> {
        if self.profile.is_empty() || self.period <= 0.0 {
            return Ok(());
        }

        let offset = self.offset(camera_offset);
        let screen = surface.size();
        let column = self.period / self.profile.len() as f32;
        let start = offset.x.rem_euclid(self.period) - self.period;
        let repeats = (screen.x / self.period).ceil() as usize + 2;

        for repeat in 0..repeats {
            let base = start + repeat as f32 * self.period;
            for (index, fraction) in self.profile.iter().enumerate() {
                let height = self.height * fraction;
                let top = self.top + offset.y + (self.height - height);
                let rect = Rect::new(base + index as f32 * column, top, column, screen.y - top);
                surface.fill_rect(rect, self.color)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Background {
    pub theme: Theme,
    pub weather: Weather,
    sky: Color,
    layers: Vec<ParallaxLayer>,
    time: f32,
}

impl Background {
    pub fn new(theme: Theme, weather: Weather, viewport: Vec2) -> Self {
        let (sky, far, near) = match theme {
            Theme::Day => (palette::DAY_SKY, Color::rgb(110, 160, 110), Color::rgb(60, 120, 70)),
            Theme::Night => (palette::NIGHT_SKY, Color::rgb(20, 32, 52), Color::rgb(12, 22, 36)),
        };
        let layers = vec![
            ParallaxLayer {
                factor: 0.2,
                color: far,
                top: viewport.y * 0.45,
                period: 320.0,
                profile: vec![0.5, 0.8, 1.0, 0.7, 0.4, 0.6, 0.9, 0.5],
                height: viewport.y * 0.2,
            },
            ParallaxLayer {
                factor: 0.5,
                color: near,
                top: viewport.y * 0.6,
                period: 192.0,
                profile: vec![0.3, 0.9, 0.6, 1.0, 0.4, 0.7],
                height: viewport.y * 0.15,
            },
        ];
        Self::with_layers(theme, weather, sky, layers)
    }

    pub fn with_layers(theme: Theme, weather: Weather, sky: Color, layers: Vec<ParallaxLayer>) -> Self {
        Self {
            theme,
            weather,
            sky,
            layers,
            time: 0.0,
        }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        if !self.time.is_finite() {
            self.time = 0.0;
        }
    }

    /// Sky, then layers from far to near, then weather.
    pub fn render(&self, surface: &mut dyn DrawSurface, camera_offset: Vec2) -> GameResult<()> {
        surface.clear(self.sky)?;
        for layer in &self.layers {
            layer.render(surface, camera_offset)?;
        }
        self.render_weather(surface)
    }

    fn render_weather(&self, surface: &mut dyn DrawSurface) -> GameResult<()> {
        let screen = surface.size();
        if screen.x <= 0.0 || screen.y <= 0.0 {
            return Ok(());
        }

        match self.weather {
            Weather::Clear => Ok(()),
            Weather::Rain => {
                let color = Color::rgba(170, 190, 230, 150);
                for drop in 0..RAIN_DROPS {
                    // Spread drops with co-prime strides so they do not line up.
                    let x = (drop as f32 * 97.0).rem_euclid(screen.x);
                    let y = (drop as f32 * 53.0 + self.time * RAIN_SPEED).rem_euclid(screen.y);
                    surface.fill_rect(Rect::new(x, y, 2.0, 10.0), color)?;
                }
                Ok(())
            }
            Weather::Fireflies => {
                for fly in 0..FIREFLIES {
                    let phase = fly as f32 * 1.7;
                    let x = (fly as f32 * 151.0 + (self.time * 0.6 + phase).sin() * 30.0).rem_euclid(screen.x);
                    let y = screen.y * 0.35
                        + (fly as f32 * 37.0).rem_euclid(screen.y * 0.5)
                        + (self.time * 0.9 + phase).cos() * 20.0;
                    let glow = 0.5 + 0.5 * (self.time * 3.0 + phase).sin();
                    surface.fill_rect(Rect::new(x, y, 3.0, 3.0), Color::rgb(240, 250, 120).faded(glow))?;
                }
                Ok(())
            }
        }
    }
}
