//! Short-lived visual effects.
//!
//! Particles live in a bounded pool. Spawning into a full pool evicts the oldest particle, so a burst of effects
//! can never grow per-frame work without limit.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::warn;

use crate::error::GameResult;
use crate::helpers::{is_finite_vec, Rect};
use crate::render::{Color, DrawSurface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining lifetime, in seconds.
    pub lifetime: f32,
    /// Lifetime at spawn; used to fade the particle out.
    pub initial_lifetime: f32,
    pub color: Color,
    pub size: f32,
}

impl Particle {
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    fn is_finite(&self) -> bool {
        is_finite_vec(self.position) && is_finite_vec(self.velocity) && self.lifetime.is_finite()
    }
}

#[derive(Debug)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: VecDeque::with_capacity(max_particles.min(1024)),
            max_particles: max_particles.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn spawn(&mut self, position: Vec2, velocity: Vec2, lifetime: f32) {
        self.spawn_particle(Particle {
            position,
            velocity,
            lifetime,
            initial_lifetime: lifetime,
            color: Color::rgb(255, 255, 255),
            size: 3.0,
        });
    }

    pub fn spawn_particle(&mut self, particle: Particle) {
        while self.particles.len() >= self.max_particles {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Spawns `count` particles flying out of `origin` in random directions.
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        count: usize,
        speed: f32,
        lifetime: f32,
        color: Color,
    ) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..TAU);
            let speed = speed * rng.random_range(0.4..1.0);
            let lifetime = lifetime * rng.random_range(0.6..1.0);
            self.spawn_particle(Particle {
                position: origin,
                velocity: Vec2::from_angle(angle) * speed,
                lifetime,
                initial_lifetime: lifetime,
                color,
                size: rng.random_range(2.0..5.0),
            });
        }
    }

    /// Drops particles that had already expired, then advances the rest.
    ///
    /// After the call, the pool holds exactly the particles whose lifetime was positive before it. A particle with
    /// non-finite state empties the pool.
    pub fn update(&mut self, dt: f32) {
        self.particles.retain(|particle| !particle.is_expired());

        for particle in self.particles.iter_mut() {
            particle.position += particle.velocity * dt;
            particle.lifetime -= dt;
        }

        if self.particles.iter().any(|particle| !particle.is_finite()) {
            warn!(count = self.particles.len(), "Non-finite particle, resetting the pool");
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.particles.clear();
    }

    /// Draws every live particle, shifted by the camera offset and faded by remaining lifetime.
    pub fn render(&self, surface: &mut dyn DrawSurface, camera_offset: Vec2) -> GameResult<()> {
        for particle in self.particles.iter().filter(|particle| !particle.is_expired()) {
            let fade = if particle.initial_lifetime > 0.0 {
                particle.lifetime / particle.initial_lifetime
            } else {
                0.0
            };
            let rect = Rect::centered_with_size(
                particle.position - camera_offset,
                Vec2::splat(particle.size),
            );
            surface.fill_rect(rect, particle.color.faded(fade))?;
        }
        Ok(())
    }
}
