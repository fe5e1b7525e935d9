use glam::Vec2;

use crate::constants::projectile::*;
use crate::entity::{Actor, EntityId, Facing};
use crate::error::EntityError;
use crate::helpers::Rect;
use crate::map::Level;

/// An arrow flying in a straight line until it hits something or expires.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub actor: Actor,
    pub damage: u32,
    lifetime: f32,
    /// Where the arrow was before its last update.
    previous: Vec2,
    /// Set when the arrow struck a tile or the level edge; it is spent on the next update.
    stopped: bool,
}

impl Projectile {
    /// An arrow leaving a shooter whose center is `origin`, travelling towards `facing`.
    pub fn arrow(id: EntityId, origin: Vec2, facing: Facing) -> Self {
        let position = origin - ARROW_SIZE / 2.0;
        let mut actor = Actor::new(id, position, ARROW_SIZE, 1);
        actor.facing = facing;
        actor.body.velocity = Vec2::new(facing.sign() * ARROW_SPEED, 0.0);
        Self {
            actor,
            damage: ARROW_DAMAGE,
            lifetime: ARROW_LIFETIME,
            previous: position,
            stopped: false,
        }
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// The area the arrow covered during its last update, from where it was to where it is now.
    pub fn swept_rect(&self) -> Rect {
        let current = self.actor.body.position;
        let min = self.previous.min(current);
        let max = self.previous.max(current);
        Rect::from_position_size(min, max - min + self.actor.body.size)
    }

    /// Flies without gravity, through the level's tile collision. An arrow that touches a solid tile or the level
    /// edge stops there, can still hit an enemy along the path it just flew, and is spent on its next update.
    pub fn update(&mut self, dt: f32, level: Option<&Level>) -> Result<(), EntityError> {
        if !self.actor.is_alive() {
            return Ok(());
        }
        if self.stopped {
            self.previous = self.actor.body.position;
            self.actor.kill();
            return Ok(());
        }

        self.lifetime -= dt;
        self.previous = self.actor.body.position;
        let contacts = self.actor.step(Vec2::ZERO, dt, level)?;

        if !contacts.is_empty() {
            self.stopped = true;
            self.actor.body.velocity = Vec2::ZERO;
        }
        if self.lifetime <= 0.0 {
            self.actor.kill();
        }
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Spends the arrow on a hit.
    pub fn hit(&mut self) {
        self.actor.kill();
    }
}
