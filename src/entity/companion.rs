use glam::Vec2;
use strum_macros::IntoStaticStr;

use crate::constants::companion::*;
use crate::emotion::{Emotion, Trigger};
use crate::entity::{Actor, EntityId, Facing};
use crate::error::EntityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum CompanionBehavior {
    /// Closing in on its spot next to the player.
    Following,
    /// Settled at its spot.
    Waiting,
    /// Celebrating something the player did.
    Cheering,
}

/// A small flying friend that hovers behind the player. It ignores level geometry.
#[derive(Debug, Clone)]
pub struct Companion {
    pub actor: Actor,
    pub emotion: Emotion,
    behavior: CompanionBehavior,
    cheer_timer: f32,
}

impl Companion {
    pub fn new(id: EntityId, position: Vec2, decay_per_second: f32) -> Self {
        Self {
            actor: Actor::new(id, position, SIZE, 1),
            emotion: Emotion::new(decay_per_second),
            behavior: CompanionBehavior::Waiting,
            cheer_timer: 0.0,
        }
    }

    pub fn behavior(&self) -> CompanionBehavior {
        self.behavior
    }

    /// Where the companion wants its top-left corner to be.
    pub fn target_for(player_center: Vec2, player_facing: Facing) -> Vec2 {
        let offset = Vec2::new(FOLLOW_OFFSET.x * player_facing.sign(), FOLLOW_OFFSET.y);
        player_center + offset - SIZE / 2.0
    }

    /// Shares the player's moment; cheering only follows good news.
    pub fn react(&mut self, trigger: Trigger) {
        self.emotion.trigger(trigger);
        if matches!(
            trigger,
            Trigger::ItemCollected | Trigger::EnemyDefeated | Trigger::LevelCleared
        ) {
            self.behavior = CompanionBehavior::Cheering;
            self.cheer_timer = CHEER_TIME;
        }
    }

    pub fn update(&mut self, dt: f32, player_center: Vec2, player_facing: Facing) -> Result<(), EntityError> {
        if !self.actor.is_alive() {
            return Ok(());
        }

        let target = Self::target_for(player_center, player_facing);
        let to_target = target - self.actor.body.position;
        let distance = to_target.length();

        if self.behavior == CompanionBehavior::Cheering {
            self.cheer_timer -= dt;
            if self.cheer_timer <= 0.0 {
                self.behavior = CompanionBehavior::Waiting;
            }
        }

        if distance > SETTLE_DISTANCE {
            let t = (FOLLOW_RATE * dt).clamp(0.0, 1.0);
            self.actor.body.position += to_target * t;
            self.actor.body.velocity = if dt > 0.0 { to_target * t / dt } else { Vec2::ZERO };
            if self.behavior != CompanionBehavior::Cheering {
                self.behavior = CompanionBehavior::Following;
            }
        } else {
            self.actor.body.velocity = Vec2::ZERO;
            if self.behavior == CompanionBehavior::Following {
                self.behavior = CompanionBehavior::Waiting;
            }
        }

        if let Some(facing) = Facing::from_velocity(self.actor.body.velocity.x) {
            self.actor.facing = facing;
        }
        self.emotion.update(dt);
        self.actor.check_finite()
    }
}
