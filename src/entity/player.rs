use glam::Vec2;

use crate::constants::{physics, player::*};
use crate::emotion::{Emotion, Trigger};
use crate::entity::ability::{AbilitySet, Attack, Unlocks};
use crate::entity::inventory::Inventory;
use crate::entity::item::ItemKind;
use crate::entity::{Actor, EntityId, EntityState, Facing};
use crate::error::EntityError;
use crate::events::Action;
use crate::helpers::Rect;
use crate::input::InputState;
use crate::map::Level;
use crate::physics::Contacts;

/// Seconds at the start of the invulnerability window during which the player shows as hurt.
const HURT_FLASH: f32 = 0.3;

/// What a pressed action asks the level to do beyond the player's own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Attack(Attack),
    Dashed,
    Healed(u32),
}

#[derive(Debug, Clone)]
pub struct Player {
    pub actor: Actor,
    pub abilities: AbilitySet,
    pub inventory: Inventory,
    pub emotion: Emotion,
    invulnerable: f32,
    on_ground: bool,
    jump_requested: bool,
    low_health_warned: bool,
}

impl Player {
    pub fn new(id: EntityId, position: Vec2, decay_per_second: f32) -> Self {
        Self {
            actor: Actor::new(id, position, SIZE, MAX_HEALTH),
            abilities: AbilitySet::default(),
            inventory: Inventory::default(),
            emotion: Emotion::new(decay_per_second),
            invulnerable: 0.0,
            on_ground: false,
            jump_requested: false,
            low_health_warned: false,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Handles a newly pressed action. Movement is read from [`InputState`] during [`Player::update`] instead.
    pub fn press(&mut self, action: Action, unlocks: Unlocks) -> Option<PlayerCommand> {
        if !self.actor.is_alive() {
            return None;
        }

        match action {
            Action::Jump | Action::Up => {
                self.jump_requested = true;
                None
            }
            Action::Attack => self.abilities.attack(unlocks).map(PlayerCommand::Attack),
            Action::Dash => self.abilities.dash(unlocks).then_some(PlayerCommand::Dashed),
            Action::SwitchWeapon => {
                self.abilities.switch_weapon(unlocks);
                None
            }
            Action::UseItem => self.use_selected(unlocks).map(PlayerCommand::Healed),
            Action::NextSlot => {
                self.inventory.select_next();
                None
            }
            Action::PrevSlot => {
                self.inventory.select_prev();
                None
            }
            _ => None,
        }
    }

    /// Uses the selected inventory slot. Hearts need to be unlocked and the player must be missing health.
    fn use_selected(&mut self, unlocks: Unlocks) -> Option<u32> {
        if !unlocks.contains(Unlocks::HEARTS) || self.actor.health.current() == self.actor.health.max() {
            return None;
        }

        let slot = self.inventory.selected();
        if self.inventory.slots().get(slot).copied().flatten() != Some(ItemKind::Heart) {
            return None;
        }
        self.inventory.take_selected();

        let healed = self.actor.health.heal(HEART_HEAL);
        self.emotion.trigger(Trigger::Healed);
        if self.actor.health.current() > LOW_HEALTH {
            self.low_health_warned = false;
        }
        Some(healed)
    }

    /// Applies damage unless invulnerable. Returns `Some(died)` if the hit landed.
    pub fn hurt(&mut self, amount: u32) -> Option<bool> {
        if !self.actor.is_alive() || self.is_invulnerable() {
            return None;
        }

        let died = self.actor.take_damage(amount);
        if died {
            self.emotion.trigger(Trigger::PlayerDied);
            return Some(true);
        }

        self.invulnerable = INVULNERABILITY;
        self.actor.state = EntityState::Hurt;
        self.emotion.trigger(Trigger::DamageTaken);
        if self.actor.health.current() <= LOW_HEALTH && !self.low_health_warned {
            self.low_health_warned = true;
            self.emotion.trigger(Trigger::LowHealth);
        }
        Some(false)
    }

    /// The sword hitbox while a swing that has not landed yet is in progress.
    pub fn sword_hitbox(&self) -> Option<Rect> {
        if !self.actor.is_alive() || !self.abilities.swing_can_hit() {
            return None;
        }

        use crate::constants::ability::{SWORD_HEIGHT, SWORD_REACH};
        let rect = self.actor.rect();
        let x = match self.actor.facing {
            Facing::Right => rect.right(),
            Facing::Left => rect.left() - SWORD_REACH,
        };
        let y = rect.center().y - SWORD_HEIGHT / 2.0;
        Some(Rect::new(x, y, SWORD_REACH, SWORD_HEIGHT))
    }

    /// Runs one frame of movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the body became non-finite; the player is then back at its last finite position.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        level: Option<&Level>,
        gravity: f32,
    ) -> Result<Contacts, EntityError> {
        self.emotion.update(dt);
        if !self.actor.is_alive() {
            self.jump_requested = false;
            return Ok(Contacts::empty());
        }

        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.abilities.update(dt);

        let dashing = self.abilities.is_dashing();
        let body = &mut self.actor.body;
        if dashing {
            body.velocity = Vec2::new(self.actor.facing.sign() * physics::DASH_SPEED, 0.0);
        } else {
            body.velocity.x = input.horizontal() * physics::WALK_SPEED;
            if let Some(facing) = Facing::from_velocity(body.velocity.x) {
                self.actor.facing = facing;
            }
        }

        if std::mem::take(&mut self.jump_requested) && self.on_ground && !dashing {
            self.actor.body.velocity.y = -physics::JUMP_SPEED;
        }

        let acceleration = if dashing { Vec2::ZERO } else { Vec2::new(0.0, gravity) };
        // Terminal velocity applies to the velocity the step starts from.
        self.actor.body.velocity.y = self.actor.body.velocity.y.min(physics::MAX_FALL_SPEED);
        let contacts = self.actor.step(acceleration, dt, level)?;
        self.actor.body.velocity.y = self.actor.body.velocity.y.min(physics::MAX_FALL_SPEED);

        self.on_ground = contacts.contains(Contacts::GROUND);
        self.actor.state = if self.invulnerable > INVULNERABILITY - HURT_FLASH {
            EntityState::Hurt
        } else if !self.on_ground {
            EntityState::Jumping
        } else if self.actor.body.velocity.x != 0.0 {
            EntityState::Walking
        } else {
            EntityState::Idle
        };

        Ok(contacts)
    }
}
