//! Entities and the per-scene collection that owns them.
//!
//! Every entity embeds an [`Actor`] (body, health, state) and is stored in [`Entities`] in creation order. That
//! order is the tie-break for everything that touches more than one entity in a frame.

use std::fmt;

use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::IntoStaticStr;
use tracing::warn;

use crate::error::EntityError;
use crate::helpers::Rect;
use crate::map::Level;
use crate::physics::{self, Body, Contacts};

pub mod ability;
pub mod collision;
pub mod companion;
pub mod enemy;
pub mod inventory;
pub mod item;
pub mod player;
pub mod projectile;

use companion::Companion;
use enemy::Enemy;
use item::Item;
use player::Player;
use projectile::Projectile;

/// Identifies an entity within its scene. Allocated monotonically, so ids order entities by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoStaticStr)]
pub enum EntityState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Hurt,
    /// Terminal. Dead entities are skipped by updates and collision, then removed.
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// The facing implied by a horizontal velocity; `None` when standing still.
    pub fn from_velocity(vx: f32) -> Option<Self> {
        if vx < 0.0 {
            Some(Facing::Left)
        } else if vx > 0.0 {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Hit points. Damage saturates at zero and healing at the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Removes up to `amount` points and returns how many were actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// Restores up to `amount` points and returns how many were actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.max - self.current);
        self.current += applied;
        applied
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// State shared by every entity.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: EntityId,
    pub body: Body,
    pub health: Health,
    pub state: EntityState,
    pub facing: Facing,
    frozen: bool,
    last_finite: Vec2,
}

impl Actor {
    pub fn new(id: EntityId, position: Vec2, size: Vec2, max_health: u32) -> Self {
        Self {
            id,
            body: Body::new(position, size),
            health: Health::new(max_health),
            state: EntityState::Idle,
            facing: Facing::default(),
            frozen: false,
            last_finite: position,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Alive entities take part in updates and collision.
    pub fn is_alive(&self) -> bool {
        self.state != EntityState::Dead && !self.frozen
    }

    pub fn is_dead(&self) -> bool {
        self.state == EntityState::Dead
    }

    /// Frozen entities had invalid state and are waiting to be removed.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Applies damage and returns `true` if this blow killed the entity.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health.damage(amount);
        if self.health.is_depleted() {
            self.kill();
            true
        } else {
            false
        }
    }

    pub fn kill(&mut self) {
        self.state = EntityState::Dead;
        self.body.velocity = Vec2::ZERO;
    }

    /// Advances the body by `dt`: velocity from `acceleration` first, then position, colliding with `level` when
    /// given.
    ///
    /// # Errors
    ///
    /// If the result is not finite the actor is frozen at its last finite position and an error is returned.
    pub fn step(&mut self, acceleration: Vec2, dt: f32, level: Option<&Level>) -> Result<Contacts, EntityError> {
        if !self.is_alive() {
            return Ok(Contacts::empty());
        }

        physics::accelerate(&mut self.body, acceleration, dt);
        let displacement = self.body.velocity * dt;
        let contacts = match level {
            Some(level) => physics::move_and_collide(&mut self.body, displacement, level),
            None => {
                self.body.position += displacement;
                Contacts::empty()
            }
        };

        self.check_finite()?;
        Ok(contacts)
    }

    /// Records the current position as the last known-good one, or freezes the actor if it is not finite.
    pub fn check_finite(&mut self) -> Result<(), EntityError> {
        if self.body.is_finite() {
            self.last_finite = self.body.position;
            return Ok(());
        }

        warn!(id = %self.id, position = ?self.body.position, velocity = ?self.body.velocity, "Freezing non-finite entity");
        self.body.velocity = Vec2::ZERO;
        self.body.position = self.last_finite;
        self.frozen = true;
        Err(EntityError::NonFinite(self.id))
    }

    /// Clears the frozen flag, for entities that must survive a fault.
    pub fn thaw(&mut self) {
        self.frozen = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum EntityKind {
    Player,
    Enemy,
    Item,
    Companion,
    Projectile,
}

#[derive(Debug, Clone)]
pub enum Entity {
    Player(Box<Player>),
    Enemy(Enemy),
    Item(Item),
    Companion(Companion),
    Projectile(Projectile),
}

impl Entity {
    pub fn actor(&self) -> &Actor {
        match self {
            Entity::Player(player) => &player.actor,
            Entity::Enemy(enemy) => &enemy.actor,
            Entity::Item(item) => &item.actor,
            Entity::Companion(companion) => &companion.actor,
            Entity::Projectile(projectile) => &projectile.actor,
        }
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        match self {
            Entity::Player(player) => &mut player.actor,
            Entity::Enemy(enemy) => &mut enemy.actor,
            Entity::Item(item) => &mut item.actor,
            Entity::Companion(companion) => &mut companion.actor,
            Entity::Projectile(projectile) => &mut projectile.actor,
        }
    }

    pub fn id(&self) -> EntityId {
        self.actor().id
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Enemy(_) => EntityKind::Enemy,
            Entity::Item(_) => EntityKind::Item,
            Entity::Companion(_) => EntityKind::Companion,
            Entity::Projectile(_) => EntityKind::Projectile,
        }
    }
}

/// The entities of one scene, kept in creation order.
#[derive(Debug, Default)]
pub struct Entities {
    ids: IdAllocator,
    entities: Vec<Entity>,
}

impl Entities {
    /// Allocates an id, builds the entity with it and appends it.
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = self.ids.allocate();
        self.entities.push(build(id));
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        // Ids are allocated in push order and removal keeps order, so the vector is sorted by id.
        self.entities.binary_search_by_key(&id, Entity::id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|index| &self.entities[index])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(|index| &mut self.entities[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities.iter().find_map(|entity| match entity {
            Entity::Player(player) => Some(player.as_ref()),
            _ => None,
        })
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.entities.iter_mut().find_map(|entity| match entity {
            Entity::Player(player) => Some(player.as_mut()),
            _ => None,
        })
    }

    /// Number of living entities of `kind`.
    pub fn count_alive(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.kind() == kind && entity.actor().is_alive())
            .count()
    }

    /// Removes dead and frozen entities, returning their ids in creation order.
    ///
    /// The player is never removed; its death is handled by the level.
    pub fn remove_dead(&mut self) -> SmallVec<[EntityId; 8]> {
        let mut removed = SmallVec::new();
        self.entities.retain(|entity| {
            let actor = entity.actor();
            let remove = entity.kind() != EntityKind::Player && (actor.is_dead() || actor.is_frozen());
            if remove {
                removed.push(actor.id);
            }
            !remove
        });
        removed
    }
}
