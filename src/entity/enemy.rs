//! Enemies: patrol routes, player detection, chasing and attacks, plus the spawner that keeps levels populated.

use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::IntoStaticStr;
use tracing::trace;

use crate::constants::enemy::*;
use crate::entity::{Actor, EntityId, EntityState, Facing};
use crate::error::EntityError;
use crate::events::GameEvent;
use crate::map::Level;
use crate::physics::Contacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum EnemyKind {
    Slime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum Behavior {
    Patrolling,
    Chasing,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub actor: Actor,
    pub kind: EnemyKind,
    pub damage: u32,
    behavior: Behavior,
    /// Patrol targets, visited in order.
    waypoints: SmallVec<[f32; 4]>,
    waypoint: usize,
    attack_cooldown: f32,
}

impl Enemy {
    /// A slime standing at `position` that patrols back and forth around its spawn, within the level.
    pub fn slime(id: EntityId, position: Vec2, level_width: f32) -> Self {
        let max_x = (level_width - SLIME_SIZE.x).max(0.0);
        let waypoints = SmallVec::from_buf([
            (position.x - PATROL_RADIUS).clamp(0.0, max_x),
            (position.x + PATROL_RADIUS).clamp(0.0, max_x),
            position.x.clamp(0.0, max_x),
            (position.x + PATROL_RADIUS / 2.0).clamp(0.0, max_x),
        ]);
        Self::new(id, EnemyKind::Slime, position, waypoints)
    }

    pub fn new(id: EntityId, kind: EnemyKind, position: Vec2, waypoints: SmallVec<[f32; 4]>) -> Self {
        Self {
            actor: Actor::new(id, position, SLIME_SIZE, SLIME_HEALTH),
            kind,
            damage: SLIME_DAMAGE,
            behavior: Behavior::Patrolling,
            waypoints,
            waypoint: 0,
            attack_cooldown: 0.0,
        }
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// The x coordinate the enemy is currently patrolling towards.
    pub fn current_waypoint(&self) -> Option<f32> {
        self.waypoints.get(self.waypoint).copied()
    }

    /// Whether a player centered at `target` is within sight.
    pub fn can_see(&self, target: Vec2) -> bool {
        let center = self.actor.center();
        (target.x - center.x).abs() <= DETECTION_RANGE && (target.y - center.y).abs() <= DETECTION_HEIGHT
    }

    /// Picks a velocity for this frame. Returns an attack event when the player is in range and the attack is off
    /// cooldown.
    pub fn think(&mut self, player: Option<Vec2>, dt: f32) -> Option<GameEvent> {
        if !self.actor.is_alive() {
            return None;
        }
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);

        let center = self.actor.center();
        let target = player.filter(|target| self.can_see(*target));
        let next = if target.is_some() { Behavior::Chasing } else { Behavior::Patrolling };
        if next != self.behavior {
            trace!(id = %self.actor.id, from = ?self.behavior, to = ?next, "Enemy behavior changed");
            self.behavior = next;
        }

        let mut attack = None;
        match target {
            Some(target) => {
                let dx = target.x - center.x;
                self.actor.body.velocity.x = if dx.abs() > CHASE_MIN_DISTANCE {
                    dx.signum() * PATROL_SPEED * CHASE_MULTIPLIER
                } else {
                    0.0
                };
                if let Some(facing) = Facing::from_velocity(dx) {
                    self.actor.facing = facing;
                }

                if center.distance(target) <= ATTACK_RANGE && self.attack_cooldown <= 0.0 {
                    self.attack_cooldown = ATTACK_COOLDOWN;
                    attack = Some(GameEvent::EnemyAttacksPlayer { enemy: self.actor.id });
                }
            }
            None => self.patrol(),
        }
        attack
    }

    fn patrol(&mut self) {
        let Some(target) = self.current_waypoint() else {
            self.actor.body.velocity.x = 0.0;
            return;
        };

        let dx = target - self.actor.body.position.x;
        if dx.abs() <= WAYPOINT_TOLERANCE {
            self.advance_waypoint();
            self.actor.body.velocity.x = 0.0;
            return;
        }

        self.actor.body.velocity.x = dx.signum() * PATROL_SPEED;
        if let Some(facing) = Facing::from_velocity(dx) {
            self.actor.facing = facing;
        }
    }

    fn advance_waypoint(&mut self) {
        if !self.waypoints.is_empty() {
            self.waypoint = (self.waypoint + 1) % self.waypoints.len();
        }
    }

    /// Moves the enemy under gravity. A patrolling enemy that walks into a wall gives up on its waypoint.
    pub fn update(&mut self, dt: f32, level: Option<&Level>, gravity: f32) -> Result<Contacts, EntityError> {
        if !self.actor.is_alive() {
            return Ok(Contacts::empty());
        }

        let contacts = self.actor.step(Vec2::new(0.0, gravity), dt, level)?;
        if self.behavior == Behavior::Patrolling && contacts.intersects(Contacts::LEFT | Contacts::RIGHT) {
            self.advance_waypoint();
        }

        self.actor.state = if contacts.contains(Contacts::GROUND) || level.is_none() {
            if self.actor.body.velocity.x != 0.0 {
                EntityState::Walking
            } else {
                EntityState::Idle
            }
        } else {
            EntityState::Jumping
        };
        Ok(contacts)
    }
}

/// Keeps the number of living enemies between a floor and a ceiling.
///
/// Below the floor, the missing enemies spawn immediately; otherwise one more spawns every interval until the
/// ceiling is reached.
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    pub min_alive: usize,
    pub max_alive: usize,
    pub interval: f32,
    timer: f32,
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self::new(MIN_ALIVE, MAX_ALIVE, SPAWN_INTERVAL)
    }
}

impl EnemySpawner {
    pub fn new(min_alive: usize, max_alive: usize, interval: f32) -> Self {
        Self {
            min_alive: min_alive.min(max_alive),
            max_alive,
            interval,
            timer: 0.0,
        }
    }

    /// Advances the timer and returns how many enemies to spawn now, given `alive` living enemies.
    pub fn update(&mut self, dt: f32, alive: usize) -> usize {
        if alive >= self.max_alive {
            self.timer = 0.0;
            return 0;
        }
        if alive < self.min_alive {
            self.timer = 0.0;
            return self.min_alive - alive;
        }

        self.timer += dt.max(0.0);
        if self.timer >= self.interval {
            self.timer = 0.0;
            1
        } else {
            0
        }
    }
}
