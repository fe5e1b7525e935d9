use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

use crate::constants::item::*;
use crate::entity::{Actor, EntityId};
use crate::render::Sprite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Goes into the inventory; heals when used.
    Heart,
    /// Worth a flat number of points.
    Coin,
}

impl ItemKind {
    pub fn sprite(self) -> Sprite {
        match self {
            ItemKind::Heart => Sprite::Heart,
            ItemKind::Coin => Sprite::Coin,
        }
    }
}

/// A pickup floating in place.
#[derive(Debug, Clone)]
pub struct Item {
    pub actor: Actor,
    pub kind: ItemKind,
    origin: Vec2,
    time: f32,
    consumed: bool,
}

impl Item {
    pub fn new(id: EntityId, kind: ItemKind, position: Vec2) -> Self {
        Self {
            actor: Actor::new(id, position, SIZE, 1),
            kind,
            origin: position,
            time: 0.0,
            consumed: false,
        }
    }

    /// Bobs up and down around the spawn position.
    pub fn update(&mut self, dt: f32) {
        if !self.actor.is_alive() {
            return;
        }
        self.time += dt;
        let offset = (self.time * BOB_FREQUENCY * TAU).sin() * BOB_AMPLITUDE;
        self.actor.body.position = self.origin + Vec2::new(0.0, offset);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Marks the item as taken. Returns `false` if it already was, so an item is only ever collected once.
    pub fn consume(&mut self) -> bool {
        if self.consumed || !self.actor.is_alive() {
            return false;
        }
        self.consumed = true;
        self.actor.kill();
        true
    }
}
