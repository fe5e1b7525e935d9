//! Overlap detection between entities and against special tiles.
//!
//! Detection never changes entities; it only queues [`GameEvent`]s. Entities are visited in creation order, so when
//! one entity overlaps several others the events come out ordered by [`EntityId`].

use smallvec::SmallVec;

use crate::entity::{Entities, Entity, EntityId, EntityKind};
use crate::events::{EventQueue, GameEvent};
use crate::helpers::Rect;
use crate::map::{Level, Tile};

/// Ids of living entities of `kind` whose boxes overlap `rect`, in creation order.
pub fn overlapping(entities: &Entities, rect: &Rect, kind: EntityKind) -> SmallVec<[EntityId; 8]> {
    entities
        .iter()
        .filter(|entity| entity.kind() == kind)
        .map(Entity::actor)
        .filter(|actor| actor.is_alive() && actor.rect().overlaps(rect))
        .map(|actor| actor.id)
        .collect()
}

/// Queues every entity-versus-entity event for this frame.
///
/// - The player touching an enemy or an item.
/// - The active sword swing against enemies: only the first enemy hit counts.
/// - Each arrow's path since its last update against enemies: only the first enemy hit counts.
pub fn detect(entities: &Entities, queue: &mut EventQueue) {
    if let Some(player) = entities.player().filter(|player| player.actor.is_alive()) {
        let rect = player.actor.rect();
        for enemy in overlapping(entities, &rect, EntityKind::Enemy) {
            queue.push(GameEvent::PlayerTouchesEnemy { enemy });
        }
        for item in overlapping(entities, &rect, EntityKind::Item) {
            queue.push(GameEvent::PlayerCollectsItem { item });
        }

        if let Some(hitbox) = player.sword_hitbox() {
            if let Some(enemy) = overlapping(entities, &hitbox, EntityKind::Enemy).first() {
                queue.push(GameEvent::SwordHitsEnemy { enemy: *enemy });
            }
        }
    }

    for arrow in entities.iter().filter_map(|entity| match entity {
        Entity::Projectile(projectile) if projectile.actor.is_alive() => Some(projectile),
        _ => None,
    }) {
        if let Some(enemy) = overlapping(entities, &arrow.swept_rect(), EntityKind::Enemy).first() {
            queue.push(GameEvent::ArrowHitsEnemy {
                arrow: arrow.actor.id,
                enemy: *enemy,
            });
        }
    }
}

/// Queues hazard and exit contacts for a player occupying `rect`. Each fires at most once per call.
pub fn detect_tiles(level: &Level, rect: &Rect, queue: &mut EventQueue) {
    let tiles = level.tiles_overlapping(rect);
    if tiles.iter().any(|(tile, _)| *tile == Tile::Hazard) {
        queue.push(GameEvent::PlayerTouchesHazard);
    }
    if tiles.iter().any(|(tile, _)| *tile == Tile::Exit) {
        queue.push(GameEvent::PlayerReachesExit);
    }
}
