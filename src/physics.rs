//! Integration and tile collision for moving bodies.
//!
//! Bodies integrate with semi-implicit Euler (velocity first, then position) and then move through the level one
//! axis at a time: X is resolved before Y, in sub-steps no longer than half a tile, so a body can neither tunnel
//! through a thin wall nor slip through the corner between two tiles.

use bitflags::bitflags;
use glam::Vec2;

use crate::helpers::{is_finite_vec, Rect};
use crate::map::Level;

/// A moving axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    /// Top-left corner, in world pixels.
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    pub fn is_finite(&self) -> bool {
        is_finite_vec(self.position) && is_finite_vec(self.velocity)
    }
}

bitflags! {
    /// Which sides of a body were blocked during a move.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Contacts: u8 {
        const GROUND = 1 << 0;
        const CEILING = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// Applies `acceleration` to the velocity for `dt` seconds.
pub fn accelerate(body: &mut Body, acceleration: Vec2, dt: f32) {
    body.velocity += acceleration * dt;
}

/// Semi-implicit Euler step without any collision: velocity first, then position.
pub fn integrate(body: &mut Body, acceleration: Vec2, dt: f32) {
    accelerate(body, acceleration, dt);
    body.position += body.velocity * dt;
}

/// Moves `body` by `displacement` through `level`, resolving X before Y.
///
/// Blocked axes have their velocity zeroed. The body is kept inside the level bounds; hitting a bound counts as a
/// contact on that side. A body that starts clear of solid tiles never ends a move overlapping one.
pub fn move_and_collide(body: &mut Body, displacement: Vec2, level: &Level) -> Contacts {
    let mut contacts = Contacts::empty();
    if !is_finite_vec(displacement) {
        return contacts;
    }

    let max_step = level.tile_size() / 2.0;
    let longest = displacement.x.abs().max(displacement.y.abs());
    let steps = ((longest / max_step).ceil() as u32).max(1);
    let step = displacement / steps as f32;

    for _ in 0..steps {
        if step.x != 0.0 {
            contacts |= move_axis_x(body, step.x, level);
        }
        if step.y != 0.0 {
            contacts |= move_axis_y(body, step.y, level);
        }
    }

    if contacts.intersects(Contacts::LEFT | Contacts::RIGHT) {
        body.velocity.x = 0.0;
    }
    if contacts.intersects(Contacts::GROUND | Contacts::CEILING) {
        body.velocity.y = 0.0;
    }
    contacts
}

fn move_axis_x(body: &mut Body, dx: f32, level: &Level) -> Contacts {
    let mut contacts = Contacts::empty();
    body.position.x += dx;

    let max_x = (level.size().x - body.size.x).max(0.0);
    if body.position.x < 0.0 {
        body.position.x = 0.0;
        contacts |= Contacts::LEFT;
    } else if body.position.x > max_x {
        body.position.x = max_x;
        contacts |= Contacts::RIGHT;
    }

    let rect = body.rect();
    let solids = level.tiles_overlapping(&rect);
    let solids = solids.iter().filter(|(tile, _)| tile.is_solid()).map(|(_, rect)| rect);
    if dx > 0.0 {
        if let Some(wall) = solids.map(Rect::left).reduce(f32::min) {
            body.position.x = snap_before(wall, body.size.x);
            contacts |= Contacts::RIGHT;
        }
    } else if let Some(wall) = solids.map(Rect::right).reduce(f32::max) {
        body.position.x = wall;
        contacts |= Contacts::LEFT;
    }
    contacts
}

fn move_axis_y(body: &mut Body, dy: f32, level: &Level) -> Contacts {
    let mut contacts = Contacts::empty();
    body.position.y += dy;

    let max_y = (level.size().y - body.size.y).max(0.0);
    if body.position.y < 0.0 {
        body.position.y = 0.0;
        contacts |= Contacts::CEILING;
    } else if body.position.y > max_y {
        body.position.y = max_y;
        contacts |= Contacts::GROUND;
    }

    let rect = body.rect();
    let solids = level.tiles_overlapping(&rect);
    let solids = solids.iter().filter(|(tile, _)| tile.is_solid()).map(|(_, rect)| rect);
    if dy > 0.0 {
        if let Some(floor) = solids.map(Rect::top).reduce(f32::min) {
            body.position.y = snap_before(floor, body.size.y);
            contacts |= Contacts::GROUND;
        }
    } else if let Some(ceiling) = solids.map(Rect::bottom).reduce(f32::max) {
        body.position.y = ceiling;
        contacts |= Contacts::CEILING;
    }
    contacts
}

/// The largest start coordinate whose far edge (`start + extent`) does not pass `edge`.
fn snap_before(edge: f32, extent: f32) -> f32 {
    let mut start = edge - extent;
    while start + extent > edge {
        start = start.next_down();
    }
    start
}
