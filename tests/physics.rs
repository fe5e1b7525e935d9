use glam::Vec2;
use luna::entity::{Actor, EntityId, IdAllocator};
use luna::physics::{self, Body, Contacts};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use speculoos::prelude::*;

mod common;
use common::level;

fn first_id() -> EntityId {
    IdAllocator::default().allocate()
}

#[test]
fn test_free_body_moves_by_velocity() {
    let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(10.0));
    body.velocity = Vec2::new(50.0, 0.0);

    physics::integrate(&mut body, Vec2::ZERO, 1.0);

    assert_that(&body.position).is_equal_to(Vec2::new(150.0, 100.0));
    assert_that(&body.velocity).is_equal_to(Vec2::new(50.0, 0.0));
}

#[test]
fn test_actor_step_without_level_matches_scenario() {
    let mut actor = Actor::new(first_id(), Vec2::new(100.0, 100.0), Vec2::splat(10.0), 10);
    actor.body.velocity = Vec2::new(50.0, 0.0);

    let contacts = actor.step(Vec2::ZERO, 1.0, None).unwrap();

    assert_that(&contacts).is_equal_to(Contacts::empty());
    assert_that(&actor.body.position).is_equal_to(Vec2::new(150.0, 100.0));
}

#[test]
fn test_velocity_updates_before_position() {
    let mut body = Body::new(Vec2::ZERO, Vec2::splat(10.0));
    physics::integrate(&mut body, Vec2::new(0.0, 10.0), 1.0);

    // Semi-implicit: the new velocity is already used for this step's displacement
    assert_that(&body.velocity.y).is_equal_to(10.0);
    assert_that(&body.position.y).is_equal_to(10.0);
}

#[test]
fn test_split_steps_stay_close_to_a_single_step() {
    let acceleration = Vec2::new(30.0, 1800.0);
    for dt in [1.0 / 120.0, 1.0 / 60.0, 0.05, 0.1] {
        let mut whole = Body::new(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        whole.velocity = Vec2::new(120.0, -300.0);
        let mut halves = whole;

        physics::integrate(&mut whole, acceleration, dt);
        physics::integrate(&mut halves, acceleration, dt / 2.0);
        physics::integrate(&mut halves, acceleration, dt / 2.0);

        let bound = 0.25 * acceleration.length() * dt * dt + 1e-3;
        assert_that(&whole.position.distance(halves.position)).is_less_than_or_equal_to(bound);
    }
}

#[test]
fn test_fast_fall_lands_on_floor_without_overlap() {
    let level = level(common::ROOM);
    let mut body = Body::new(Vec2::new(100.0, 40.0), Vec2::new(24.0, 44.0));
    body.velocity = Vec2::new(0.0, 2000.0);

    let displacement = body.velocity * 0.1;
    let contacts = physics::move_and_collide(&mut body, displacement, &level);

    assert_that(&contacts.contains(Contacts::GROUND)).is_true();
    assert_that(&level.overlaps_solid(&body.rect())).is_false();
    assert_that(&body.velocity.y).is_equal_to(0.0);
    // Floor row starts at y = 5 * 32
    assert_that(&(body.rect().bottom() - 160.0).abs()).is_less_than(0.01);
}

#[test]
fn test_wall_blocks_horizontal_movement() {
    let level = level(common::ROOM);
    let mut body = Body::new(Vec2::new(200.0, 100.0), Vec2::new(24.0, 44.0));
    body.velocity = Vec2::new(3000.0, 0.0);

    let contacts = physics::move_and_collide(&mut body, Vec2::new(300.0, 0.0), &level);

    assert_that(&contacts.contains(Contacts::RIGHT)).is_true();
    assert_that(&level.overlaps_solid(&body.rect())).is_false();
    assert_that(&body.velocity.x).is_equal_to(0.0);
    // The right wall starts at x = 9 * 32
    assert_that(&body.rect().right()).is_less_than_or_equal_to(288.0);
}

#[test]
fn test_no_tunnelling_through_a_thin_wall() {
    let level = level(&[
        "..........",
        ".....#....",
        ".....#....",
        ".P...#....",
        "##########",
    ]);
    let mut body = Body::new(Vec2::new(40.0, 100.0), Vec2::new(20.0, 20.0));

    physics::move_and_collide(&mut body, Vec2::new(250.0, 0.0), &level);

    assert_that(&body.rect().right()).is_less_than_or_equal_to(160.0);
}

#[test]
fn test_random_moves_never_end_inside_a_solid_tile() {
    let level = level(&[
        "##########",
        "#........#",
        "#..#.....#",
        "#.....##.#",
        "#.P......#",
        "##########",
    ]);
    let mut rng = SmallRng::seed_from_u64(0x5EED);

    for _ in 0..200 {
        let size = Vec2::new(rng.random_range(6.0..40.0), rng.random_range(6.0..44.0));
        let mut body = loop {
            let position = Vec2::new(
                rng.random_range(0.0..level.size().x - size.x),
                rng.random_range(0.0..level.size().y - size.y),
            );
            let candidate = Body::new(position, size);
            if !level.overlaps_solid(&candidate.rect()) {
                break candidate;
            }
        };

        for _ in 0..8 {
            let displacement = Vec2::new(rng.random_range(-400.0..400.0), rng.random_range(-400.0..400.0));
            physics::move_and_collide(&mut body, displacement, &level);
            assert!(
                !level.overlaps_solid(&body.rect()),
                "{:?} overlaps a solid tile after moving by {displacement:?}",
                body.rect()
            );
        }
    }
}

#[test]
fn test_bodies_stay_inside_level_bounds() {
    let level = level(&["....", ".P..", "...."]);
    let mut body = Body::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));

    let contacts = physics::move_and_collide(&mut body, Vec2::new(-50.0, -50.0), &level);

    assert_that(&body.position).is_equal_to(Vec2::ZERO);
    assert_that(&contacts.contains(Contacts::LEFT | Contacts::CEILING)).is_true();
}

#[test]
fn test_non_finite_actor_is_frozen_at_last_position() {
    let mut actor = Actor::new(first_id(), Vec2::new(10.0, 20.0), Vec2::splat(10.0), 10);
    actor.body.velocity = Vec2::new(f32::NAN, 0.0);

    let result = actor.step(Vec2::ZERO, 0.1, None);

    assert_that(&result.is_err()).is_true();
    assert_that(&actor.is_frozen()).is_true();
    assert_that(&actor.is_alive()).is_false();
    assert_that(&actor.body.position).is_equal_to(Vec2::new(10.0, 20.0));
    assert_that(&actor.body.velocity).is_equal_to(Vec2::ZERO);
}
