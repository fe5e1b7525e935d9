use std::time::Duration;

use glam::Vec2;
use luna::camera::Camera;
use luna::entity::ability::Unlocks;
use luna::entity::item::ItemKind;
use luna::entity::player::Player;
use luna::entity::IdAllocator;
use luna::formatter;
use luna::hud::{self, text_width, HudView, GLYPH_WIDTH};
use luna::render::RecordingSurface;
use luna::score::Score;
use luna::timing::{format_timing_display, FrameTimings, TimingPhase};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use strum::EnumCount;

#[test]
fn test_timing_rows_line_up() {
    let lines = format_timing_display([
        ("update", Duration::from_micros(1500), Duration::from_micros(1250)),
        ("frame", Duration::from_micros(16667), Duration::from_micros(2000)),
    ]);

    assert_eq!(lines[0], "update :  1.500ms ± 1.250ms");
    assert_eq!(lines[1], "frame  : 16.667ms ± 2.000ms");
}

#[test]
fn test_timing_units_scale() {
    let lines = format_timing_display([
        ("a", Duration::from_secs(2), Duration::from_nanos(500)),
        ("b", Duration::from_micros(40), Duration::from_millis(3)),
    ]);

    assert_eq!(lines[0], "a :  2.000s  ± 500.000ns");
    assert_eq!(lines[1], "b : 40.000µs ±   3.000ms");
}

#[test]
fn test_frame_timings_report_every_phase() {
    let mut timings = FrameTimings::default();
    timings.record(TimingPhase::Update, Duration::from_millis(2));
    timings.record(TimingPhase::Update, Duration::from_millis(4));
    timings.record(TimingPhase::Frame, Duration::from_millis(16));

    assert_eq!(timings.frames(), 1);
    assert_eq!(timings.phase(TimingPhase::Update).latest(), Duration::from_millis(4));
    assert_eq!(timings.lines().len(), TimingPhase::COUNT);
    assert_that(&timings.phase(TimingPhase::Render).is_empty()).is_true();
}

#[test]
fn test_frame_counter_increments() {
    let before = formatter::frame_count();
    formatter::increment_frame();
    formatter::increment_frame();
    assert_that(&formatter::frame_count()).is_greater_than_or_equal_to(before + 2);
}

#[test]
fn test_text_width_counts_characters() {
    assert_eq!(text_width(""), 0.0);
    assert_eq!(text_width("µs"), 2.0 * GLYPH_WIDTH);
}

#[test]
fn test_hud_shows_health_score_and_inventory() {
    let player = {
        let mut player = Player::new(IdAllocator::default().allocate(), Vec2::ZERO, 0.2);
        player.actor.health.damage(30);
        player.inventory.add(ItemKind::Heart);
        player
    };
    let mut score = Score::default();
    score.record_coin(Vec2::new(50.0, 50.0));
    let camera = Camera::new(Vec2::new(800.0, 640.0), None);
    let mut surface = RecordingSurface::new(Vec2::new(800.0, 640.0));

    hud::render(
        &mut surface,
        &HudView {
            player: &player,
            companion: None,
            score: &score,
            unlocks: Unlocks::all(),
            level_name: "forest",
            camera: &camera,
            timings: None,
        },
    )
    .unwrap();

    let texts: Vec<&str> = surface.texts().collect();
    assert_that(&texts.contains(&"HP 70/100")).is_true();
    assert_that(&texts.contains(&"Score 50")).is_true();
    assert_that(&texts.contains(&"+50")).is_true();
    assert_that(&texts.contains(&"forest")).is_true();
    assert_that(&texts.contains(&"Luna: Neutral")).is_true();
}
