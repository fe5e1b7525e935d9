use glam::Vec2;
use luna::constants::player::{DEATH_DELAY, SIZE};
use luna::entity::ability::Unlocks;
use luna::entity::item::ItemKind;
use luna::entity::{Entity, EntityKind};
use luna::events::{Action, InputEvent};
use luna::map::Level;
use luna::progress::Progress;
use luna::render::{RecordingSurface, Sprite};
use luna::scene::level::LevelScene;
use luna::scene::{RenderContext, SceneId, Transition};
use pretty_assertions::assert_eq;
use serde_json::json;
use speculoos::prelude::*;

mod common;
use common::{level, level_json_with, Harness, ROOM};

const DT: f32 = 1.0 / 60.0;

fn room_with(row: &str) -> Level {
    let mut rows = ROOM.to_vec();
    rows[4] = row;
    level(&rows)
}

/// Runs frames until the scene asks for a transition, or `frames` have passed.
fn run_until_transition(scene: &mut LevelScene, harness: &mut Harness, frames: usize) -> Transition {
    for _ in 0..frames {
        let transition = scene.update(DT, &mut harness.ctx()).unwrap();
        if !transition.is_none() {
            return transition;
        }
    }
    Transition::None
}

#[test]
fn test_player_spawns_standing_on_its_tile() {
    let mut harness = Harness::new();
    let scene = LevelScene::from_level(level(ROOM), &mut harness.ctx());

    let player = scene.player().unwrap();
    assert_eq!(player.actor.body.position, Vec2::new(68.0, 116.0));
    assert_eq!(player.actor.body.size, SIZE);
    assert_eq!(scene.name(), "test");
}

#[test]
fn test_idle_player_stays_on_the_floor() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(level(ROOM), &mut harness.ctx());

    assert_that(&run_until_transition(&mut scene, &mut harness, 60).is_none()).is_true();

    let player = scene.player().unwrap();
    assert_that(&player.on_ground()).is_true();
    assert_that(&(player.actor.rect().bottom() - 160.0).abs()).is_less_than(0.01);
}

#[test]
fn test_walking_into_a_coin_scores_once() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(room_with("#.Pc.....#"), &mut harness.ctx());
    assert_eq!(scene.entities().count_alive(EntityKind::Item), 1);

    scene.handle_event(&InputEvent::Pressed(Action::MoveRight));
    run_until_transition(&mut scene, &mut harness, 30);

    assert_eq!(scene.score().points(), 50);
    assert_eq!(scene.score().breakdown().coins, 1);
    assert_eq!(scene.entities().count_alive(EntityKind::Item), 0);
    assert_that(&scene.entities().iter().any(|entity| entity.kind() == EntityKind::Item)).is_false();
}

#[test]
fn test_hearts_only_spawn_once_unlocked() {
    let mut harness = Harness::new();
    let scene = LevelScene::from_level(room_with("#.Ph.....#"), &mut harness.ctx());
    assert_eq!(scene.entities().count_alive(EntityKind::Item), 0);

    let progress = Progress {
        unlocks: Unlocks::all(),
        ..Progress::default()
    };
    let mut harness = Harness::with_progress(progress);
    let mut scene = LevelScene::from_level(room_with("#.Ph.....#"), &mut harness.ctx());
    assert_eq!(scene.entities().count_alive(EntityKind::Item), 1);

    scene.handle_event(&InputEvent::Pressed(Action::MoveRight));
    run_until_transition(&mut scene, &mut harness, 30);

    assert_eq!(scene.player().unwrap().inventory.count(ItemKind::Heart), 1);
}

#[test]
fn test_pause_is_requested_before_anything_moves() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(level(ROOM), &mut harness.ctx());
    let before = scene.player().unwrap().actor.body.position;

    assert_that(&scene.handle_event(&InputEvent::Pressed(Action::Pause))).is_true();
    let transition = scene.update(DT, &mut harness.ctx()).unwrap();

    assert!(matches!(transition, Transition::Push(SceneId::Pause)));
    assert_eq!(scene.player().unwrap().actor.body.position, before);
}

#[test]
fn test_quit_is_left_for_the_game() {
    let mut scene = LevelScene::new("forest", None);
    assert_that(&scene.handle_event(&InputEvent::Quit)).is_false();
}

#[test]
fn test_update_before_enter_is_an_error() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::new("forest", None);
    assert_that(&scene.update(DT, &mut harness.ctx()).is_err()).is_true();
}

#[test]
fn test_enter_loads_embedded_level() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::new("forest", None);
    scene.enter(&mut harness.ctx()).unwrap();

    assert_that(&scene.level().is_some()).is_true();
    assert_that(&scene.player().is_some()).is_true();
    assert_that(&scene.entities().count_alive(EntityKind::Enemy)).is_greater_than(0);
}

#[test]
fn test_death_leads_to_game_over_after_delay() {
    let rows = [
        "##########",
        "#........#",
        "#.P......#",
        "#^^^^^^^^#",
        "##########",
    ];
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(level(&rows), &mut harness.ctx());
    scene.entities_mut().player_mut().unwrap().actor.health.damage(95);

    let mut frames = 0;
    while !scene.is_player_dead() && frames < 120 {
        let transition = scene.update(DT, &mut harness.ctx()).unwrap();
        assert_that(&transition.is_none()).is_true();
        frames += 1;
    }
    assert_that(&scene.is_player_dead()).is_true();
    assert_eq!(harness.progress.deaths, 1);
    assert_that(&harness.config.save_path.exists()).is_true();

    // The player stays in the scene while the delay runs
    let delay_frames = (DEATH_DELAY / DT) as usize;
    for _ in 0..delay_frames - 2 {
        assert_that(&scene.update(DT, &mut harness.ctx()).unwrap().is_none()).is_true();
    }
    assert_that(&scene.player().is_some()).is_true();

    match run_until_transition(&mut scene, &mut harness, 10) {
        Transition::Switch(SceneId::GameOver(summary)) => {
            assert_that(&summary.victory).is_false();
            assert_eq!(summary.level, "test");
            assert_eq!(summary.unlocked, Some(Unlocks::HEARTS));
        }
        other => panic!("expected game over, got {other:?}"),
    }
    assert_that(&harness.progress.unlocks.contains(Unlocks::HEARTS)).is_true();
}

#[test]
fn test_exit_on_last_level_is_a_victory() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(room_with("#.P.E....#"), &mut harness.ctx());

    scene.handle_event(&InputEvent::Pressed(Action::MoveRight));
    match run_until_transition(&mut scene, &mut harness, 60) {
        Transition::Switch(SceneId::GameOver(summary)) => {
            assert_that(&summary.victory).is_true();
            assert_eq!(summary.unlocked, None);
        }
        other => panic!("expected victory, got {other:?}"),
    }
}

#[test]
fn test_exit_leads_to_next_level_with_score() {
    let mut rows = ROOM.to_vec();
    rows[4] = "#.PcE....#";
    let raw = level_json_with(&rows, json!({ "next": "night" }));
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(Level::from_json(&raw).unwrap(), &mut harness.ctx());

    scene.handle_event(&InputEvent::Pressed(Action::MoveRight));
    match run_until_transition(&mut scene, &mut harness, 60) {
        Transition::Replace(SceneId::Level { name, score }) => {
            assert_eq!(name, "night");
            assert_eq!(score.map(|score| score.points()), Some(50));
        }
        other => panic!("expected the next level, got {other:?}"),
    }
}

#[test]
fn test_enemies_respawn_up_to_the_minimum() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(room_with("#.P....s.#"), &mut harness.ctx());
    assert_eq!(scene.entities().count_alive(EntityKind::Enemy), 1);
    scene.spawner_mut().max_alive = 3;

    scene.update(DT, &mut harness.ctx()).unwrap();

    let alive = scene.entities().count_alive(EntityKind::Enemy);
    assert_that(&alive).is_greater_than_or_equal_to(2);
    assert_that(&alive).is_less_than_or_equal_to(3);
}

#[test]
fn test_render_draws_player_tiles_and_hud() {
    let mut harness = Harness::new();
    let scene = LevelScene::from_level(level(ROOM), &mut harness.ctx());
    let mut surface = RecordingSurface::new(harness.config.viewport());

    let ctx = RenderContext {
        config: &harness.config,
        progress: &harness.progress,
        timings: None,
    };
    scene.render(&mut surface, &ctx).unwrap();

    assert_eq!(surface.sprite_count(Sprite::Player), 1);
    assert_that(&surface.sprite_count(Sprite::SolidTile)).is_greater_than(0);
    assert_that(&surface.texts().count()).is_greater_than(0);
}

#[test]
fn test_dead_enemy_leaves_after_one_frame() {
    let mut harness = Harness::new();
    let mut scene = LevelScene::from_level(room_with("#.P....s.#"), &mut harness.ctx());
    scene.spawner_mut().min_alive = 0;
    let enemy = scene
        .entities()
        .iter()
        .find(|entity| entity.kind() == EntityKind::Enemy)
        .map(Entity::id)
        .unwrap();
    scene.entities_mut().get_mut(enemy).unwrap().actor_mut().kill();

    assert_that(&scene.entities().get(enemy).is_some()).is_true();
    scene.update(DT, &mut harness.ctx()).unwrap();
    assert_that(&scene.entities().get(enemy).is_none()).is_true();
}
