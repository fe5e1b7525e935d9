use luna::app::App;
use luna::events::{Action, InputEvent};
use luna::game::Game;
use luna::platform::HeadlessPlatform;
use luna::progress::Progress;
use luna::render::{RecordingSurface, Sprite};
use luna::scene::{Scene, SceneId, Transition};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use tempfile::TempDir;

mod common;
use common::test_config;

const DT: f32 = 1.0 / 60.0;

fn new_game(dir: &TempDir) -> Game {
    Game::new(test_config(dir), Progress::default()).unwrap()
}

fn press(game: &mut Game, action: Action) {
    game.handle_input(InputEvent::Pressed(action));
    game.update(DT).unwrap();
}

#[test]
fn test_game_starts_on_menu_with_intro() {
    let dir = TempDir::new().unwrap();
    let game = new_game(&dir);

    assert_eq!(game.scene_names(), vec!["menu"]);
    let Some(Scene::Menu(menu)) = game.top() else {
        panic!("expected the menu");
    };
    assert_that(&menu.dialogue().is_empty()).is_false();
}

#[test]
fn test_start_switches_to_first_level() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);

    press(&mut game, Action::Confirm);

    assert_eq!(game.scene_names(), vec!["level"]);
    assert_that(&game.progress().seen_intro).is_true();
    let Some(Scene::Level(level)) = game.top() else {
        panic!("expected a level");
    };
    assert_eq!(level.name(), "forest");
}

#[test]
fn test_pause_overlay_consumes_input_and_resumes() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);
    press(&mut game, Action::Confirm);

    press(&mut game, Action::Pause);
    assert_eq!(game.scene_names(), vec!["level", "pause"]);

    let mut surface = RecordingSurface::new(game.config().viewport());
    game.render(&mut surface, None).unwrap();
    assert_that(&surface.texts().any(|text| text == "Paused")).is_true();
    assert_that(&surface.sprite_count(Sprite::Player)).is_equal_to(1);

    game.handle_input(InputEvent::Pressed(Action::MoveRight));
    game.update(DT).unwrap();
    assert_eq!(game.scene_names(), vec!["level", "pause"]);

    press(&mut game, Action::Pause);
    assert_eq!(game.scene_names(), vec!["level"]);
}

#[test]
fn test_paused_level_does_not_move() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);
    press(&mut game, Action::Confirm);
    press(&mut game, Action::Pause);

    let position = |game: &Game| match game.top() {
        Some(Scene::Level(level)) => level.player().map(|player| player.actor.body.position),
        _ => None,
    };
    for _ in 0..30 {
        game.handle_input(InputEvent::Pressed(Action::MoveRight));
        game.update(DT).unwrap();
    }
    assert_eq!(game.scene_names(), vec!["level", "pause"]);

    press(&mut game, Action::Cancel);
    assert_eq!(game.scene_names(), vec!["level"]);
    let before = position(&game);
    game.update(DT).unwrap();
    // Input held before the pause was forgotten on resume, so the player does not walk on its own.
    assert_eq!(
        position(&game).map(|position| position.x),
        before.map(|position| position.x)
    );
}

#[test]
fn test_quit_to_menu_from_pause() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);
    press(&mut game, Action::Confirm);
    press(&mut game, Action::Pause);

    game.handle_input(InputEvent::Pressed(Action::Down));
    press(&mut game, Action::Confirm);

    assert_eq!(game.scene_names(), vec!["menu"]);
}

#[test]
fn test_stack_never_empties() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);

    game.apply_transition(Transition::Pop).unwrap();
    assert_eq!(game.scene_names(), vec!["menu"]);

    game.apply_transition(Transition::Replace(SceneId::Pause)).unwrap();
    assert_eq!(game.scene_names(), vec!["pause"]);

    game.apply_transition(Transition::Pop).unwrap();
    assert_eq!(game.scene_names(), vec!["pause"]);
}

#[test]
fn test_push_and_pop_restore_previous_scene() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);

    game.apply_transition(Transition::Push(SceneId::Pause)).unwrap();
    assert_eq!(game.scene_names(), vec!["menu", "pause"]);
    game.apply_transition(Transition::Pop).unwrap();
    assert_eq!(game.scene_names(), vec!["menu"]);
}

#[test]
fn test_unknown_first_level_returns_to_menu_with_notice() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.first_level = "moon".to_string();
    let mut game = Game::new(config, Progress::default()).unwrap();

    press(&mut game, Action::Confirm);

    assert_eq!(game.scene_names(), vec!["menu"]);
    let Some(Scene::Menu(menu)) = game.top() else {
        panic!("expected the menu");
    };
    assert_that(&menu.notice().is_some_and(|notice| notice.contains("moon"))).is_true();
}

#[test]
fn test_menu_cancel_and_quit_event_stop_the_game() {
    let dir = TempDir::new().unwrap();
    let mut game = new_game(&dir);
    press(&mut game, Action::Cancel);
    assert_that(&game.should_quit()).is_true();

    let mut game = new_game(&dir);
    game.handle_input(InputEvent::Quit);
    assert_that(&game.should_quit()).is_true();
}

#[test]
fn test_reset_progress_from_menu() {
    let dir = TempDir::new().unwrap();
    let mut progress = Progress::default();
    progress.record_death();
    progress.record_score(500);
    let mut game = Game::new(test_config(&dir), progress).unwrap();

    game.handle_input(InputEvent::Pressed(Action::Down));
    press(&mut game, Action::Confirm);

    assert_eq!(game.progress().deaths, 0);
    assert_eq!(game.progress().best_score, 0);
    let Some(Scene::Menu(menu)) = game.top() else {
        panic!("expected the menu");
    };
    assert_eq!(menu.notice(), Some("Progress reset"));
    assert_eq!(Progress::load(&game.config().save_path), Progress::default());
}

#[test]
fn test_headless_app_runs_scripted_frames() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let save_path = config.save_path.clone();
    let game = Game::new(config.clone(), Progress::default()).unwrap();

    let mut platform = HeadlessPlatform::new(config.viewport(), DT).with_max_frames(20);
    platform.schedule(2, InputEvent::Pressed(Action::Confirm));
    platform.schedule(5, InputEvent::Pressed(Action::MoveRight));

    let mut app = App::new(game, platform);
    app.run().unwrap();

    assert_eq!(app.platform().frame(), 20);
    assert_eq!(app.timings().frames(), 20);
    assert_that(&app.game.progress().seen_intro).is_true();
    assert_that(&Progress::load(&save_path).seen_intro).is_true();
}

#[test]
fn test_headless_frames_draw_the_scene() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let game = Game::new(config.clone(), Progress::default()).unwrap();
    let platform = HeadlessPlatform::new(config.viewport(), DT);

    let mut app = App::new(game, platform);
    assert_that(&app.run_frame().unwrap()).is_true();

    assert_that(&app.platform().recorded().texts().any(|text| text == "Luna's Endless Lesson")).is_true();
}
