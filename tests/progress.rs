use luna::entity::ability::Unlocks;
use luna::entity::item::ItemKind;
use luna::progress::Progress;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use tempfile::TempDir;

#[test]
fn test_deaths_unlock_hearts_then_bow() {
    let mut progress = Progress::default();
    assert_that(&progress.unlocks.contains(Unlocks::HEARTS)).is_false();

    assert_eq!(progress.record_death(), Some(Unlocks::HEARTS));
    assert_eq!(progress.story_part, 1);
    assert_eq!(progress.record_death(), Some(Unlocks::BOW));
    assert_eq!(progress.story_part, 2);
    assert_eq!(progress.record_death(), None);

    assert_eq!(progress.deaths, 3);
    assert_that(&progress.unlocks.contains(Unlocks::all())).is_true();
}

#[test]
fn test_story_dialogue_follows_progress() {
    let mut progress = Progress::default();
    assert_that(&progress.story_dialogue().is_empty()).is_false();

    progress.seen_intro = true;
    assert_that(&progress.story_dialogue().is_empty()).is_true();

    progress.record_death();
    assert_that(&progress.story_dialogue().iter().any(|line| line.contains("Hearts"))).is_true();

    for _ in 0..3 {
        progress.record_death();
    }
    assert_that(&progress.story_dialogue().is_empty()).is_true();
}

#[test]
fn test_best_score_only_rises() {
    let mut progress = Progress::default();
    assert_that(&progress.record_score(300)).is_true();
    assert_that(&progress.record_score(200)).is_false();
    assert_that(&progress.record_score(300)).is_false();
    assert_eq!(progress.best_score, 300);
}

#[test]
fn test_reset_keeps_settings() {
    let mut progress = Progress::default();
    progress.record_death();
    progress.settings.volume = 0.3;
    progress.inventory.add(ItemKind::Heart);

    progress.reset();

    assert_eq!(progress.deaths, 0);
    assert_eq!(progress.unlocks, Unlocks::default());
    assert_eq!(progress.inventory.count(ItemKind::Heart), 0);
    assert_eq!(progress.settings.volume, 0.3);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.json");

    let mut progress = Progress::default();
    progress.record_death();
    progress.seen_intro = true;
    progress.record_score(1234);
    progress.inventory.add(ItemKind::Heart);
    progress.inventory.select(3);
    progress.save(&path).unwrap();

    assert_eq!(Progress::load(&path), progress);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nothing.json");

    assert_that(&Progress::try_load(&path).unwrap()).is_none();
    assert_eq!(Progress::load(&path), Progress::default());
}

#[test]
fn test_corrupt_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    assert_that(&Progress::try_load(&path).is_err()).is_true();
    assert_eq!(Progress::load(&path), Progress::default());
}

#[test]
fn test_partial_file_is_normalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.json");
    std::fs::write(
        &path,
        r#"{ "deaths": 2, "inventory": { "slots": ["heart"], "selected": 40 }, "settings": { "volume": 7.0 } }"#,
    )
    .unwrap();

    let progress = Progress::load(&path);

    assert_eq!(progress.deaths, 2);
    assert_eq!(progress.inventory.slots().len(), 10);
    assert_eq!(progress.inventory.slots()[0], Some(ItemKind::Heart));
    assert_eq!(progress.inventory.selected(), 0);
    assert_eq!(progress.settings.volume, 1.0);
    assert_eq!(progress.unlocks, Unlocks::default());
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("progress.json");

    assert_that(&Progress::default().save(&path).is_err()).is_true();
}
