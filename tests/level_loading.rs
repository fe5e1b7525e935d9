use glam::IVec2;
use luna::asset::{self, LevelAsset};
use luna::background::Weather;
use luna::error::LevelLoadError;
use luna::map::parser::LevelParser;
use luna::map::{Level, SpawnKind, Theme, Tile};
use pretty_assertions::assert_eq;
use serde_json::json;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

mod common;
use common::{level_json, level_json_with};

#[test]
fn test_parse_character_mapping() {
    assert_eq!(LevelParser::parse_character('#'), Some((Tile::Solid, None)));
    assert_eq!(LevelParser::parse_character('.'), Some((Tile::Empty, None)));
    assert_eq!(LevelParser::parse_character(' '), Some((Tile::Empty, None)));
    assert_eq!(LevelParser::parse_character('^'), Some((Tile::Hazard, None)));
    assert_eq!(LevelParser::parse_character('E'), Some((Tile::Exit, None)));
    assert_eq!(LevelParser::parse_character('s'), Some((Tile::Empty, Some(SpawnKind::Slime))));
    assert_eq!(LevelParser::parse_character('C'), Some((Tile::Empty, Some(SpawnKind::Companion))));
    assert_eq!(LevelParser::parse_character('x'), None);
}

#[test]
fn test_level_collects_spawns_in_reading_order() {
    let level = Level::from_json(&level_json(&["c..s", ".P.h", "####"])).unwrap();

    assert_eq!(level.player_spawn(), IVec2::new(1, 1));
    let kinds: Vec<_> = level.spawns().iter().map(|spawn| spawn.kind).collect();
    assert_eq!(kinds, vec![SpawnKind::Coin, SpawnKind::Slime, SpawnKind::Heart]);
    assert_eq!(level.grid().get(0, 2), Some(Tile::Solid));
    assert_eq!(level.grid().get(4, 0), None);
    assert_eq!(level.size(), glam::Vec2::new(128.0, 96.0));
}

#[test]
fn test_explicit_spawns_are_appended() {
    let raw = level_json_with(&["....", ".P..", "####"], json!({ "spawns": [{ "kind": "coin", "x": 3, "y": 1 }] }));
    let level = Level::from_json(&raw).unwrap();

    assert_eq!(level.spawns_of(SpawnKind::Coin).count(), 1);
    assert_eq!(level.spawns()[0].tile, IVec2::new(3, 1));
}

#[test]
fn test_weather_defaults_from_theme() {
    let night = Level::from_json(&level_json_with(&[".P"], json!({ "theme": "night" }))).unwrap();
    assert_eq!(night.theme, Theme::Night);
    assert_eq!(night.weather, Weather::Fireflies);

    let day = Level::from_json(&level_json(&[".P"])).unwrap();
    assert_eq!(day.weather, Weather::Clear);

    let rainy = Level::from_json(&level_json_with(&[".P"], json!({ "weather": "rain" }))).unwrap();
    assert_eq!(rainy.weather, Weather::Rain);
}

#[test]
fn test_missing_player_is_rejected() {
    let result = Level::from_json(&level_json(&["....", "####"]));
    assert!(matches!(result, Err(LevelLoadError::MissingPlayerSpawn)));
}

#[test]
fn test_two_players_are_rejected() {
    let result = Level::from_json(&level_json(&["P..P", "####"]));
    assert!(matches!(result, Err(LevelLoadError::DuplicatePlayerSpawn(2))));
}

#[test]
fn test_ragged_row_is_rejected() {
    let raw = json!({ "name": "bad", "width": 4, "height": 2, "rows": ["P...", "###"] }).to_string();
    let result = Level::from_json(&raw);
    assert!(matches!(
        result,
        Err(LevelLoadError::RaggedRow { row: 1, expected: 4, found: 3 })
    ));
}

#[test]
fn test_row_count_must_match_height() {
    let raw = json!({ "name": "bad", "width": 2, "height": 3, "rows": ["P.", "##"] }).to_string();
    assert!(matches!(
        Level::from_json(&raw),
        Err(LevelLoadError::RowCount { declared: 3, found: 2 })
    ));
}

#[test]
fn test_zero_bounds_are_rejected() {
    let raw = json!({ "name": "bad", "width": 0, "height": 0, "rows": [] }).to_string();
    assert!(matches!(
        Level::from_json(&raw),
        Err(LevelLoadError::MissingBounds { width: 0, height: 0 })
    ));
}

#[test]
fn test_unknown_character_reports_position() {
    let result = Level::from_json(&level_json(&["P..", ".?."]));
    assert!(matches!(
        result,
        Err(LevelLoadError::UnknownTile { character: '?', x: 1, y: 1 })
    ));
}

#[test]
fn test_spawn_outside_level_is_rejected() {
    let raw = level_json_with(&["P.", "##"], json!({ "spawns": [{ "kind": "slime", "x": 5, "y": 0 }] }));
    assert!(matches!(
        Level::from_json(&raw),
        Err(LevelLoadError::SpawnOutOfBounds { x: 5, y: 0 })
    ));
}

#[test]
fn test_zero_tile_size_is_rejected() {
    let raw = level_json_with(&["P"], json!({ "tile_size": 0 }));
    assert!(matches!(Level::from_json(&raw), Err(LevelLoadError::InvalidTileSize(0))));
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(matches!(Level::from_json("{ not json"), Err(LevelLoadError::Json(_))));
}

#[test]
fn test_embedded_levels_load_and_chain() {
    for asset in LevelAsset::iter() {
        let level = asset::load_level(asset.name()).unwrap();
        assert_eq!(level.name, asset.name());
        assert_that(&level.overlaps_solid(&level.tile_rect(level.player_spawn()))).is_false();
    }

    let forest = asset::load_level("forest").unwrap();
    assert_eq!(forest.next.as_deref(), Some("night"));
    let night = asset::load_level("night").unwrap();
    assert_eq!(night.next, None);
}

#[test]
fn test_unknown_level_name() {
    let result = asset::load_level("moon");
    assert!(matches!(result, Err(LevelLoadError::UnknownLevel(name)) if name == "moon"));
}
