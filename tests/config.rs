use std::time::Duration;

use luna::config::GameConfig;
use luna::error::ConfigError;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use tempfile::TempDir;

#[test]
fn test_defaults_are_valid() {
    let config = GameConfig::default();
    assert_that(&config.validate().is_ok()).is_true();
    assert_eq!(config.first_level, "forest");
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = GameConfig::from_json(r#"{ "seed": 9, "gravity": 1000.0, "particles": { "max_particles": 64 } }"#).unwrap();

    assert_eq!(config.seed, Some(9));
    assert_eq!(config.gravity, 1000.0);
    assert_eq!(config.particles.max_particles, 64);
    assert_eq!(config.viewport_width, GameConfig::default().viewport_width);
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        (r#"{ "viewport_width": 0 }"#, "viewport"),
        (r#"{ "max_frame_delta": 0.0 }"#, "max_frame_delta"),
        (r#"{ "camera_lerp": 1.5 }"#, "camera_lerp"),
        (r#"{ "particles": { "max_particles": 0 } }"#, "particles.max_particles"),
        (r#"{ "emotion": { "decay_per_second": -1.0 } }"#, "emotion.decay_per_second"),
        (r#"{ "first_level": "" }"#, "first_level"),
        (r#"{ "target_fps": 0 }"#, "target_fps"),
    ];

    for (raw, expected) in cases {
        match GameConfig::from_json(raw) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected {expected} to be rejected, got {other:?}"),
        }
    }
}

#[test]
fn test_load_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = GameConfig::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "target_fps": 30, "camera_lerp": null }"#).unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.camera_lerp, None);
    assert_eq!(config.frame_time(), Duration::from_secs(1) / 30);
}
