#![allow(dead_code)]

use luna::config::GameConfig;
use luna::map::Level;
use luna::progress::Progress;
use luna::scene::SceneContext;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use tempfile::TempDir;

/// A small walled room with a floor. `P` is the player, on the floor at tile (2, 4).
pub const ROOM: &[&str] = &[
    "##########",
    "#........#",
    "#........#",
    "#........#",
    "#.P......#",
    "##########",
];

/// Builds level JSON from rows, with everything else defaulted.
pub fn level_json(rows: &[&str]) -> String {
    level_json_with(rows, json!({}))
}

/// Like [`level_json`], with `extra` fields merged over the defaults.
pub fn level_json_with(rows: &[&str], extra: serde_json::Value) -> String {
    let mut value = json!({
        "name": "test",
        "theme": "day",
        "tile_size": 32,
        "width": rows.first().map_or(0, |row| row.chars().count()),
        "height": rows.len(),
        "rows": rows,
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        for (key, field) in extra {
            base.insert(key.clone(), field.clone());
        }
    }
    value.to_string()
}

pub fn level(rows: &[&str]) -> Level {
    Level::from_json(&level_json(rows)).expect("test level should be valid")
}

/// A config that saves into a temporary directory and seeds the RNG.
pub fn test_config(dir: &TempDir) -> GameConfig {
    GameConfig {
        save_path: dir.path().join("progress.json"),
        seed: Some(7),
        camera_lerp: None,
        show_frame_timings: false,
        ..GameConfig::default()
    }
}

/// Owns what a [`SceneContext`] borrows.
pub struct Harness {
    pub dir: TempDir,
    pub config: GameConfig,
    pub progress: Progress,
    pub rng: SmallRng,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_progress(Progress::default())
    }

    pub fn with_progress(progress: Progress) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = test_config(&dir);
        Self {
            dir,
            config,
            progress,
            rng: SmallRng::seed_from_u64(7),
        }
    }

    pub fn ctx(&mut self) -> SceneContext<'_> {
        SceneContext {
            config: &self.config,
            progress: &mut self.progress,
            rng: &mut self.rng,
        }
    }
}
