//! Centralized error types for the game.
//!
//! This module defines all error types used throughout the application,
//! providing a consistent error handling approach.

use std::io;
use std::path::PathBuf;

use crate::entity::EntityId;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// Any error that reaches the game loop as a `GameError` stops the loop.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Level load error: {0}")]
    LevelLoad(#[from] LevelLoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while turning level data into a playable level.
///
/// These are only ever produced while a level scene is entered, never per-frame.
#[derive(thiserror::Error, Debug)]
pub enum LevelLoadError {
    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    #[error("Unknown character in level: {character:?} at ({x}, {y})")]
    UnknownTile { character: char, x: usize, y: usize },

    #[error("Level has no bounds (width {width}, height {height})")]
    MissingBounds { width: usize, height: usize },

    #[error("Row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("Level declares {declared} rows but has {found}")]
    RowCount { declared: usize, found: usize },

    #[error("Level has no player spawn")]
    MissingPlayerSpawn,

    #[error("Level has {0} player spawns, expected exactly one")]
    DuplicatePlayerSpawn(usize),

    #[error("Spawn point ({x}, {y}) lies outside the level")]
    SpawnOutOfBounds { x: i64, y: i64 },

    #[error("Unknown spawn kind: {0}")]
    UnknownSpawnKind(String),

    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),

    #[error("Malformed level data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors in the runtime configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors while loading or saving progress.
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to encode progress: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors related to entity state.
#[derive(thiserror::Error, Debug)]
pub enum EntityError {
    #[error("Entity {0} has a non-finite position or velocity")]
    NonFinite(EntityId),

    #[error("Entity not found: {0}")]
    NotFound(EntityId),
}

/// Platform-specific errors.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("Platform initialization failed: {0}")]
    Init(String),

    #[error("Platform is not available in this build: {0}")]
    Unavailable(&'static str),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
