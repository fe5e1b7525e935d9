//! Luna's Endless Lesson game library crate.

pub mod app;
pub mod asset;
pub mod background;
pub mod camera;
pub mod config;
pub mod constants;
pub mod emotion;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod helpers;
pub mod hud;
pub mod input;
pub mod logging;
pub mod map;
pub mod particles;
pub mod physics;
pub mod platform;
pub mod progress;
pub mod render;
pub mod scene;
pub mod score;
pub mod timing;
