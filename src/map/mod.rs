//! Level geometry: the tile grid, spawn points and level bounds.

use glam::{IVec2, Vec2};
use serde::Deserialize;
use smallvec::SmallVec;
use strum_macros::IntoStaticStr;
use tracing::debug;

use crate::background::Weather;
use crate::error::LevelLoadError;
use crate::helpers::Rect;

pub mod parser;

use parser::LevelParser;

/// A single cell of level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoStaticStr)]
pub enum Tile {
    #[default]
    Empty,
    /// Blocks movement on both axes.
    Solid,
    /// Hurts the player on contact; does not block.
    Hazard,
    /// Finishes the level when the player touches it.
    Exit,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid)
    }
}

/// What a spawn point creates when the level is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
pub enum SpawnKind {
    Player,
    Slime,
    Heart,
    Coin,
    Companion,
}

/// A spawn location, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub tile: IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
}

/// A row-major grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Builds a grid from row-major tiles; missing tiles are empty and extra ones are dropped.
    pub fn from_tiles(width: usize, height: usize, mut tiles: Vec<Tile>) -> Self {
        tiles.resize(width * height, Tile::Empty);
        Self { width, height, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.tiles.get(y as usize * self.width + x as usize).copied()
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(index, tile)| {
            let x = (index % self.width) as i32;
            let y = (index / self.width) as i32;
            (IVec2::new(x, y), *tile)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SpawnData {
    kind: SpawnKind,
    x: i64,
    y: i64,
}

/// The on-disk level format.
#[derive(Debug, Deserialize)]
struct LevelData {
    name: String,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    weather: Option<Weather>,
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    width: usize,
    height: usize,
    rows: Vec<String>,
    #[serde(default)]
    spawns: Vec<SpawnData>,
    #[serde(default)]
    next: Option<String>,
}

fn default_tile_size() -> u32 {
    crate::constants::TILE_SIZE
}

/// A validated, playable level.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub theme: Theme,
    pub weather: Weather,
    /// Name of the level the exit leads to; `None` means the exit wins the game.
    pub next: Option<String>,
    tile_size: f32,
    grid: TileGrid,
    player_spawn: IVec2,
    spawns: Vec<SpawnPoint>,
}

impl Level {
    /// Parses and validates a JSON level.
    pub fn from_json(raw: &str) -> Result<Self, LevelLoadError> {
        let data: LevelData = serde_json::from_str(raw)?;
        Self::from_data(data)
    }

    fn from_data(data: LevelData) -> Result<Self, LevelLoadError> {
        if data.tile_size == 0 {
            return Err(LevelLoadError::InvalidTileSize(data.tile_size));
        }

        let parsed = LevelParser::parse_rows(&data.rows, data.width, data.height)?;
        let mut spawns = parsed.spawns;

        for spawn in &data.spawns {
            if spawn.x < 0 || spawn.y < 0 || spawn.x >= data.width as i64 || spawn.y >= data.height as i64 {
                return Err(LevelLoadError::SpawnOutOfBounds { x: spawn.x, y: spawn.y });
            }
            spawns.push(SpawnPoint {
                kind: spawn.kind,
                tile: IVec2::new(spawn.x as i32, spawn.y as i32),
            });
        }

        let players: SmallVec<[IVec2; 2]> = spawns
            .iter()
            .filter(|spawn| spawn.kind == SpawnKind::Player)
            .map(|spawn| spawn.tile)
            .collect();
        let player_spawn = match players.as_slice() {
            [] => return Err(LevelLoadError::MissingPlayerSpawn),
            [single] => *single,
            many => return Err(LevelLoadError::DuplicatePlayerSpawn(many.len())),
        };
        spawns.retain(|spawn| spawn.kind != SpawnKind::Player);

        let weather = data.weather.unwrap_or(match data.theme {
            Theme::Day => Weather::Clear,
            Theme::Night => Weather::Fireflies,
        });

        debug!(
            name = %data.name,
            width = data.width,
            height = data.height,
            spawns = spawns.len(),
            "Parsed level"
        );

        Ok(Self {
            name: data.name,
            theme: data.theme,
            weather,
            next: data.next,
            tile_size: data.tile_size as f32,
            grid: parsed.grid,
            player_spawn,
            spawns,
        })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Level size in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.grid.width() as f32 * self.tile_size,
            self.grid.height() as f32 * self.tile_size,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_position_size(Vec2::ZERO, self.size())
    }

    /// The player's spawn tile. Every valid level has exactly one.
    pub fn player_spawn(&self) -> IVec2 {
        self.player_spawn
    }

    /// Every non-player spawn point.
    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    pub fn spawns_of(&self, kind: SpawnKind) -> impl Iterator<Item = &SpawnPoint> + '_ {
        self.spawns.iter().filter(move |spawn| spawn.kind == kind)
    }

    pub fn tile_rect(&self, tile: IVec2) -> Rect {
        Rect::new(
            tile.x as f32 * self.tile_size,
            tile.y as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Top-left position for a body of `size` standing on the bottom of `tile`, centered horizontally.
    pub fn spawn_position(&self, tile: IVec2, size: Vec2) -> Vec2 {
        let rect = self.tile_rect(tile);
        Vec2::new(rect.left() + (self.tile_size - size.x) / 2.0, rect.bottom() - size.y)
    }

    /// Tiles of the grid that strictly overlap `rect`, skipping empty ones.
    pub fn tiles_overlapping(&self, rect: &Rect) -> SmallVec<[(Tile, Rect); 8]> {
        let mut found = SmallVec::new();
        if self.grid.width() == 0 || self.grid.height() == 0 {
            return found;
        }

        let max_x = self.grid.width() as i32 - 1;
        let max_y = self.grid.height() as i32 - 1;
        let x0 = ((rect.left() / self.tile_size).floor() as i32).clamp(0, max_x);
        let x1 = ((rect.right() / self.tile_size).ceil() as i32 - 1).clamp(0, max_x);
        let y0 = ((rect.top() / self.tile_size).floor() as i32).clamp(0, max_y);
        let y1 = ((rect.bottom() / self.tile_size).ceil() as i32 - 1).clamp(0, max_y);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let Some(tile) = self.grid.get(x, y) else { continue };
                if tile == Tile::Empty {
                    continue;
                }
                let tile_rect = self.tile_rect(IVec2::new(x, y));
                if tile_rect.overlaps(rect) {
                    found.push((tile, tile_rect));
                }
            }
        }
        found
    }

    /// Whether `rect` overlaps any solid tile.
    pub fn overlaps_solid(&self, rect: &Rect) -> bool {
        self.tiles_overlapping(rect).iter().any(|(tile, _)| tile.is_solid())
    }
}
