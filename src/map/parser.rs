//! Parsing of ASCII tile rows into a tile grid and spawn points.

use glam::IVec2;

use crate::error::LevelLoadError;
use crate::map::{SpawnKind, SpawnPoint, Tile, TileGrid};

/// The parsed contents of a level's `rows`.
#[derive(Debug)]
pub struct ParsedRows {
    pub grid: TileGrid,
    /// Spawn markers found in the rows, in reading order (top to bottom, left to right).
    pub spawns: Vec<SpawnPoint>,
}

/// Parser for converting tile rows into structured level data.
pub struct LevelParser;

impl LevelParser {
    /// Parses a single character into the tile it occupies and the spawn it marks, if any.
    ///
    /// Spawn markers stand on empty tiles.
    pub fn parse_character(c: char) -> Option<(Tile, Option<SpawnKind>)> {
        let parsed = match c {
            '#' => (Tile::Solid, None),
            '.' | ' ' => (Tile::Empty, None),
            '^' => (Tile::Hazard, None),
            'E' => (Tile::Exit, None),
            'P' => (Tile::Empty, Some(SpawnKind::Player)),
            's' => (Tile::Empty, Some(SpawnKind::Slime)),
            'h' => (Tile::Empty, Some(SpawnKind::Heart)),
            'c' => (Tile::Empty, Some(SpawnKind::Coin)),
            'C' => (Tile::Empty, Some(SpawnKind::Companion)),
            _ => return None,
        };
        Some(parsed)
    }

    /// Parses `rows` into a `width` x `height` grid.
    ///
    /// # Errors
    ///
    /// Fails on zero bounds, a row count that differs from `height`, a row whose length differs from `width`,
    /// or an unknown character.
    pub fn parse_rows<S: AsRef<str>>(rows: &[S], width: usize, height: usize) -> Result<ParsedRows, LevelLoadError> {
        if width == 0 || height == 0 {
            return Err(LevelLoadError::MissingBounds { width, height });
        }
        if rows.len() != height {
            return Err(LevelLoadError::RowCount {
                declared: height,
                found: rows.len(),
            });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut spawns = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(LevelLoadError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in row.chars().enumerate() {
                let (tile, spawn) =
                    Self::parse_character(character).ok_or(LevelLoadError::UnknownTile { character, x, y })?;
                if let Some(kind) = spawn {
                    spawns.push(SpawnPoint {
                        kind,
                        tile: IVec2::new(x as i32, y as i32),
                    });
                }
                tiles.push(tile);
            }
        }

        Ok(ParsedRows {
            grid: TileGrid::from_tiles(width, height, tiles),
            spawns,
        })
    }
}
