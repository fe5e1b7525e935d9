//! Level data embedded into the binary at compile time.

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};
use tracing::debug;

use crate::error::LevelLoadError;
use crate::map::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum LevelAsset {
    Forest,
    Night,
}

impl LevelAsset {
    /// The name levels refer to each other by.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The raw JSON of the level.
    pub fn source(self) -> &'static str {
        match self {
            LevelAsset::Forest => include_str!("../assets/levels/forest.json"),
            LevelAsset::Night => include_str!("../assets/levels/night.json"),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LevelAsset::iter().find(|asset| asset.name() == name)
    }
}

/// Loads and validates an embedded level by name.
pub fn load_level(name: &str) -> Result<Level, LevelLoadError> {
    let asset = LevelAsset::from_name(name).ok_or_else(|| LevelLoadError::UnknownLevel(name.to_string()))?;
    debug!(level = name, "Loading embedded level");
    Level::from_json(asset.source())
}
