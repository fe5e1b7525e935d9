//! Progress that survives between runs: deaths, unlocks, story, inventory, best score and settings.
//!
//! Each death teaches Luna something: the first unlocks healing hearts, the second the bow.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::entity::ability::Unlocks;
use crate::entity::inventory::Inventory;
use crate::error::PersistError;

/// Deaths after which the story stops interrupting.
const STORY_DEATH_LIMIT: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume in `0..=1`.
    pub volume: f32,
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub deaths: u32,
    pub unlocks: Unlocks,
    pub story_part: u8,
    pub seen_intro: bool,
    pub inventory: Inventory,
    pub best_score: u64,
    pub settings: Settings,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            deaths: 0,
            unlocks: Unlocks::default(),
            story_part: 0,
            seen_intro: false,
            inventory: Inventory::default(),
            best_score: 0,
            settings: Settings::default(),
        }
    }
}

impl Progress {
    /// Loads progress from `path`. A missing file yields defaults; so does an unreadable or corrupt one, with a
    /// warning.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(progress)) => progress,
            Ok(None) => {
                debug!(path = %path.display(), "No saved progress, starting fresh");
                Self::default()
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "Ignoring unreadable progress file");
                Self::default()
            }
        }
    }

    /// Loads progress, distinguishing a missing file (`Ok(None)`) from a broken one.
    pub fn try_load(path: &Path) -> Result<Option<Self>, PersistError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut progress: Progress = serde_json::from_str(&raw)?;
        progress.inventory.normalize();
        progress.settings.volume = progress.settings.volume.clamp(0.0, 1.0);
        Ok(Some(progress))
    }

    /// Writes progress as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), deaths = self.deaths, "Saved progress");
        Ok(())
    }

    /// Counts a death and applies its lesson. Returns what was newly unlocked, if anything.
    pub fn record_death(&mut self) -> Option<Unlocks> {
        self.deaths += 1;

        let unlocked = match self.deaths {
            1 if !self.unlocks.contains(Unlocks::HEARTS) => {
                self.story_part = 1;
                Some(Unlocks::HEARTS)
            }
            2 if !self.unlocks.contains(Unlocks::BOW) => {
                self.story_part = 2;
                Some(Unlocks::BOW)
            }
            _ => None,
        };

        if let Some(unlock) = unlocked {
            self.unlocks |= unlock;
            info!(deaths = self.deaths, ?unlock, "Unlocked a new ability");
        }
        unlocked
    }

    /// Keeps the best score. Returns `true` on a new record.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Starts over, keeping settings.
    pub fn reset(&mut self) {
        let settings = self.settings.clone();
        *self = Self {
            settings,
            ..Self::default()
        };
    }

    /// Lines to show on the menu for the current story part. Empty once the player has died often enough.
    pub fn story_dialogue(&self) -> &'static [&'static str] {
        if self.deaths >= STORY_DEATH_LIMIT {
            return &[];
        }
        match self.story_part {
            0 if !self.seen_intro => INTRO,
            0 => &[],
            1 => HEARTS_LESSON,
            2 => BOW_LESSON,
            _ => &[],
        }
    }
}

const INTRO: &[&str] = &[
    "Luna wakes in a forest that does not want her there.",
    "She carries only a sword.",
    "Every fall will teach her something.",
    "Arrows move, Space jumps, F swings, Shift dashes.",
];

const HEARTS_LESSON: &[&str] = &[
    "Luna fell, and rose knowing more.",
    "Hearts she finds are now kept in her pack.",
    "Press G to use the selected heart, Tab to pick a slot.",
];

const BOW_LESSON: &[&str] = &[
    "Falling again has taught her patience.",
    "She now carries a bow.",
    "Press E to switch weapons, F to shoot.",
];
