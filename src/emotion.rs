//! Mood tracking for the player and the companion.
//!
//! A mood changes only through the transition table; its intensity then fades linearly and the mood falls back to
//! [`Mood::Neutral`] once it is spent. Moods are display-only and never feed back into the simulation.

use std::fmt;

use micromap::Map;
use strum::EnumCount;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumCount, IntoStaticStr)]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Sad,
    Scared,
    Determined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum Trigger {
    DamageTaken,
    ItemCollected,
    EnemyDefeated,
    Healed,
    LowHealth,
    PlayerDied,
    LevelCleared,
}

const TABLE_CAPACITY: usize = Mood::COUNT * Trigger::COUNT;

/// `(mood, trigger) -> mood`. Pairs that are not in the table leave the mood alone.
pub struct TransitionTable {
    transitions: Map<(Mood, Trigger), Mood, TABLE_CAPACITY>,
}

impl Clone for TransitionTable {
    fn clone(&self) -> Self {
        let mut table = Self::empty();
        for ((from, trigger), to) in self.transitions.iter() {
            table.insert(*from, *trigger, *to);
        }
        table
    }
}

impl fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable").field("len", &self.len()).finish()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        use Mood::*;
        use Trigger::*;

        let mut table = Self::empty();
        for mood in [Neutral, Happy, Sad, Scared, Determined] {
            table.insert(mood, PlayerDied, Sad);
            table.insert(mood, LevelCleared, Happy);
            table.insert(mood, LowHealth, Scared);
        }

        table.insert(Neutral, DamageTaken, Scared);
        table.insert(Happy, DamageTaken, Sad);
        table.insert(Sad, DamageTaken, Scared);
        table.insert(Determined, DamageTaken, Determined);

        table.insert(Neutral, ItemCollected, Happy);
        table.insert(Happy, ItemCollected, Happy);
        table.insert(Sad, ItemCollected, Happy);
        table.insert(Scared, ItemCollected, Determined);

        table.insert(Neutral, EnemyDefeated, Determined);
        table.insert(Happy, EnemyDefeated, Happy);
        table.insert(Scared, EnemyDefeated, Determined);
        table.insert(Sad, EnemyDefeated, Determined);
        table.insert(Determined, EnemyDefeated, Happy);

        table.insert(Scared, Healed, Determined);
        table.insert(Sad, Healed, Neutral);
        table.insert(Neutral, Healed, Happy);
        table
    }
}

impl TransitionTable {
    pub fn empty() -> Self {
        Self { transitions: Map::new() }
    }

    pub fn insert(&mut self, from: Mood, trigger: Trigger, to: Mood) {
        self.transitions.insert((from, trigger), to);
    }

    pub fn next(&self, from: Mood, trigger: Trigger) -> Option<Mood> {
        self.transitions.get(&(from, trigger)).copied()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mood and how strongly it is felt, in `0.0..=1.0`.
#[derive(Debug, Clone)]
pub struct Emotion {
    mood: Mood,
    intensity: f32,
    decay_per_second: f32,
    table: TransitionTable,
}

impl Emotion {
    pub fn new(decay_per_second: f32) -> Self {
        Self::with_table(decay_per_second, TransitionTable::default())
    }

    pub fn with_table(decay_per_second: f32, table: TransitionTable) -> Self {
        Self {
            mood: Mood::Neutral,
            intensity: 0.0,
            decay_per_second,
            table,
        }
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Applies a trigger. A mapped transition sets the new mood at full intensity; returns whether one happened.
    pub fn trigger(&mut self, trigger: Trigger) -> bool {
        match self.table.next(self.mood, trigger) {
            Some(next) => {
                trace!(from = ?self.mood, to = ?next, ?trigger, "Mood transition");
                self.mood = next;
                self.intensity = 1.0;
                true
            }
            None => false,
        }
    }

    /// Fades the intensity; at zero the mood resets to neutral.
    pub fn update(&mut self, dt: f32) {
        if !self.intensity.is_finite() {
            warn!(intensity = self.intensity, "Resetting emotion with invalid intensity");
            self.reset();
            return;
        }

        if self.mood == Mood::Neutral {
            self.intensity = 0.0;
            return;
        }

        self.intensity = (self.intensity - self.decay_per_second * dt.max(0.0)).max(0.0);
        if self.intensity <= 0.0 {
            self.mood = Mood::Neutral;
        }
    }

    pub fn reset(&mut self) {
        self.mood = Mood::Neutral;
        self.intensity = 0.0;
    }

    #[doc(hidden)]
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }
}
