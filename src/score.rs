//! Points, kill combos and floating score popups.

use glam::Vec2;

use crate::constants::item::COIN_POINTS;
use crate::constants::score::*;

/// A number floating up from where points were earned.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePopup {
    /// World position the popup started at.
    pub origin: Vec2,
    pub points: u32,
    pub age: f32,
}

impl ScorePopup {
    /// Current world position: rises steadily from the origin.
    pub fn position(&self) -> Vec2 {
        self.origin - Vec2::new(0.0, self.age * POPUP_RISE)
    }

    /// Opacity in `0..=1`, fading out over the popup's lifetime.
    pub fn opacity(&self) -> f32 {
        (1.0 - self.age / POPUP_LIFETIME).clamp(0.0, 1.0)
    }
}

/// The summary shown when a run ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub score: u64,
    pub enemies_defeated: u32,
    pub coins: u32,
    pub max_combo: u32,
    pub survival_time: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Score {
    points: u64,
    enemies_defeated: u32,
    coins: u32,
    /// Kills in the current chain; a lone kill counts as 1.
    combo: u32,
    max_combo: u32,
    /// Seconds since the last kill, while a combo can still be extended.
    since_last_kill: Option<f32>,
    survival_time: f32,
    popups: Vec<ScorePopup>,
}

impl Score {
    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Whether the last kill extended a chain of kills.
    pub fn is_chained(&self) -> bool {
        self.combo > 1
    }

    /// Kill multiplier for the current combo, capped. A kill that starts a new chain scores at 1x.
    pub fn multiplier(&self) -> f32 {
        if self.is_chained() {
            (1.0 + COMBO_STEP * self.combo as f32).min(MAX_MULTIPLIER)
        } else {
            1.0
        }
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    /// Scores a kill at `position`. A kill within the combo window of the previous one extends the combo first.
    pub fn record_kill(&mut self, position: Vec2) -> u32 {
        self.combo = match self.since_last_kill {
            Some(elapsed) if elapsed <= COMBO_WINDOW => self.combo + 1,
            _ => 1,
        };
        self.max_combo = self.max_combo.max(self.combo);
        self.since_last_kill = Some(0.0);
        self.enemies_defeated += 1;

        let points = (KILL_POINTS as f32 * self.multiplier()).round() as u32;
        self.award(points, position);
        points
    }

    pub fn record_coin(&mut self, position: Vec2) -> u32 {
        self.coins += 1;
        self.award(COIN_POINTS, position);
        COIN_POINTS
    }

    fn award(&mut self, points: u32, origin: Vec2) {
        self.points += u64::from(points);
        self.popups.push(ScorePopup {
            origin,
            points,
            age: 0.0,
        });
    }

    /// Ages popups and the combo timer.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.survival_time += dt;

        if let Some(elapsed) = self.since_last_kill.as_mut() {
            *elapsed += dt;
            if *elapsed > COMBO_WINDOW {
                self.since_last_kill = None;
                self.combo = self.combo.min(1);
            }
        }

        for popup in &mut self.popups {
            popup.age += dt;
        }
        self.popups.retain(|popup| popup.age < POPUP_LIFETIME);
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            score: self.points,
            enemies_defeated: self.enemies_defeated,
            coins: self.coins,
            max_combo: self.max_combo,
            survival_time: self.survival_time,
        }
    }
}
