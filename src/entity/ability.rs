//! Player abilities: each has an active window followed by a cooldown.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

use crate::constants::ability::*;

bitflags! {
    /// Capabilities unlocked through story progression.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Unlocks: u8 {
        const SWORD = 1 << 0;
        const DASH = 1 << 1;
        const HEARTS = 1 << 2;
        const BOW = 1 << 3;
    }
}

impl Default for Unlocks {
    fn default() -> Self {
        Unlocks::SWORD | Unlocks::DASH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum AbilityKind {
    Sword,
    Bow,
    Dash,
}

impl AbilityKind {
    /// The unlock this ability requires.
    pub fn required_unlock(self) -> Unlocks {
        match self {
            AbilityKind::Sword => Unlocks::SWORD,
            AbilityKind::Bow => Unlocks::BOW,
            AbilityKind::Dash => Unlocks::DASH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityPhase {
    Ready,
    Active { remaining: f32 },
    Cooldown { remaining: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub kind: AbilityKind,
    active_time: f32,
    cooldown_time: f32,
    phase: AbilityPhase,
}

impl Ability {
    pub fn new(kind: AbilityKind) -> Self {
        let (active_time, cooldown_time) = match kind {
            AbilityKind::Sword => (SWORD_ACTIVE, SWORD_COOLDOWN),
            AbilityKind::Bow => (BOW_ACTIVE, BOW_COOLDOWN),
            AbilityKind::Dash => (DASH_ACTIVE, DASH_COOLDOWN),
        };
        Self {
            kind,
            active_time,
            cooldown_time,
            phase: AbilityPhase::Ready,
        }
    }

    pub fn phase(&self) -> AbilityPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == AbilityPhase::Ready
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, AbilityPhase::Active { .. })
    }

    /// Starts the ability if it is ready. Returns whether it started.
    pub fn trigger(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.phase = AbilityPhase::Active {
            remaining: self.active_time,
        };
        true
    }

    /// Advances the active window and cooldown. Leftover time carries from one phase into the next.
    pub fn update(&mut self, dt: f32) {
        let mut dt = dt.max(0.0);
        loop {
            match self.phase {
                AbilityPhase::Ready => return,
                AbilityPhase::Active { remaining } => {
                    if remaining > dt {
                        self.phase = AbilityPhase::Active {
                            remaining: remaining - dt,
                        };
                        return;
                    }
                    dt -= remaining;
                    self.phase = AbilityPhase::Cooldown {
                        remaining: self.cooldown_time,
                    };
                }
                AbilityPhase::Cooldown { remaining } => {
                    self.phase = if remaining > dt {
                        AbilityPhase::Cooldown {
                            remaining: remaining - dt,
                        }
                    } else {
                        AbilityPhase::Ready
                    };
                    return;
                }
            }
        }
    }

    /// How far the ability is from being usable again, from `1.0` (just used) to `0.0` (ready).
    pub fn recharge_fraction(&self) -> f32 {
        let total = self.active_time + self.cooldown_time;
        if total <= 0.0 {
            return 0.0;
        }
        let left = match self.phase {
            AbilityPhase::Ready => 0.0,
            AbilityPhase::Active { remaining } => remaining + self.cooldown_time,
            AbilityPhase::Cooldown { remaining } => remaining,
        };
        (left / total).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.phase = AbilityPhase::Ready;
    }
}

/// The weapon the attack action uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoStaticStr)]
pub enum Weapon {
    #[default]
    Sword,
    Bow,
}

/// What a successful attack produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attack {
    Swing,
    Shot,
}

/// The abilities owned by the player.
#[derive(Debug, Clone)]
pub struct AbilitySet {
    pub sword: Ability,
    pub bow: Ability,
    pub dash: Ability,
    weapon: Weapon,
    /// Set once the current swing has hit an enemy; a swing hits at most one.
    swing_landed: bool,
}

impl Default for AbilitySet {
    fn default() -> Self {
        Self {
            sword: Ability::new(AbilityKind::Sword),
            bow: Ability::new(AbilityKind::Bow),
            dash: Ability::new(AbilityKind::Dash),
            weapon: Weapon::Sword,
            swing_landed: false,
        }
    }
}

impl AbilitySet {
    pub fn get(&self, kind: AbilityKind) -> &Ability {
        match kind {
            AbilityKind::Sword => &self.sword,
            AbilityKind::Bow => &self.bow,
            AbilityKind::Dash => &self.dash,
        }
    }

    pub fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// Toggles between sword and bow. The bow must be unlocked.
    pub fn switch_weapon(&mut self, unlocks: Unlocks) -> bool {
        match self.weapon {
            Weapon::Sword if unlocks.contains(Unlocks::BOW) => {
                self.weapon = Weapon::Bow;
                true
            }
            Weapon::Bow => {
                self.weapon = Weapon::Sword;
                true
            }
            Weapon::Sword => false,
        }
    }

    /// Falls back to the sword if the bow is selected but no longer unlocked.
    pub fn sanitize(&mut self, unlocks: Unlocks) {
        if self.weapon == Weapon::Bow && !unlocks.contains(Unlocks::BOW) {
            self.weapon = Weapon::Sword;
        }
    }

    /// Uses the selected weapon if it is unlocked and ready.
    pub fn attack(&mut self, unlocks: Unlocks) -> Option<Attack> {
        match self.weapon {
            Weapon::Sword if unlocks.contains(Unlocks::SWORD) && self.sword.trigger() => {
                self.swing_landed = false;
                Some(Attack::Swing)
            }
            Weapon::Bow if unlocks.contains(Unlocks::BOW) && self.bow.trigger() => Some(Attack::Shot),
            _ => None,
        }
    }

    pub fn dash(&mut self, unlocks: Unlocks) -> bool {
        unlocks.contains(Unlocks::DASH) && self.dash.trigger()
    }

    /// A swing that has not hit anything yet is in progress.
    pub fn swing_can_hit(&self) -> bool {
        self.sword.is_active() && !self.swing_landed
    }

    pub fn mark_swing_landed(&mut self) {
        self.swing_landed = true;
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_active()
    }

    pub fn update(&mut self, dt: f32) {
        self.sword.update(dt);
        self.bow.update(dt);
        self.dash.update(dt);
    }
}
