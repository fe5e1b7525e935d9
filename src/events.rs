use std::collections::VecDeque;

use strum_macros::{EnumIter, IntoStaticStr};

use crate::entity::EntityId;

/// Abstract player intents; platforms translate raw keys into these through [`crate::input::Bindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Up,
    Down,
    Jump,
    Attack,
    Dash,
    SwitchWeapon,
    UseItem,
    NextSlot,
    PrevSlot,
    Pause,
    Confirm,
    Cancel,
}

/// An input event as seen by the game, independent of the windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
    /// Window closed or an OS-level quit request.
    Quit,
}

impl From<Action> for InputEvent {
    fn from(action: Action) -> Self {
        InputEvent::Pressed(action)
    }
}

/// Gameplay events raised by collision detection and combat.
///
/// Geometry tests only ever emit these; the rules they trigger run when the level drains its [`EventQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerTouchesEnemy { enemy: EntityId },
    PlayerCollectsItem { item: EntityId },
    SwordHitsEnemy { enemy: EntityId },
    ArrowHitsEnemy { arrow: EntityId, enemy: EntityId },
    EnemyAttacksPlayer { enemy: EntityId },
    PlayerTouchesHazard,
    PlayerReachesExit,
    EntityDied { id: EntityId },
}

/// FIFO queue of gameplay events, drained once per frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Removes the oldest event. Events pushed while draining are returned after everything queued before them.
    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

impl Extend<GameEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = GameEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
