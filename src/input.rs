use std::collections::HashMap;

use bitflags::bitflags;
use strum_macros::IntoStaticStr;

use crate::events::{Action, InputEvent};

/// Physical keys the game understands, independent of the windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    Space,
    F,
    G,
    E,
    Q,
    R,
    Tab,
    P,
    Escape,
    Return,
    Backspace,
    LeftShift,
    Comma,
    Period,
}

/// A raw key transition, before bindings are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

#[derive(Debug, Clone)]
pub struct Bindings {
    key_bindings: HashMap<Key, Action>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();

        // Movement
        key_bindings.insert(Key::Left, Action::MoveLeft);
        key_bindings.insert(Key::A, Action::MoveLeft);
        key_bindings.insert(Key::Right, Action::MoveRight);
        key_bindings.insert(Key::D, Action::MoveRight);
        key_bindings.insert(Key::Up, Action::Up);
        key_bindings.insert(Key::W, Action::Up);
        key_bindings.insert(Key::Down, Action::Down);
        key_bindings.insert(Key::S, Action::Down);
        key_bindings.insert(Key::Space, Action::Jump);

        // Combat and inventory
        key_bindings.insert(Key::F, Action::Attack);
        key_bindings.insert(Key::LeftShift, Action::Dash);
        key_bindings.insert(Key::E, Action::SwitchWeapon);
        key_bindings.insert(Key::G, Action::UseItem);
        key_bindings.insert(Key::Period, Action::NextSlot);
        key_bindings.insert(Key::Tab, Action::NextSlot);
        key_bindings.insert(Key::Comma, Action::PrevSlot);

        // Menus
        key_bindings.insert(Key::P, Action::Pause);
        key_bindings.insert(Key::Escape, Action::Cancel);
        key_bindings.insert(Key::Backspace, Action::Cancel);
        key_bindings.insert(Key::Return, Action::Confirm);
        key_bindings.insert(Key::R, Action::Confirm);

        Self { key_bindings }
    }
}

impl Bindings {
    pub fn get(&self, key: Key) -> Option<Action> {
        self.key_bindings.get(&key).copied()
    }

    /// Binds `key` to `action`, returning the action it was previously bound to.
    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.key_bindings.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Action> {
        self.key_bindings.remove(&key)
    }

    /// Translates a raw key transition; unbound keys produce nothing.
    pub fn translate(&self, event: KeyEvent) -> Option<InputEvent> {
        match event {
            KeyEvent::Down(key) => self.get(key).map(InputEvent::Pressed),
            KeyEvent::Up(key) => self.get(key).map(InputEvent::Released),
        }
    }
}

bitflags! {
    /// The set of actions currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActionFlags: u16 {
        const MOVE_LEFT = 1 << 0;
        const MOVE_RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const JUMP = 1 << 4;
        const ATTACK = 1 << 5;
        const DASH = 1 << 6;
        const SWITCH_WEAPON = 1 << 7;
        const USE_ITEM = 1 << 8;
        const NEXT_SLOT = 1 << 9;
        const PREV_SLOT = 1 << 10;
        const PAUSE = 1 << 11;
        const CONFIRM = 1 << 12;
        const CANCEL = 1 << 13;
    }
}

impl From<Action> for ActionFlags {
    fn from(action: Action) -> Self {
        match action {
            Action::MoveLeft => ActionFlags::MOVE_LEFT,
            Action::MoveRight => ActionFlags::MOVE_RIGHT,
            Action::Up => ActionFlags::UP,
            Action::Down => ActionFlags::DOWN,
            Action::Jump => ActionFlags::JUMP,
            Action::Attack => ActionFlags::ATTACK,
            Action::Dash => ActionFlags::DASH,
            Action::SwitchWeapon => ActionFlags::SWITCH_WEAPON,
            Action::UseItem => ActionFlags::USE_ITEM,
            Action::NextSlot => ActionFlags::NEXT_SLOT,
            Action::PrevSlot => ActionFlags::PREV_SLOT,
            Action::Pause => ActionFlags::PAUSE,
            Action::Confirm => ActionFlags::CONFIRM,
            Action::Cancel => ActionFlags::CANCEL,
        }
    }
}

/// Held-action state, fed by [`InputEvent`]s.
///
/// When both horizontal directions are held, the most recently pressed one wins; releasing it falls back to the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: ActionFlags,
    last_horizontal: Option<Action>,
}

impl InputState {
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Pressed(action) => {
                self.held.insert(action.into());
                if matches!(action, Action::MoveLeft | Action::MoveRight) {
                    self.last_horizontal = Some(action);
                }
            }
            InputEvent::Released(action) => {
                self.held.remove(action.into());
                if self.last_horizontal == Some(action) {
                    self.last_horizontal = None;
                }
            }
            InputEvent::Quit => {}
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(action.into())
    }

    /// Horizontal intent in `-1.0..=1.0`.
    pub fn horizontal(&self) -> f32 {
        let left = self.is_held(Action::MoveLeft);
        let right = self.is_held(Action::MoveRight);
        match (left, right) {
            (true, true) => match self.last_horizontal {
                Some(Action::MoveLeft) => -1.0,
                Some(Action::MoveRight) => 1.0,
                _ => 0.0,
            },
            (true, false) => -1.0,
            (false, true) => 1.0,
            (false, false) => 0.0,
        }
    }

    /// Forgets everything held, e.g. when a scene loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
