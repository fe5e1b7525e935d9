use luna::entity::IdAllocator;
use luna::events::{Action, EventQueue, GameEvent, InputEvent};
use luna::input::{Bindings, InputState, Key, KeyEvent};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

#[test]
fn test_default_bindings() {
    let bindings = Bindings::default();

    assert_eq!(bindings.get(Key::Left), Some(Action::MoveLeft));
    assert_eq!(bindings.get(Key::D), Some(Action::MoveRight));
    assert_eq!(bindings.get(Key::Space), Some(Action::Jump));
    assert_eq!(bindings.get(Key::F), Some(Action::Attack));
    assert_eq!(bindings.get(Key::P), Some(Action::Pause));
    assert_eq!(bindings.get(Key::Q), None);
}

#[test]
fn test_translate_and_rebind() {
    let mut bindings = Bindings::default();

    assert_eq!(bindings.translate(KeyEvent::Down(Key::G)), Some(InputEvent::Pressed(Action::UseItem)));
    assert_eq!(bindings.translate(KeyEvent::Up(Key::G)), Some(InputEvent::Released(Action::UseItem)));
    assert_eq!(bindings.translate(KeyEvent::Down(Key::Q)), None);

    assert_eq!(bindings.bind(Key::Q, Action::Dash), None);
    assert_eq!(bindings.translate(KeyEvent::Down(Key::Q)), Some(InputEvent::Pressed(Action::Dash)));
    assert_eq!(bindings.unbind(Key::Q), Some(Action::Dash));
}

#[test]
fn test_horizontal_prefers_latest_direction() {
    let mut input = InputState::default();
    assert_eq!(input.horizontal(), 0.0);

    input.apply(&InputEvent::Pressed(Action::MoveLeft));
    assert_eq!(input.horizontal(), -1.0);

    input.apply(&InputEvent::Pressed(Action::MoveRight));
    assert_eq!(input.horizontal(), 1.0);

    input.apply(&InputEvent::Released(Action::MoveRight));
    assert_eq!(input.horizontal(), -1.0);

    input.apply(&InputEvent::Released(Action::MoveLeft));
    assert_eq!(input.horizontal(), 0.0);
}

#[test]
fn test_held_state_and_clear() {
    let mut input = InputState::default();
    input.apply(&InputEvent::Pressed(Action::Jump));
    input.apply(&InputEvent::Quit);

    assert_that(&input.is_held(Action::Jump)).is_true();
    assert_that(&input.is_held(Action::Attack)).is_false();

    input.clear();
    assert_that(&input.is_held(Action::Jump)).is_false();
}

#[test]
fn test_event_queue_is_fifo() {
    let mut ids = IdAllocator::default();
    let (a, b) = (ids.allocate(), ids.allocate());
    let mut queue = EventQueue::default();

    queue.push(GameEvent::PlayerTouchesEnemy { enemy: b });
    queue.push(GameEvent::PlayerCollectsItem { item: a });
    assert_eq!(queue.pop(), Some(GameEvent::PlayerTouchesEnemy { enemy: b }));

    queue.push(GameEvent::EntityDied { id: a });
    assert_eq!(queue.pop(), Some(GameEvent::PlayerCollectsItem { item: a }));
    assert_eq!(queue.pop(), Some(GameEvent::EntityDied { id: a }));
    assert_eq!(queue.pop(), None);
    assert_that(&queue.is_empty()).is_true();
}
