use serde::{Deserialize, Serialize};

use crate::constants::inventory::SLOTS;
use crate::entity::item::ItemKind;

/// A fixed number of single-item slots with one selected slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemKind>>,
    #[serde(default)]
    selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; SLOTS],
            selected: 0,
        }
    }
}

impl Inventory {
    /// Restores the slot count and selection after loading from disk.
    pub fn normalize(&mut self) {
        self.slots.resize(SLOTS, None);
        if self.selected >= SLOTS {
            self.selected = 0;
        }
    }

    pub fn slots(&self) -> &[Option<ItemKind>] {
        &self.slots
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Puts `item` into the first free slot. Returns `false` when full.
    pub fn add(&mut self, item: ItemKind) -> bool {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(item);
                true
            }
            None => false,
        }
    }

    /// Takes the item out of the selected slot.
    pub fn take_selected(&mut self) -> Option<ItemKind> {
        self.slots.get_mut(self.selected).and_then(Option::take)
    }

    pub fn select(&mut self, slot: usize) {
        if slot < self.slots.len() {
            self.selected = slot;
        }
    }

    pub fn select_next(&mut self) {
        if !self.slots.is_empty() {
            self.selected = (self.selected + 1) % self.slots.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.slots.is_empty() {
            self.selected = (self.selected + self.slots.len() - 1) % self.slots.len();
        }
    }

    pub fn count(&self, item: ItemKind) -> usize {
        self.slots.iter().filter(|slot| **slot == Some(item)).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}
