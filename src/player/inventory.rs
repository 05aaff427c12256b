//! Slot-based item container owned exclusively by a player.
//!
//! Item definitions live in the external catalog; slots here only carry the
//! catalog id and a quantity. The container is replaceable as a whole and
//! takes no part in the core's concurrency guarantees.

use serde::{Deserialize, Serialize};

/// Starting slot count for a fresh player.
const BASE_INVENTORY_SIZE: usize = 20;
/// Hard cap no expansion can exceed.
const MAX_INVENTORY_SIZE: usize = 60;

/// A quantity of one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// A single inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Empty,
    Stack(ItemStack),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Slot>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![Slot::Empty; BASE_INVENTORY_SIZE],
            capacity: BASE_INVENTORY_SIZE,
        }
    }
}

impl Inventory {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Put the stack into the first empty slot. Returns `false` when full.
    pub fn add(&mut self, stack: ItemStack) -> bool {
        for slot in &mut self.slots {
            if matches!(slot, Slot::Empty) {
                *slot = Slot::Stack(stack);
                return true;
            }
        }
        false
    }

    /// Take whatever occupies `index`, leaving the slot empty. Out-of-range
    /// indices yield `Slot::Empty`.
    pub fn remove(&mut self, index: usize) -> Slot {
        if index < self.slots.len() {
            std::mem::replace(&mut self.slots[index], Slot::Empty)
        } else {
            Slot::Empty
        }
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn used_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| !matches!(s, Slot::Empty))
            .count()
    }

    /// Grow the container, saturating at the hard cap.
    pub fn expand(&mut self, additional: usize) {
        let new_cap = (self.capacity + additional).min(MAX_INVENTORY_SIZE);
        self.slots.resize(new_cap, Slot::Empty);
        self.capacity = new_cap;
    }
}
