//! Slot registry and per-category free pools
//!
//! Slots are created once from the layout and never added or removed.
//! Each category keeps an ordered set of free ids so allocation always
//! hands out the lowest-numbered (nearest) free slot.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Occupancy, Slot, SlotCategory, SlotGroup};

pub struct SlotRegistry {
    slots: Vec<Slot>,
    pools: BTreeMap<SlotCategory, BTreeSet<u32>>,
}

impl SlotRegistry {
    /// Assign ids 1..=N in layout order and put every slot in its pool.
    pub fn initialize(layout: &[SlotGroup]) -> Self {
        let mut slots = Vec::new();
        let mut pools: BTreeMap<SlotCategory, BTreeSet<u32>> = BTreeMap::new();

        for group in layout {
            for _ in 0..group.slots {
                let id = slots.len() as u32 + 1;
                slots.push(Slot::new(id, group.floor, group.category));
                pools.entry(group.category).or_default().insert(id);
            }
        }

        Self { slots, pools }
    }

    pub fn total(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn get(&self, id: u32) -> Option<&Slot> {
        id.checked_sub(1).and_then(|idx| self.slots.get(idx as usize))
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Slot> {
        id.checked_sub(1).and_then(|idx| self.slots.get_mut(idx as usize))
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn free_count(&self, category: SlotCategory) -> usize {
        self.pools.get(&category).map_or(0, BTreeSet::len)
    }

    /// Pop the lowest free id of `category`.
    pub fn take_nearest(&mut self, category: SlotCategory) -> Option<u32> {
        self.pools.get_mut(&category).and_then(BTreeSet::pop_first)
    }

    /// Return a vacated slot to its category pool.
    pub fn release(&mut self, id: u32) {
        if let Some(category) = self.get(id).map(Slot::category) {
            self.pools.entry(category).or_default().insert(id);
        }
    }

    /// Place `occupancy` into slot `id`; the caller must have taken the id
    /// from the pool (or just vacated it). Returns `None` if the slot does
    /// not exist or is occupied.
    pub fn occupy(&mut self, id: u32, occupancy: Occupancy) -> Option<&Slot> {
        let slot = self.get_mut(id)?;
        if slot.occupy(occupancy) {
            Some(slot)
        } else {
            None
        }
    }

    /// Clear slot `id` without returning it to the pool.
    pub fn vacate(&mut self, id: u32) -> Option<Occupancy> {
        self.get_mut(id).and_then(Slot::vacate)
    }

    pub fn validate(&mut self, id: u32) -> bool {
        self.get_mut(id).is_some_and(Slot::validate)
    }
}
