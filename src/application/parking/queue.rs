//! Per-category FIFO of vehicles that arrived to a full category.

use std::collections::{BTreeMap, VecDeque};

use crate::domain::{SlotCategory, WaitingVehicle};

#[derive(Default)]
pub struct WaitingQueues {
    queues: BTreeMap<SlotCategory, VecDeque<WaitingVehicle>>,
}

impl WaitingQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the back of `category`'s queue; returns the 1-based position.
    pub fn enqueue(&mut self, category: SlotCategory, vehicle: WaitingVehicle) -> usize {
        let queue = self.queues.entry(category).or_default();
        queue.push_back(vehicle);
        queue.len()
    }

    pub fn dequeue(&mut self, category: SlotCategory) -> Option<WaitingVehicle> {
        self.queues.get_mut(&category).and_then(VecDeque::pop_front)
    }

    pub fn contains(&self, plate: &str) -> bool {
        self.queues
            .values()
            .any(|q| q.iter().any(|v| v.plate == plate))
    }

    pub fn len(&self, category: SlotCategory) -> usize {
        self.queues.get(&category).map_or(0, VecDeque::len)
    }

    /// Lengths of the non-empty queues, in category order.
    pub fn lengths(&self) -> Vec<(SlotCategory, usize)> {
        self.queues
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(category, q)| (*category, q.len()))
            .collect()
    }
}
