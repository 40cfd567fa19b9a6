//! Slot entity and floor layout

pub mod model;

pub use model::{Occupancy, Slot, SlotCategory, SlotGroup};
