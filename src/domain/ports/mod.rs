//! Outbound ports of the parking core

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
