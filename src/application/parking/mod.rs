//! Slot allocation: registry, pools, queues, directory, ledger, and the
//! engine that ties them together.

pub mod directory;
pub mod engine;
pub mod ledger;
pub mod queue;
pub mod registry;

pub use engine::{
    Allocation, Departure, LotStatus, ParkOutcome, ParkRequest, ParkingEngine, SlotDetail,
    SlotStatus, ValidationApplied, VehicleLocation,
};
pub use ledger::{AnalyticsReport, RevenueRecord};
