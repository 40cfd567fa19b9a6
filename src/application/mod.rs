//! Application layer: the allocation & billing engine and its services.

pub mod parking;
pub mod services;

// Re-export key types for convenience
pub use parking::{
    Allocation, AnalyticsReport, Departure, LotStatus, ParkOutcome, ParkRequest, ParkingEngine,
    SlotDetail, SlotStatus, ValidationApplied, VehicleLocation,
};
pub use services::{BillingService, DepartureCharge};
