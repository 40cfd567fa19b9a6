//! Parking domain: slots, users, vehicles, tariff, and the clock port.

pub mod ports;
pub mod slot;
pub mod tariff;
pub mod user;
pub mod vehicle;

// Re-export commonly used types
pub use ports::{Clock, ManualClock, SystemClock};
pub use slot::{Occupancy, Slot, SlotCategory, SlotGroup};
pub use tariff::Tariff;
pub use user::{RegisterUser, UserClass, UserProfile};
pub use vehicle::{VehicleType, WaitingVehicle};

pub use crate::support::errors::{DomainError, DomainResult};
