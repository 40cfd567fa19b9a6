//! Vehicle value types

pub mod model;

pub use model::{VehicleType, WaitingVehicle};
