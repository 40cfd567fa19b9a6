//! Vehicle types and queued vehicles

use serde::{Deserialize, Serialize};

/// Kind of vehicle presented at the gate.
///
/// Anything that is not a bike or a truck is billed and placed as a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Bike,
    Car,
    Truck,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bike => "BIKE",
            Self::Car => "CAR",
            Self::Truck => "TRUCK",
        }
    }

    /// Lenient mapping from the label a driver or operator typed in.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "BIKE" => Self::Bike,
            "TRUCK" => Self::Truck,
            _ => Self::Car,
        }
    }
}

impl Default for VehicleType {
    fn default() -> Self {
        Self::Car
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle waiting for a slot of its category to free up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingVehicle {
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub driver_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(VehicleType::from_label("bike"), VehicleType::Bike);
        assert_eq!(VehicleType::from_label(" TRUCK "), VehicleType::Truck);
    }

    #[test]
    fn unknown_labels_fall_back_to_car() {
        assert_eq!(VehicleType::from_label("SUV"), VehicleType::Car);
        assert_eq!(VehicleType::from_label(""), VehicleType::Car);
    }
}
