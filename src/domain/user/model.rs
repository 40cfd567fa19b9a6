//! User profile entity

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::slot::SlotCategory;
use crate::domain::vehicle::VehicleType;
use crate::domain::DomainError;

/// Billing identifier given to walk-in guests.
pub const GUEST_BILLING_ID: &str = "N/A";

/// Driver name used when an unregistered vehicle gives none.
pub const GUEST_DRIVER_NAME: &str = "Guest";

/// User class, which decides both the floor a vehicle is sent to and how it is billed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserClass {
    Guest,
    Resident,
    Hotel,
    Staff,
}

impl UserClass {
    /// Numeric code used on the command line (0 GUEST, 1 RESIDENT, 2 HOTEL, 3 STAFF).
    pub fn code(&self) -> u8 {
        match self {
            Self::Guest => 0,
            Self::Resident => 1,
            Self::Hotel => 2,
            Self::Staff => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::Guest),
            1 => Ok(Self::Resident),
            2 => Ok(Self::Hotel),
            3 => Ok(Self::Staff),
            other => Err(DomainError::Validation(format!(
                "Unknown user class code {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Resident => "RESIDENT",
            Self::Hotel => "HOTEL",
            Self::Staff => "STAFF",
        }
    }

    /// Slot category a vehicle of this class must park in.
    pub fn slot_category(&self, vehicle_type: VehicleType) -> SlotCategory {
        match self {
            Self::Resident => SlotCategory::CarResident,
            Self::Staff => match vehicle_type {
                VehicleType::Truck => SlotCategory::Truck,
                _ => SlotCategory::Staff,
            },
            Self::Hotel => SlotCategory::CarHotel,
            Self::Guest => match vehicle_type {
                VehicleType::Bike => SlotCategory::Bike,
                VehicleType::Truck => SlotCategory::Truck,
                VehicleType::Car => SlotCategory::CarGuest,
            },
        }
    }

    /// Residents and staff never pay.
    pub fn is_exempt(&self) -> bool {
        matches!(self, Self::Resident | Self::Staff)
    }
}

impl std::fmt::Display for UserClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile keyed by plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub plate: String,
    pub driver_name: String,
    pub class: UserClass,
    /// Apartment, room number, or "N/A" for guests.
    pub billing_id: String,
}

impl UserProfile {
    /// Transient profile for a plate nobody registered.
    pub fn guest(plate: impl Into<String>, driver_name: &str) -> Self {
        let driver_name = driver_name.trim();
        Self {
            plate: plate.into(),
            driver_name: if driver_name.is_empty() {
                GUEST_DRIVER_NAME.to_string()
            } else {
                driver_name.to_string()
            },
            class: UserClass::Guest,
            billing_id: GUEST_BILLING_ID.to_string(),
        }
    }
}

/// Registration request for the user directory.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "plate is required"))]
    pub plate: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub driver_name: String,
    pub class: UserClass,
    #[validate(length(min = 1, message = "billing id is required"))]
    pub billing_id: String,
}

impl RegisterUser {
    pub fn new(
        plate: impl AsRef<str>,
        driver_name: impl AsRef<str>,
        class: UserClass,
        billing_id: impl AsRef<str>,
    ) -> Self {
        Self {
            plate: plate.as_ref().trim().to_string(),
            driver_name: driver_name.as_ref().trim().to_string(),
            class,
            billing_id: billing_id.as_ref().trim().to_string(),
        }
    }

    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            plate: self.plate,
            driver_name: self.driver_name,
            class: self.class,
            billing_id: self.billing_id,
        }
    }
}
