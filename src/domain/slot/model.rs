//! Parking slot entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserProfile;
use crate::domain::vehicle::VehicleType;
use crate::domain::DomainError;

/// Category a slot is permanently assigned to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotCategory {
    Bike,
    CarGuest,
    CarHotel,
    CarResident,
    Truck,
    Staff,
}

impl SlotCategory {
    pub const ALL: [SlotCategory; 6] = [
        Self::Bike,
        Self::CarGuest,
        Self::CarHotel,
        Self::CarResident,
        Self::Truck,
        Self::Staff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bike => "BIKE",
            Self::CarGuest => "CAR_GUEST",
            Self::CarHotel => "CAR_HOTEL",
            Self::CarResident => "CAR_RESIDENT",
            Self::Truck => "TRUCK",
            Self::Staff => "STAFF",
        }
    }
}

impl std::fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SlotCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::Validation(format!("Unknown slot category '{}'", s)))
    }
}

/// One contiguous group of slots in the layout: `slots` slots of `category` on `floor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub floor: u32,
    pub category: SlotCategory,
    pub slots: u32,
}

impl SlotGroup {
    pub fn new(floor: u32, category: SlotCategory, slots: u32) -> Self {
        Self {
            floor,
            category,
            slots,
        }
    }

    /// The six-floor building: bikes, restaurant guests, hotel, residents,
    /// trucks/deliveries, staff.
    pub fn default_layout() -> Vec<SlotGroup> {
        vec![
            Self::new(1, SlotCategory::Bike, 15),
            Self::new(2, SlotCategory::CarGuest, 20),
            Self::new(3, SlotCategory::CarHotel, 15),
            Self::new(4, SlotCategory::CarResident, 15),
            Self::new(5, SlotCategory::Truck, 10),
            Self::new(6, SlotCategory::Staff, 10),
        ]
    }
}

/// Everything known about the vehicle currently in a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    /// Profile as resolved when the vehicle entered.
    pub profile: UserProfile,
    pub vehicle_type: VehicleType,
    pub entered_at: DateTime<Utc>,
    pub valet: bool,
    /// End of the pre-paid window; guests only.
    pub prepaid_until: Option<DateTime<Utc>>,
    pub prepaid_fee: i64,
    /// Restaurant validation grants free hours at departure.
    pub validated: bool,
}

impl Occupancy {
    pub fn plate(&self) -> &str {
        &self.profile.plate
    }

    pub fn driver_name(&self) -> &str {
        &self.profile.driver_name
    }
}

/// A numbered slot. Floor and category are fixed at creation.
#[derive(Debug, Clone)]
pub struct Slot {
    id: u32,
    floor: u32,
    category: SlotCategory,
    occupancy: Option<Occupancy>,
}

impl Slot {
    pub fn new(id: u32, floor: u32, category: SlotCategory) -> Self {
        Self {
            id,
            floor,
            category,
            occupancy: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn category(&self) -> SlotCategory {
        self.category
    }

    pub fn occupancy(&self) -> Option<&Occupancy> {
        self.occupancy.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_some()
    }

    /// Place a vehicle. Returns `false` and leaves the slot untouched if it
    /// already has an occupant.
    pub fn occupy(&mut self, occupancy: Occupancy) -> bool {
        if self.occupancy.is_some() {
            return false;
        }
        self.occupancy = Some(occupancy);
        true
    }

    /// Clear the slot, returning whoever was in it.
    pub fn vacate(&mut self) -> Option<Occupancy> {
        self.occupancy.take()
    }

    /// Mark the occupant as validated. Returns `false` for an empty slot.
    pub fn validate(&mut self) -> bool {
        match self.occupancy.as_mut() {
            Some(occ) => {
                occ.validated = true;
                true
            }
            None => false,
        }
    }

    /// Occupied, past its pre-paid exit time, and not validated.
    pub fn is_overstaying(&self, now: DateTime<Utc>) -> bool {
        self.occupancy.as_ref().is_some_and(|occ| {
            !occ.validated && occ.prepaid_until.is_some_and(|until| now > until)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn guest_occupancy(now: DateTime<Utc>) -> Occupancy {
        Occupancy {
            profile: UserProfile::guest("KA01", "Ravi"),
            vehicle_type: VehicleType::Car,
            entered_at: now,
            valet: false,
            prepaid_until: Some(now + Duration::hours(1)),
            prepaid_fee: 5000,
            validated: false,
        }
    }

    #[test]
    fn occupy_and_vacate() {
        let now = Utc::now();
        let mut slot = Slot::new(16, 2, SlotCategory::CarGuest);
        assert!(!slot.is_occupied());

        assert!(slot.occupy(guest_occupancy(now)));
        assert_eq!(slot.occupancy().map(|o| o.plate()), Some("KA01"));
        assert!(!slot.occupy(guest_occupancy(now)));

        let previous = slot.vacate().unwrap();
        assert_eq!(previous.driver_name(), "Ravi");
        assert!(slot.occupancy().is_none());
        assert_eq!(slot.floor(), 2);
        assert_eq!(slot.category(), SlotCategory::CarGuest);
    }

    #[test]
    fn overstay_flag() {
        let now = Utc::now();
        let mut slot = Slot::new(1, 1, SlotCategory::CarGuest);
        slot.occupy(guest_occupancy(now));

        assert!(!slot.is_overstaying(now + Duration::minutes(59)));
        assert!(slot.is_overstaying(now + Duration::minutes(61)));

        slot.validate();
        assert!(!slot.is_overstaying(now + Duration::minutes(61)));
    }

    #[test]
    fn validate_empty_slot_is_noop() {
        let mut slot = Slot::new(1, 1, SlotCategory::Bike);
        assert!(!slot.validate());
    }

    #[test]
    fn category_parses_from_label() {
        assert_eq!("car_hotel".parse::<SlotCategory>().unwrap(), SlotCategory::CarHotel);
        assert!("garage".parse::<SlotCategory>().is_err());
    }

    #[test]
    fn default_layout_has_85_slots() {
        let total: u32 = SlotGroup::default_layout().iter().map(|g| g.slots).sum();
        assert_eq!(total, 85);
    }
}
