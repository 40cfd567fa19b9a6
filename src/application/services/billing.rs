//! Billing service for entry pre-payments and departure charges

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::tariff::started_hours;
use crate::domain::{DomainError, DomainResult, Occupancy, Tariff, UserClass, UserProfile, VehicleType};

/// What a vehicle pays when it enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCharge {
    pub fee: i64,
    /// End of the pre-paid window; only guests have one.
    pub prepaid_until: Option<DateTime<Utc>>,
}

impl EntryCharge {
    fn free() -> Self {
        Self {
            fee: 0,
            prepaid_until: None,
        }
    }
}

/// Outcome of the departure fee rules.
///
/// `PrePaid` and `Validated` both mean nothing more is owed, but they are
/// reached under different conditions and kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DepartureCharge {
    /// Residents and staff.
    Exempt { class: UserClass },
    /// Hotel guests pay per started hour, billed to their room.
    HotelBill {
        amount: i64,
        hours: i64,
        billing_id: String,
    },
    /// Left inside the pre-paid window.
    PrePaid,
    /// Overstay fully covered by the validation hours.
    Validated,
    Overstay { penalty: i64, overstay_hours: i64 },
}

impl DepartureCharge {
    /// Amount collected at departure (zero when nothing is owed).
    pub fn amount(&self) -> i64 {
        match self {
            Self::HotelBill { amount, .. } => *amount,
            Self::Overstay { penalty, .. } => *penalty,
            Self::Exempt { .. } | Self::PrePaid | Self::Validated => 0,
        }
    }
}

/// Service for fee calculation
pub struct BillingService {
    tariff: Tariff,
}

impl BillingService {
    pub fn new(tariff: Tariff) -> Self {
        Self { tariff }
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Guests pre-pay `max(1, hours)` hours (plus valet); everyone else
    /// enters for free. Fails if the fee or the pre-paid exit time is not
    /// representable.
    pub fn entry_charge(
        &self,
        profile: &UserProfile,
        vehicle_type: VehicleType,
        duration_hours: i64,
        valet: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<EntryCharge> {
        if profile.class != UserClass::Guest {
            return Ok(EntryCharge::free());
        }

        let hours = duration_hours.max(1);
        let out_of_range = || DomainError::Validation("Duration out of range".to_string());
        let fee = self
            .tariff
            .time_fee(vehicle_type, hours, valet)
            .ok_or_else(out_of_range)?;
        let prepaid_until = Duration::try_hours(hours)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(out_of_range)?;
        Ok(EntryCharge {
            fee,
            prepaid_until: Some(prepaid_until),
        })
    }

    /// Apply the departure rules to the vehicle in a slot, before the slot
    /// is vacated.
    pub fn departure_charge(&self, occupancy: &Occupancy, now: DateTime<Utc>) -> DepartureCharge {
        let profile = &occupancy.profile;
        if profile.class.is_exempt() {
            return DepartureCharge::Exempt {
                class: profile.class,
            };
        }

        if profile.class == UserClass::Hotel {
            let elapsed = (now - occupancy.entered_at).num_seconds();
            let hours = started_hours(elapsed).max(1);
            return DepartureCharge::HotelBill {
                amount: self
                    .tariff
                    .time_fee(occupancy.vehicle_type, hours, occupancy.valet)
                    .unwrap_or(i64::MAX),
                hours,
                billing_id: profile.billing_id.clone(),
            };
        }

        self.guest_departure(occupancy, now)
    }

    fn guest_departure(&self, occupancy: &Occupancy, now: DateTime<Utc>) -> DepartureCharge {
        let Some(prepaid_until) = occupancy.prepaid_until else {
            return DepartureCharge::PrePaid;
        };

        if now <= prepaid_until && !occupancy.validated {
            return DepartureCharge::PrePaid;
        }

        let mut overstay_seconds = (now - prepaid_until).num_seconds();
        if occupancy.validated {
            overstay_seconds -= self.tariff.validation_seconds();
        }
        if overstay_seconds <= 0 {
            return if occupancy.validated {
                DepartureCharge::Validated
            } else {
                DepartureCharge::PrePaid
            };
        }

        let overstay_hours = started_hours(overstay_seconds);
        let mut penalty = self
            .tariff
            .overstay_penalty(occupancy.vehicle_type, overstay_hours);
        if occupancy.valet && !occupancy.validated {
            penalty += self.tariff.valet_fee;
        }

        DepartureCharge::Overstay {
            penalty,
            overstay_hours,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
