//! Tariff entity

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::vehicle::VehicleType;
use crate::domain::DomainError;

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Billing constants. All amounts are in the smallest currency unit
/// (e.g. paise), so 5000 is 50.00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariff {
    /// Display label appended to formatted amounts.
    pub currency: String,
    pub bike_rate: i64,
    pub car_rate: i64,
    pub truck_rate: i64,
    pub valet_fee: i64,
    /// Factor applied to the hourly rate for every overstay hour.
    pub overstay_penalty_multiplier: Decimal,
    /// Free hours granted by a restaurant validation.
    pub validation_hours: u32,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            bike_rate: 2000,
            car_rate: 5000,
            truck_rate: 10000,
            valet_fee: 10000,
            overstay_penalty_multiplier: Decimal::new(15, 1),
            validation_hours: 2,
        }
    }
}

impl Tariff {
    /// Check that rates are ordered bike < car < truck and nothing is negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bike_rate < 0 || self.valet_fee < 0 {
            return Err(DomainError::Validation(
                "tariff amounts must not be negative".to_string(),
            ));
        }
        if !(self.bike_rate < self.car_rate && self.car_rate < self.truck_rate) {
            return Err(DomainError::Validation(format!(
                "tariff rates must satisfy bike < car < truck (got {} / {} / {})",
                self.bike_rate, self.car_rate, self.truck_rate
            )));
        }
        if self.overstay_penalty_multiplier.is_sign_negative() {
            return Err(DomainError::Validation(
                "overstay penalty multiplier must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_rate(&self, vehicle_type: VehicleType) -> i64 {
        match vehicle_type {
            VehicleType::Bike => self.bike_rate,
            VehicleType::Car => self.car_rate,
            VehicleType::Truck => self.truck_rate,
        }
    }

    /// Hourly charge plus optional valet fee; at least one hour is always
    /// charged. `None` if the amount does not fit in an `i64`.
    pub fn time_fee(&self, vehicle_type: VehicleType, hours: i64, valet: bool) -> Option<i64> {
        let fee = hours.max(1).checked_mul(self.base_rate(vehicle_type))?;
        if valet {
            fee.checked_add(self.valet_fee)
        } else {
            Some(fee)
        }
    }

    /// Penalty for `hours` overstay hours, rounded half away from zero.
    pub fn overstay_penalty(&self, vehicle_type: VehicleType, hours: i64) -> i64 {
        let base = Decimal::from(hours.saturating_mul(self.base_rate(vehicle_type)));
        (base * self.overstay_penalty_multiplier)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    pub fn validation_seconds(&self) -> i64 {
        i64::from(self.validation_hours) * SECONDS_PER_HOUR
    }

    /// Format an amount as human-readable string, e.g. `"50.00 INR"`.
    pub fn format_amount(&self, amount: i64) -> String {
        format!("{} {}", format_minor_units(amount), self.currency)
    }
}

/// `12345` → `"123.45"`.
pub fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Number of started hours in `seconds` (`ceil(seconds / 3600)`).
pub fn started_hours(seconds: i64) -> i64 {
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR
}

// ── Tests ──────────────────────────────────────────────────────
