//! Response encoding
//!
//! The text protocol answers `SUCCESS,<payload>` or `ERROR,<message>` (and
//! `STATUS,` / `ANALYTICS,` / `USERS,` for the read-side commands). The JSON
//! protocol writes one object per line.

use std::fmt::Write;

use chrono::FixedOffset;
use serde::Serialize;
use serde_json::json;

use crate::application::{
    AnalyticsReport, Departure, DepartureCharge, LotStatus, ParkOutcome, SlotDetail,
    ValidationApplied, VehicleLocation,
};
use crate::domain::tariff::format_minor_units;
use crate::domain::{Tariff, UserProfile};

/// Wire format of responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Successful result of one command.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Registered(UserProfile),
    Park(ParkOutcome),
    Removed(Departure),
    Validated(ValidationApplied),
    Found(VehicleLocation),
    Details(SlotDetail),
    Status(LotStatus),
    Analytics(AnalyticsReport),
    Users(Vec<UserProfile>),
}

/// Formatting context for the text protocol.
pub struct TextStyle<'a> {
    pub tariff: &'a Tariff,
    pub offset: FixedOffset,
}

impl Reply {
    pub fn to_text(&self, style: &TextStyle<'_>) -> String {
        match self {
            Self::Registered(profile) => {
                format!("SUCCESS,User {} registered.", profile.driver_name)
            }
            Self::Park(ParkOutcome::Parked(a)) if a.prepaid_fee > 0 => format!(
                "SUCCESS,Parked in slot {} (Floor {}). Pre-paid: {}",
                a.slot_id,
                a.floor,
                style.tariff.format_amount(a.prepaid_fee)
            ),
            Self::Park(ParkOutcome::Parked(a)) => format!(
                "SUCCESS,Welcome. Parked in slot {} (Floor {}).",
                a.slot_id, a.floor
            ),
            Self::Park(ParkOutcome::Queued {
                plate, category, ..
            }) => format!(
                "SUCCESS,Lot full for {}. Vehicle {} added to waiting queue.",
                category, plate
            ),
            Self::Removed(departure) => {
                let mut line = format!("SUCCESS,{}", charge_message(&departure.charge, style.tariff));
                if let Some(promoted) = &departure.promoted {
                    let _ = write!(
                        line,
                        " Vehicle {} moved from waiting queue to slot {}.",
                        promoted.plate, promoted.slot_id
                    );
                }
                line
            }
            Self::Validated(v) => format!(
                "SUCCESS,Validation applied to {}. {} hours free.",
                v.plate, v.free_hours
            ),
            Self::Found(location) => format!("SUCCESS,{},{}", location.slot_id, location.floor),
            Self::Details(detail) => format!(
                "SUCCESS,{},{},{}",
                detail.plate,
                detail.driver_name,
                detail
                    .entered_at
                    .with_timezone(&style.offset)
                    .format("%Y-%m-%d %I:%M:%S %p")
            ),
            Self::Status(status) => status_text(status),
            Self::Analytics(report) => analytics_text(report),
            Self::Users(users) => {
                let mut line = String::from("USERS,");
                for u in users {
                    let _ = write!(
                        line,
                        "{},{},{},{};",
                        u.driver_name,
                        u.plate,
                        u.billing_id,
                        u.class.code()
                    );
                }
                line
            }
        }
    }

    pub fn to_json(&self, command: &str) -> String {
        json!({
            "success": true,
            "command": command,
            "data": self,
        })
        .to_string()
    }
}

pub fn error_text(message: &str) -> String {
    format!("ERROR,{}", message)
}

pub fn error_json(command: Option<&str>, kind: &str, message: &str) -> String {
    json!({
        "success": false,
        "command": command,
        "error": { "kind": kind, "message": message },
    })
    .to_string()
}

fn charge_message(charge: &DepartureCharge, tariff: &Tariff) -> String {
    match charge {
        DepartureCharge::Exempt { .. } => "User is Resident/Staff. No charge.".to_string(),
        DepartureCharge::HotelBill {
            amount, billing_id, ..
        } => format!("Bill {} to {}.", tariff.format_amount(*amount), billing_id),
        DepartureCharge::PrePaid => "Pre-paid. No additional charge.".to_string(),
        DepartureCharge::Validated => "Validated. No additional charge.".to_string(),
        DepartureCharge::Overstay { penalty, .. } => format!(
            "OVERSTAY. Penalty fee due: {}",
            tariff.format_amount(*penalty)
        ),
    }
}

fn status_text(status: &LotStatus) -> String {
    let flag = |b: bool| if b { '1' } else { '0' };
    let mut line = String::from("STATUS,");
    for slot in &status.slots {
        let _ = write!(
            line,
            "{},{},{},{},{},{};",
            slot.slot_id,
            flag(slot.occupied),
            flag(slot.reserved),
            flag(slot.overstay),
            slot.plate.as_deref().unwrap_or("N/A"),
            slot.floor
        );
    }
    line.push('|');
    for (category, len) in &status.queues {
        let _ = write!(line, "{}:{};", category, len);
    }
    line
}

fn analytics_text(report: &AnalyticsReport) -> String {
    let mut line = String::from("ANALYTICS,");
    for (hour, count) in &report.hourly_entries {
        let _ = write!(line, "{},{};", hour, count);
    }
    line.push('|');
    for (class, count) in &report.occupancy_by_class {
        let _ = write!(line, "{},{};", class.code(), count);
    }
    line.push('|');
    line.push_str(&format_minor_units(report.total_revenue));
    line
}
