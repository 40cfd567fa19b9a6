//! Occupancy ledger
//!
//! Tracks which plate sits in which slot, live per-class counters, and the
//! append-only entry and revenue logs that analytics read from.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;

use crate::domain::UserClass;

/// One fee collected (pre-payment, hotel bill, or overstay penalty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevenueRecord {
    pub at: DateTime<Utc>,
    pub amount: i64,
}

/// Read-side aggregation over the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    /// Hour of day (0–23) → number of entries.
    pub hourly_entries: BTreeMap<u32, u32>,
    /// Live occupancy per user class; classes with no vehicle are omitted.
    pub occupancy_by_class: BTreeMap<UserClass, u32>,
    /// Sum of every revenue record, in the smallest currency unit.
    pub total_revenue: i64,
}

#[derive(Default)]
pub struct OccupancyLedger {
    plate_to_slot: HashMap<String, u32>,
    occupancy_by_class: BTreeMap<UserClass, u32>,
    entry_log: Vec<DateTime<Utc>>,
    revenue_log: Vec<RevenueRecord>,
}

impl OccupancyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot_of(&self, plate: &str) -> Option<u32> {
        self.plate_to_slot.get(plate).copied()
    }

    pub fn parked_count(&self) -> usize {
        self.plate_to_slot.len()
    }

    pub fn record_entry(&mut self, plate: &str, slot_id: u32, class: UserClass, at: DateTime<Utc>) {
        self.plate_to_slot.insert(plate.to_string(), slot_id);
        *self.occupancy_by_class.entry(class).or_default() += 1;
        self.entry_log.push(at);
    }

    /// Drop the plate mapping and decrement its class counter (never below zero).
    pub fn record_exit(&mut self, plate: &str, class: UserClass) -> Option<u32> {
        let slot_id = self.plate_to_slot.remove(plate)?;
        if let Some(count) = self.occupancy_by_class.get_mut(&class) {
            *count = count.saturating_sub(1);
        }
        Some(slot_id)
    }

    /// Append a revenue record; zero amounts are not recorded.
    pub fn record_revenue(&mut self, at: DateTime<Utc>, amount: i64) {
        if amount > 0 {
            self.revenue_log.push(RevenueRecord { at, amount });
        }
    }

    pub fn revenue_log(&self) -> &[RevenueRecord] {
        &self.revenue_log
    }

    pub fn total_revenue(&self) -> i64 {
        self.revenue_log.iter().map(|r| r.amount).sum()
    }

    /// Entries per hour of day, bucketed in the given local offset.
    pub fn hourly_entries(&self, offset: FixedOffset) -> BTreeMap<u32, u32> {
        let mut histogram = BTreeMap::new();
        for at in &self.entry_log {
            *histogram.entry(at.with_timezone(&offset).hour()).or_default() += 1;
        }
        histogram
    }

    pub fn occupancy_by_class(&self) -> BTreeMap<UserClass, u32> {
        self.occupancy_by_class
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(class, count)| (*class, *count))
            .collect()
    }

    pub fn analytics(&self, offset: FixedOffset) -> AnalyticsReport {
        AnalyticsReport {
            hourly_entries: self.hourly_entries(offset),
            occupancy_by_class: self.occupancy_by_class(),
            total_revenue: self.total_revenue(),
        }
    }
}
