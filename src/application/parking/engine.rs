//! Allocation & billing engine
//!
//! Owns the slot registry, waiting queues, user directory and occupancy
//! ledger, and is the only thing that mutates them. Every public operation
//! runs to completion synchronously; promoting a waiting vehicle into a
//! freed slot happens inside the same `remove` call.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::directory::UserDirectory;
use super::ledger::{AnalyticsReport, OccupancyLedger};
use super::queue::WaitingQueues;
use super::registry::SlotRegistry;
use crate::application::services::billing::{BillingService, DepartureCharge, EntryCharge};
use crate::domain::{
    Clock, DomainError, DomainResult, Occupancy, RegisterUser, SlotCategory, SlotGroup, Tariff,
    UserProfile, VehicleType, WaitingVehicle,
};
use crate::support::validations::require_plate;

/// Duration pre-paid by a vehicle promoted from a waiting queue.
const PROMOTION_DURATION_HOURS: i64 = 1;

/// Longest duration a park request may ask for.
pub const MAX_DURATION_HOURS: i64 = i32::MAX as i64;

/// A request to park one vehicle.
#[derive(Debug, Clone)]
pub struct ParkRequest {
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub driver_name: String,
    /// Hours a guest pre-pays; anything below 1 counts as 1.
    pub duration_hours: i64,
    pub valet: bool,
}

impl ParkRequest {
    pub fn new(plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            plate: plate.into(),
            vehicle_type,
            driver_name: String::new(),
            duration_hours: 1,
            valet: false,
        }
    }

    pub fn driver(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    pub fn hours(mut self, hours: i64) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn valet(mut self, valet: bool) -> Self {
        self.valet = valet;
        self
    }
}

/// A vehicle placed in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub plate: String,
    pub slot_id: u32,
    pub floor: u32,
    pub category: SlotCategory,
    /// Pre-paid fee charged at entry (zero for non-guests).
    pub prepaid_fee: i64,
    pub prepaid_until: Option<DateTime<Utc>>,
}

/// Result of a successful park request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ParkOutcome {
    Parked(Allocation),
    /// The category was full; the vehicle waits at `position` (1-based).
    Queued {
        plate: String,
        category: SlotCategory,
        position: usize,
    },
}

/// Result of a successful remove request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    pub plate: String,
    pub slot_id: u32,
    pub floor: u32,
    pub category: SlotCategory,
    pub charge: DepartureCharge,
    /// Waiting vehicle moved into the freed slot, if any.
    pub promoted: Option<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationApplied {
    pub plate: String,
    pub slot_id: u32,
    pub free_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleLocation {
    pub slot_id: u32,
    pub floor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDetail {
    pub slot_id: u32,
    pub plate: String,
    pub driver_name: String,
    pub entered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot_id: u32,
    pub floor: u32,
    pub category: SlotCategory,
    pub occupied: bool,
    /// Always false; reservations are not implemented.
    pub reserved: bool,
    pub overstay: bool,
    pub plate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotStatus {
    pub slots: Vec<SlotStatus>,
    /// Non-empty waiting queues, in category order.
    pub queues: Vec<(SlotCategory, usize)>,
}

pub struct ParkingEngine {
    registry: SlotRegistry,
    queues: WaitingQueues,
    directory: UserDirectory,
    ledger: OccupancyLedger,
    billing: BillingService,
    clock: Box<dyn Clock>,
    local_offset: FixedOffset,
}

impl ParkingEngine {
    pub fn new(layout: &[SlotGroup], tariff: Tariff, clock: impl Clock + 'static) -> Self {
        let registry = SlotRegistry::initialize(layout);
        info!(total_slots = registry.total(), "Slot registry initialized");
        Self {
            registry,
            queues: WaitingQueues::new(),
            directory: UserDirectory::new(),
            ledger: OccupancyLedger::new(),
            billing: BillingService::new(tariff),
            clock: Box::new(clock),
            local_offset: Utc.fix(),
        }
    }

    /// Offset used to bucket entry times by hour of day and to display times.
    pub fn with_local_offset(mut self, offset: FixedOffset) -> Self {
        self.local_offset = offset;
        self
    }

    pub fn local_offset(&self) -> FixedOffset {
        self.local_offset
    }

    pub fn tariff(&self) -> &Tariff {
        self.billing.tariff()
    }

    pub fn total_slots(&self) -> u32 {
        self.registry.total()
    }

    pub fn free_slots(&self, category: SlotCategory) -> usize {
        self.registry.free_count(category)
    }

    pub fn queue_len(&self, category: SlotCategory) -> usize {
        self.queues.len(category)
    }

    pub fn slot_of(&self, plate: &str) -> Option<u32> {
        self.ledger.slot_of(plate)
    }

    // ── Users ──────────────────────────────────────────────────

    pub fn register(&mut self, request: RegisterUser) -> DomainResult<UserProfile> {
        self.directory.register(request)
    }

    /// Registered profiles ordered by plate.
    pub fn user_list(&self) -> Vec<UserProfile> {
        self.directory.list()
    }

    // ── Park / remove ──────────────────────────────────────────

    pub fn park(&mut self, request: ParkRequest) -> DomainResult<ParkOutcome> {
        let plate = require_plate(&request.plate)?.to_string();
        if request.duration_hours > MAX_DURATION_HOURS {
            warn!(
                plate = plate.as_str(),
                duration_hours = request.duration_hours,
                "Park rejected: duration out of range"
            );
            return Err(DomainError::Validation("Duration out of range".to_string()));
        }
        if self.ledger.slot_of(&plate).is_some() {
            warn!(plate = plate.as_str(), "Park rejected: vehicle already parked");
            return Err(DomainError::AlreadyParked(plate));
        }
        if self.queues.contains(&plate) {
            warn!(plate = plate.as_str(), "Park rejected: vehicle already queued");
            return Err(DomainError::AlreadyQueued(plate));
        }

        let profile = self.directory.resolve(&plate, &request.driver_name);
        let category = profile.class.slot_category(request.vehicle_type);
        let now = self.clock.now();
        let charge = self.billing.entry_charge(
            &profile,
            request.vehicle_type,
            request.duration_hours,
            request.valet,
            now,
        )?;

        match self.registry.take_nearest(category) {
            Some(slot_id) => self
                .occupy(slot_id, profile, request.vehicle_type, request.valet, charge, now)
                .map(ParkOutcome::Parked),
            None => {
                let position = self.queues.enqueue(
                    category,
                    WaitingVehicle {
                        plate: plate.clone(),
                        vehicle_type: request.vehicle_type,
                        driver_name: profile.driver_name,
                    },
                );
                metrics::counter!("parking_vehicles_queued_total", "category" => category.as_str())
                    .increment(1);
                info!(
                    plate = plate.as_str(),
                    %category,
                    position,
                    "Lot full, vehicle added to waiting queue"
                );
                Ok(ParkOutcome::Queued {
                    plate,
                    category,
                    position,
                })
            }
        }
    }

    pub fn remove(&mut self, plate: &str) -> DomainResult<Departure> {
        let plate = require_plate(plate)?;
        let slot_id = self
            .ledger
            .slot_of(plate)
            .ok_or_else(|| DomainError::vehicle_not_found(plate))?;
        let now = self.clock.now();

        let (floor, category, charge) = {
            let slot = self
                .registry
                .get(slot_id)
                .ok_or_else(|| DomainError::vehicle_not_found(plate))?;
            let occupancy = slot
                .occupancy()
                .ok_or_else(|| DomainError::vehicle_not_found(plate))?;
            (
                slot.floor(),
                slot.category(),
                self.billing.departure_charge(occupancy, now),
            )
        };

        let class = self
            .registry
            .vacate(slot_id)
            .map(|occ| occ.profile.class)
            .ok_or_else(|| DomainError::vehicle_not_found(plate))?;
        self.ledger.record_exit(plate, class);
        self.record_revenue(now, charge.amount());

        metrics::counter!("parking_vehicles_removed_total", "category" => category.as_str())
            .increment(1);
        info!(
            plate,
            slot_id,
            fee = charge.amount(),
            "Vehicle removed"
        );

        let promoted = self.promote_waiting(slot_id, category);
        if promoted.is_none() {
            self.registry.release(slot_id);
        }

        Ok(Departure {
            plate: plate.to_string(),
            slot_id,
            floor,
            category,
            charge,
            promoted,
        })
    }

    // ── Validation, lookup & reservations ──────────────────────

    /// Mark a parked vehicle as validated; re-applying is harmless.
    pub fn apply_validation(&mut self, plate: &str) -> DomainResult<ValidationApplied> {
        let plate = require_plate(plate)?;
        let slot_id = self
            .ledger
            .slot_of(plate)
            .ok_or_else(|| DomainError::vehicle_not_found(plate))?;
        if !self.registry.validate(slot_id) {
            return Err(DomainError::vehicle_not_found(plate));
        }

        let free_hours = self.tariff().validation_hours;
        info!(plate, slot_id, free_hours, "Validation applied");
        Ok(ValidationApplied {
            plate: plate.to_string(),
            slot_id,
            free_hours,
        })
    }

    /// Reservations are not supported.
    pub fn reserve_slot(
        &mut self,
        plate: &str,
        _vehicle_type: VehicleType,
        _driver_name: &str,
    ) -> DomainResult<Allocation> {
        warn!(plate, "Reservation requested but not implemented");
        Err(DomainError::NotImplemented("Reservation system"))
    }

    pub fn find_vehicle(&self, plate: &str) -> DomainResult<VehicleLocation> {
        let plate = require_plate(plate)?;
        self.ledger
            .slot_of(plate)
            .and_then(|id| self.registry.get(id))
            .map(|slot| VehicleLocation {
                slot_id: slot.id(),
                floor: slot.floor(),
            })
            .ok_or_else(|| DomainError::vehicle_not_found(plate))
    }

    pub fn slot_detail(&self, slot_id: i64) -> DomainResult<SlotDetail> {
        let total = self.registry.total();
        let slot = u32::try_from(slot_id)
            .ok()
            .and_then(|id| self.registry.get(id))
            .ok_or(DomainError::OutOfRange { slot_id, total })?;
        let occupancy = slot.occupancy().ok_or(DomainError::EmptySlot(slot.id()))?;

        Ok(SlotDetail {
            slot_id: slot.id(),
            plate: occupancy.plate().to_string(),
            driver_name: occupancy.driver_name().to_string(),
            entered_at: occupancy.entered_at,
        })
    }

    // ── Read side ──────────────────────────────────────────────

    pub fn status(&self) -> LotStatus {
        let now = self.clock.now();
        let slots = self
            .registry
            .slots()
            .map(|slot| SlotStatus {
                slot_id: slot.id(),
                floor: slot.floor(),
                category: slot.category(),
                occupied: slot.is_occupied(),
                reserved: false,
                overstay: slot.is_overstaying(now),
                plate: slot.occupancy().map(|o| o.plate().to_string()),
            })
            .collect();

        LotStatus {
            slots,
            queues: self.queues.lengths(),
        }
    }

    pub fn analytics(&self) -> AnalyticsReport {
        self.ledger.analytics(self.local_offset)
    }

    /// Hand the just-freed slot to the head of its category queue.
    ///
    /// The waiting vehicle's profile is resolved again; if it no longer maps
    /// to this category (the plate was registered while waiting) it is
    /// parked through the normal path instead and the next one is tried.
    fn promote_waiting(&mut self, slot_id: u32, category: SlotCategory) -> Option<Allocation> {
        while let Some(next) = self.queues.dequeue(category) {
            let profile = self.directory.resolve(&next.plate, &next.driver_name);
            if profile.class.slot_category(next.vehicle_type) != category {
                warn!(
                    plate = next.plate.as_str(),
                    %category,
                    "Waiting vehicle no longer fits this category, re-routing"
                );
                let request = ParkRequest::new(next.plate, next.vehicle_type)
                    .driver(next.driver_name)
                    .hours(PROMOTION_DURATION_HOURS);
                if let Err(e) = self.park(request) {
                    warn!("Re-routing waiting vehicle failed: {}", e);
                }
                continue;
            }

            let now = self.clock.now();
            let charge = match self.billing.entry_charge(
                &profile,
                next.vehicle_type,
                PROMOTION_DURATION_HOURS,
                false,
                now,
            ) {
                Ok(charge) => charge,
                Err(e) => {
                    warn!(plate = next.plate.as_str(), "Promotion charge failed: {}", e);
                    continue;
                }
            };
            match self.occupy(slot_id, profile, next.vehicle_type, false, charge, now) {
                Ok(allocation) => {
                    info!(
                        plate = allocation.plate.as_str(),
                        slot_id,
                        "Waiting vehicle promoted into freed slot"
                    );
                    return Some(allocation);
                }
                Err(e) => {
                    warn!("Promoting waiting vehicle failed: {}", e);
                    return None;
                }
            }
        }
        None
    }

    fn occupy(
        &mut self,
        slot_id: u32,
        profile: UserProfile,
        vehicle_type: VehicleType,
        valet: bool,
        charge: EntryCharge,
        now: DateTime<Utc>,
    ) -> DomainResult<Allocation> {
        let plate = profile.plate.clone();
        let class = profile.class;
        let (floor, category) = self
            .registry
            .occupy(
                slot_id,
                Occupancy {
                    profile,
                    vehicle_type,
                    entered_at: now,
                    valet,
                    prepaid_until: charge.prepaid_until,
                    prepaid_fee: charge.fee,
                    validated: false,
                },
            )
            .map(|slot| (slot.floor(), slot.category()))
            .ok_or_else(|| DomainError::NotFound {
                entity: "Free slot",
                field: "id",
                value: slot_id.to_string(),
            })?;

        self.ledger.record_entry(&plate, slot_id, class, now);
        self.record_revenue(now, charge.fee);

        metrics::counter!("parking_vehicles_parked_total", "category" => category.as_str())
            .increment(1);
        info!(
            plate = plate.as_str(),
            slot_id,
            floor,
            %category,
            prepaid_fee = charge.fee,
            "Vehicle parked"
        );

        Ok(Allocation {
            plate,
            slot_id,
            floor,
            category,
            prepaid_fee: charge.fee,
            prepaid_until: charge.prepaid_until,
        })
    }

    fn record_revenue(&mut self, at: DateTime<Utc>, amount: i64) {
        if amount > 0 {
            self.ledger.record_revenue(at, amount);
            metrics::counter!("parking_revenue_total").increment(amount.unsigned_abs());
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ManualClock, UserClass};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn engine_with(layout: Vec<SlotGroup>) -> (ParkingEngine, ManualClock) {
        let clock = ManualClock::new(t0());
        let engine = ParkingEngine::new(&layout, Tariff::default(), clock.clone());
        (engine, clock)
    }

    fn full_engine() -> (ParkingEngine, ManualClock) {
        engine_with(SlotGroup::default_layout())
    }

    fn parked(outcome: ParkOutcome) -> Allocation {
        match outcome {
            ParkOutcome::Parked(allocation) => allocation,
            other => panic!("Expected Parked, got {:?}", other),
        }
    }

    fn register(engine: &mut ParkingEngine, plate: &str, class: UserClass, billing: &str) {
        engine
            .register(RegisterUser::new(plate, "Driver", class, billing))
            .unwrap();
    }

    #[test]
    fn slot_category_matches_resolved_category() {
        let (mut engine, _) = full_engine();
        register(&mut engine, "RES1", UserClass::Resident, "Apt 1");
        register(&mut engine, "HOT1", UserClass::Hotel, "Room 1");
        register(&mut engine, "STF1", UserClass::Staff, "Ops");
        register(&mut engine, "STF2", UserClass::Staff, "Ops");

        let cases = [
            ("G-BIKE", VehicleType::Bike, SlotCategory::Bike, 1),
            ("G-CAR", VehicleType::Car, SlotCategory::CarGuest, 2),
            ("G-TRUCK", VehicleType::Truck, SlotCategory::Truck, 5),
            ("RES1", VehicleType::Truck, SlotCategory::CarResident, 4),
            ("HOT1", VehicleType::Bike, SlotCategory::CarHotel, 3),
            ("STF1", VehicleType::Car, SlotCategory::Staff, 6),
            ("STF2", VehicleType::Truck, SlotCategory::Truck, 5),
        ];
        for (plate, vehicle_type, category, floor) in cases {
            let allocation = parked(engine.park(ParkRequest::new(plate, vehicle_type)).unwrap());
            assert_eq!(allocation.category, category, "{}", plate);
            assert_eq!(allocation.floor, floor, "{}", plate);
            assert_eq!(engine.find_vehicle(plate).unwrap().slot_id, allocation.slot_id);
        }
    }

    #[test]
    fn nearest_slot_is_lowest_id() {
        let (mut engine, _) = full_engine();
        let a = parked(engine.park(ParkRequest::new("A", VehicleType::Car)).unwrap());
        let b = parked(engine.park(ParkRequest::new("B", VehicleType::Car)).unwrap());
        assert_eq!((a.slot_id, b.slot_id), (16, 17));

        engine.remove("A").unwrap();
        let c = parked(engine.park(ParkRequest::new("C", VehicleType::Car)).unwrap());
        assert_eq!(c.slot_id, 16);
    }

    #[test]
    fn park_then_remove_clears_ledger() {
        let (mut engine, _) = full_engine();
        let allocation = parked(engine.park(ParkRequest::new("KA01", VehicleType::Car)).unwrap());
        let departure = engine.remove("KA01").unwrap();

        assert_eq!(departure.slot_id, allocation.slot_id);
        assert_eq!(departure.charge, DepartureCharge::PrePaid);
        assert!(engine.slot_of("KA01").is_none());
        assert_eq!(
            engine.slot_detail(allocation.slot_id as i64),
            Err(DomainError::EmptySlot(allocation.slot_id))
        );
        assert!(matches!(engine.remove("KA01"), Err(DomainError::NotFound { .. })));
        // only the pre-payment was collected
        assert_eq!(engine.analytics().total_revenue, 5000);
    }

    #[test]
    fn parking_twice_fails() {
        let (mut engine, _) = full_engine();
        engine.park(ParkRequest::new("KA01", VehicleType::Car)).unwrap();
        let err = engine
            .park(ParkRequest::new("KA01", VehicleType::Bike))
            .unwrap_err();
        assert_eq!(err, DomainError::AlreadyParked("KA01".into()));
    }

    #[test]
    fn empty_plate_is_a_validation_error() {
        let (mut engine, _) = full_engine();
        for result in [
            engine.park(ParkRequest::new("  ", VehicleType::Car)).map(|_| ()),
            engine.remove("").map(|_| ()),
            engine.apply_validation("").map(|_| ()),
            engine.find_vehicle("").map(|_| ()),
        ] {
            assert_eq!(result.unwrap_err().kind(), "ValidationError");
        }
    }

    #[test]
    fn full_category_queues_and_promotes_on_vacancy() {
        let (mut engine, _) = engine_with(vec![
            SlotGroup::new(1, SlotCategory::Bike, 1),
            SlotGroup::new(2, SlotCategory::CarGuest, 1),
        ]);

        let b1 = parked(engine.park(ParkRequest::new("B1", VehicleType::Bike)).unwrap());
        assert_eq!(b1.category, SlotCategory::Bike);

        let queued = engine.park(ParkRequest::new("B2", VehicleType::Bike)).unwrap();
        assert_eq!(
            queued,
            ParkOutcome::Queued {
                plate: "B2".into(),
                category: SlotCategory::Bike,
                position: 1
            }
        );
        // the car pool is untouched
        assert_eq!(engine.free_slots(SlotCategory::CarGuest), 1);

        let departure = engine.remove("B1").unwrap();
        let promoted = departure.promoted.expect("B2 should be promoted");
        assert_eq!(promoted.plate, "B2");
        assert_eq!(promoted.slot_id, b1.slot_id);
        assert_eq!(engine.slot_of("B2"), Some(b1.slot_id));
        assert_eq!(engine.slot_of("B1"), None);
        assert_eq!(engine.free_slots(SlotCategory::Bike), 0);
        assert_eq!(engine.queue_len(SlotCategory::Bike), 0);
        assert_eq!(engine.slot_detail(b1.slot_id as i64).unwrap().plate, "B2");
    }

    #[test]
    fn promoted_guest_prepays_one_hour_without_valet() {
        let (mut engine, _) = engine_with(vec![SlotGroup::new(1, SlotCategory::CarGuest, 1)]);
        engine
            .park(ParkRequest::new("C1", VehicleType::Car).hours(3).valet(true))
            .unwrap();
        engine
            .park(ParkRequest::new("C2", VehicleType::Car).hours(5).valet(true))
            .unwrap();

        let promoted = engine.remove("C1").unwrap().promoted.unwrap();
        assert_eq!(promoted.prepaid_fee, 5000);
        // 3h + valet for C1, then 1h for C2
        assert_eq!(engine.analytics().total_revenue, 3 * 5000 + 10000 + 5000);
    }

    #[test]
    fn queued_plate_cannot_park_again() {
        let (mut engine, _) = engine_with(vec![SlotGroup::new(1, SlotCategory::Bike, 1)]);
        engine.park(ParkRequest::new("B1", VehicleType::Bike)).unwrap();
        engine.park(ParkRequest::new("B2", VehicleType::Bike)).unwrap();
        let err = engine.park(ParkRequest::new("B2", VehicleType::Car)).unwrap_err();
        assert_eq!(err, DomainError::AlreadyQueued("B2".into()));
    }

    #[test]
    fn waiting_vehicle_registered_meanwhile_is_rerouted() {
        let (mut engine, _) = engine_with(vec![
            SlotGroup::new(1, SlotCategory::CarGuest, 1),
            SlotGroup::new(2, SlotCategory::CarResident, 1),
        ]);
        engine.park(ParkRequest::new("G1", VehicleType::Car)).unwrap();
        engine.park(ParkRequest::new("LATE", VehicleType::Car)).unwrap();
        engine.park(ParkRequest::new("G2", VehicleType::Car)).unwrap();
        register(&mut engine, "LATE", UserClass::Resident, "Apt 9");

        let departure = engine.remove("G1").unwrap();
        assert_eq!(departure.promoted.unwrap().plate, "G2");
        let late = engine.find_vehicle("LATE").unwrap();
        assert_eq!(late.floor, 2);
    }

    #[test]
    fn resident_and_staff_never_pay() {
        let (mut engine, clock) = full_engine();
        register(&mut engine, "RES1", UserClass::Resident, "Apt 5B");
        register(&mut engine, "STF1", UserClass::Staff, "Building Staff");
        engine.park(ParkRequest::new("RES1", VehicleType::Car).valet(true)).unwrap();
        engine.park(ParkRequest::new("STF1", VehicleType::Truck)).unwrap();

        clock.advance(Duration::days(10));
        for plate in ["RES1", "STF1"] {
            let departure = engine.remove(plate).unwrap();
            assert!(matches!(departure.charge, DepartureCharge::Exempt { .. }));
        }
        assert_eq!(engine.analytics().total_revenue, 0);
    }

    #[test]
    fn guest_overstay_penalty_after_three_hours() {
        let (mut engine, clock) = full_engine();
        engine.park(ParkRequest::new("G1", VehicleType::Car).hours(1)).unwrap();

        clock.advance(Duration::hours(3));
        let departure = engine.remove("G1").unwrap();
        assert_eq!(
            departure.charge,
            DepartureCharge::Overstay {
                penalty: 2 * 5000 * 3 / 2,
                overstay_hours: 2
            }
        );
        assert_eq!(engine.analytics().total_revenue, 5000 + 15000);
    }

    #[test]
    fn guest_removed_inside_window_pays_nothing_more() {
        let (mut engine, clock) = full_engine();
        engine.park(ParkRequest::new("G1", VehicleType::Bike).hours(4)).unwrap();
        clock.advance(Duration::hours(3));
        assert_eq!(engine.remove("G1").unwrap().charge, DepartureCharge::PrePaid);
    }

    #[test]
    fn validation_covers_short_overstay() {
        let (mut engine, clock) = full_engine();
        engine.park(ParkRequest::new("G1", VehicleType::Car).hours(1)).unwrap();
        let applied = engine.apply_validation("G1").unwrap();
        assert_eq!(applied.free_hours, 2);
        // idempotent
        engine.apply_validation("G1").unwrap();

        clock.advance(Duration::hours(3));
        assert_eq!(engine.remove("G1").unwrap().charge, DepartureCharge::Validated);
    }

    #[test]
    fn validation_reduces_long_overstay() {
        let (mut engine, clock) = full_engine();
        engine.park(ParkRequest::new("G1", VehicleType::Car).hours(1)).unwrap();
        engine.apply_validation("G1").unwrap();

        // 4h overstay - 2h validation = 2h
        clock.advance(Duration::hours(5));
        assert_eq!(engine.remove("G1").unwrap().charge.amount(), 15000);
    }

    #[test]
    fn hotel_is_billed_to_room_at_departure() {
        let (mut engine, clock) = full_engine();
        register(&mut engine, "HOT1", UserClass::Hotel, "Room 301");
        let allocation = parked(engine.park(ParkRequest::new("HOT1", VehicleType::Car)).unwrap());
        assert_eq!(allocation.prepaid_fee, 0);

        clock.advance(Duration::minutes(125));
        let departure = engine.remove("HOT1").unwrap();
        assert_eq!(
            departure.charge,
            DepartureCharge::HotelBill {
                amount: 15000,
                hours: 3,
                billing_id: "Room 301".into()
            }
        );
        assert_eq!(engine.analytics().total_revenue, 15000);
    }

    #[test]
    fn validation_leaves_hotel_bill_unchanged() {
        let (mut engine, clock) = full_engine();
        register(&mut engine, "HOT1", UserClass::Hotel, "Room 301");
        engine.park(ParkRequest::new("HOT1", VehicleType::Car)).unwrap();
        engine.apply_validation("HOT1").unwrap();

        clock.advance(Duration::minutes(125));
        assert_eq!(engine.remove("HOT1").unwrap().charge.amount(), 15000);
    }

    #[test]
    fn duration_limits() {
        let (mut engine, _) = full_engine();
        let allocation = parked(
            engine
                .park(ParkRequest::new("G1", VehicleType::Bike).hours(MAX_DURATION_HOURS))
                .unwrap(),
        );
        assert_eq!(allocation.prepaid_fee, MAX_DURATION_HOURS * 2000);
        assert_eq!(
            allocation.prepaid_until,
            Some(t0() + Duration::hours(MAX_DURATION_HOURS))
        );

        for hours in [MAX_DURATION_HOURS + 1, 3_000_000_000_000, i64::MAX] {
            let err = engine
                .park(ParkRequest::new("G2", VehicleType::Truck).hours(hours))
                .unwrap_err();
            assert_eq!(err, DomainError::Validation("Duration out of range".into()));
        }
        assert!(engine.slot_of("G2").is_none());
        assert_eq!(engine.analytics().total_revenue, MAX_DURATION_HOURS * 2000);
    }

    #[test]
    fn validation_and_lookup_of_unknown_plate_fail() {
        let (mut engine, _) = full_engine();
        assert!(matches!(engine.apply_validation("NOPE"), Err(DomainError::NotFound { .. })));
        assert!(matches!(engine.find_vehicle("NOPE"), Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn slot_detail_bounds() {
        let (mut engine, _) = full_engine();
        for id in [0, -1, 86, 10_000] {
            assert_eq!(
                engine.slot_detail(id),
                Err(DomainError::OutOfRange { slot_id: id, total: 85 })
            );
        }
        assert_eq!(engine.slot_detail(85), Err(DomainError::EmptySlot(85)));

        engine
            .park(ParkRequest::new("KA01", VehicleType::Bike).driver("Ravi"))
            .unwrap();
        let detail = engine.slot_detail(1).unwrap();
        assert_eq!(detail.plate, "KA01");
        assert_eq!(detail.driver_name, "Ravi");
        assert_eq!(detail.entered_at, t0());
    }

    #[test]
    fn reservations_are_not_implemented() {
        let (mut engine, _) = full_engine();
        let err = engine.reserve_slot("KA01", VehicleType::Car, "Ravi").unwrap_err();
        assert_eq!(err.kind(), "NotImplemented");
        assert!(engine.slot_of("KA01").is_none());
    }

    #[test]
    fn status_reports_overstay_and_queues() {
        let (mut engine, clock) = engine_with(vec![SlotGroup::new(1, SlotCategory::Bike, 2)]);
        engine.park(ParkRequest::new("B1", VehicleType::Bike)).unwrap();
        engine.park(ParkRequest::new("B2", VehicleType::Bike).hours(5)).unwrap();
        engine.park(ParkRequest::new("B3", VehicleType::Bike)).unwrap();

        clock.advance(Duration::hours(2));
        let status = engine.status();
        assert_eq!(status.slots.len(), 2);
        assert!(status.slots[0].overstay);
        assert!(!status.slots[1].overstay);
        assert!(status.slots.iter().all(|s| s.occupied && !s.reserved));
        assert_eq!(status.slots[1].plate.as_deref(), Some("B2"));
        assert_eq!(status.queues, vec![(SlotCategory::Bike, 1)]);
    }

    #[test]
    fn analytics_tracks_occupancy_and_entries() {
        let (mut engine, clock) = full_engine();
        register(&mut engine, "RES1", UserClass::Resident, "Apt 1");
        engine.park(ParkRequest::new("RES1", VehicleType::Car)).unwrap();
        engine.park(ParkRequest::new("G1", VehicleType::Car)).unwrap();
        clock.advance(Duration::hours(2));
        engine.park(ParkRequest::new("G2", VehicleType::Bike)).unwrap();
        engine.remove("G1").unwrap();

        let report = engine.analytics();
        assert_eq!(report.hourly_entries.get(&9), Some(&2));
        assert_eq!(report.hourly_entries.get(&11), Some(&1));
        assert_eq!(report.occupancy_by_class.get(&UserClass::Resident), Some(&1));
        assert_eq!(report.occupancy_by_class.get(&UserClass::Guest), Some(&1));
        // G1 pre-pay + G1 overstay (1h * 75.00) + G2 pre-pay
        assert_eq!(report.total_revenue, 5000 + 7500 + 2000);
    }

    #[test]
    fn unregistered_guest_without_name_is_called_guest() {
        let (mut engine, _) = full_engine();
        engine.park(ParkRequest::new("KA01", VehicleType::Car)).unwrap();
        assert_eq!(engine.slot_detail(16).unwrap().driver_name, "Guest");
        assert!(engine.user_list().is_empty());
    }
}
