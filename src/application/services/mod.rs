//! Application services

pub mod billing;

pub use billing::{BillingService, DepartureCharge, EntryCharge};
