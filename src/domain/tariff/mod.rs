//! Tariff aggregate
//!
//! Holds the billing constants and the per-rule fee arithmetic.

pub mod model;

pub use model::{format_minor_units, started_hours, Tariff, SECONDS_PER_HOUR};
