//! # Parking Service
//!
//! Slot allocation, waiting queues, and fee calculation for a multi-floor
//! parking building, driven by a line-oriented command protocol.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Slots, users, vehicles, tariff and the clock port
//! - **application**: The parking engine (registry, queues, ledger) and billing
//! - **interfaces**: Command parsing, dispatch and response encoding
//! - **server**: Runtime wiring, tracing and the command loop
//! - **support**: Errors, validation and shutdown helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use application::{ParkOutcome, ParkRequest, ParkingEngine};
pub use interfaces::command::{CommandDispatcher, OutputFormat};
pub use server::{ParkingServer, ServerError, ServerOptions};
