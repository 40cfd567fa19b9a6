//! Command dispatcher: parses a line, runs it against the engine, and
//! encodes the reply.

use tracing::{debug, warn};

use super::parser::{Command, CommandParseError};
use super::response::{error_json, error_text, OutputFormat, Reply, TextStyle};
use crate::application::{ParkOutcome, ParkRequest, ParkingEngine};
use crate::domain::{DomainResult, RegisterUser};

pub struct CommandDispatcher {
    engine: ParkingEngine,
    format: OutputFormat,
}

impl CommandDispatcher {
    pub fn new(engine: ParkingEngine, format: OutputFormat) -> Self {
        Self { engine, format }
    }

    pub fn engine(&self) -> &ParkingEngine {
        &self.engine
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Handle one input line. Blank lines produce no response.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(CommandParseError::Empty) => return None,
            Err(e) => {
                warn!(error = %e, "Rejected command line");
                return Some(match self.format {
                    OutputFormat::Text => error_text(&e.to_string()),
                    OutputFormat::Json => error_json(None, "InvalidCommand", &e.to_string()),
                });
            }
        };

        let name = command.name();
        debug!(command = name, "Dispatching command");

        Some(match self.execute(command) {
            Ok(reply) => match self.format {
                OutputFormat::Text => reply.to_text(&TextStyle {
                    tariff: self.engine.tariff(),
                    offset: self.engine.local_offset(),
                }),
                OutputFormat::Json => reply.to_json(name),
            },
            Err(e) => {
                debug!(command = name, kind = e.kind(), error = %e, "Command failed");
                match self.format {
                    OutputFormat::Text => error_text(&e.to_string()),
                    OutputFormat::Json => error_json(Some(name), e.kind(), &e.to_string()),
                }
            }
        })
    }

    /// Run a parsed command.
    pub fn execute(&mut self, command: Command) -> DomainResult<Reply> {
        let engine = &mut self.engine;
        let reply = match command {
            Command::Park {
                plate,
                vehicle_type,
                driver_name,
                duration_hours,
                valet,
            } => Reply::Park(
                engine.park(
                    ParkRequest::new(plate, vehicle_type)
                        .driver(driver_name)
                        .hours(duration_hours)
                        .valet(valet),
                )?,
            ),
            Command::Remove { plate } => Reply::Removed(engine.remove(&plate)?),
            Command::Validate { plate } => Reply::Validated(engine.apply_validation(&plate)?),
            Command::Find { plate } => Reply::Found(engine.find_vehicle(&plate)?),
            Command::Register {
                plate,
                driver_name,
                class,
                billing_id,
            } => Reply::Registered(engine.register(RegisterUser::new(
                plate,
                driver_name,
                class,
                billing_id,
            ))?),
            Command::Reserve {
                plate,
                vehicle_type,
                driver_name,
            } => Reply::Park(ParkOutcome::Parked(engine.reserve_slot(
                &plate,
                vehicle_type,
                &driver_name,
            )?)),
            Command::Details { slot_id } => Reply::Details(engine.slot_detail(slot_id)?),
            Command::Status => Reply::Status(engine.status()),
            Command::Analytics => Reply::Analytics(engine.analytics()),
            Command::Users => Reply::Users(engine.user_list()),
        };
        Ok(reply)
    }
}
