//! Line-command parsing
//!
//! One command per line, fields separated by commas:
//!
//! - `PARK,plate,type,name,duration,valet(1/0)`
//! - `REMOVE,plate` / `VALIDATE,plate` / `FIND,plate`
//! - `REGISTER,plate,name,class(0-3),billingId`
//! - `RESERVE,plate,type,name`
//! - `GET_DETAILS,slotId`
//! - `STATUS` / `GET_ANALYTICS` / `GET_USERS`

use std::fmt;

use crate::domain::{UserClass, VehicleType};

// ── Command ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Park {
        plate: String,
        vehicle_type: VehicleType,
        driver_name: String,
        duration_hours: i64,
        valet: bool,
    },
    Remove {
        plate: String,
    },
    Validate {
        plate: String,
    },
    Find {
        plate: String,
    },
    Register {
        plate: String,
        driver_name: String,
        class: UserClass,
        billing_id: String,
    },
    Reserve {
        plate: String,
        vehicle_type: VehicleType,
        driver_name: String,
    },
    Details {
        slot_id: i64,
    },
    Status,
    Analytics,
    Users,
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let args: Vec<&str> = line.split(',').collect();
        let name = args[0].trim();
        if name.is_empty() {
            return Err(CommandParseError::Empty);
        }

        let command = match (name, args.len()) {
            ("PARK", 6) => Self::Park {
                plate: args[1].to_string(),
                vehicle_type: VehicleType::from_label(args[2]),
                driver_name: args[3].to_string(),
                duration_hours: parse_int(args[4], "duration")?,
                valet: parse_int(args[5], "valet")? != 0,
            },
            ("REMOVE", 2) => Self::Remove {
                plate: args[1].to_string(),
            },
            ("VALIDATE", 2) => Self::Validate {
                plate: args[1].to_string(),
            },
            ("FIND", 2) => Self::Find {
                plate: args[1].to_string(),
            },
            ("REGISTER", 5) => Self::Register {
                plate: args[1].to_string(),
                driver_name: args[2].to_string(),
                class: UserClass::from_code(parse_int(args[3], "user class")?)
                    .map_err(|e| CommandParseError::InvalidArgument(e.to_string()))?,
                billing_id: args[4].to_string(),
            },
            ("RESERVE", 4) => Self::Reserve {
                plate: args[1].to_string(),
                vehicle_type: VehicleType::from_label(args[2]),
                driver_name: args[3].to_string(),
            },
            ("GET_DETAILS", 2) => Self::Details {
                slot_id: parse_int(args[1], "slot id")?,
            },
            ("STATUS", _) => Self::Status,
            ("GET_ANALYTICS", _) => Self::Analytics,
            ("GET_USERS", _) => Self::Users,
            _ => return Err(CommandParseError::InvalidSyntax(line.to_string())),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Park { .. } => "PARK",
            Self::Remove { .. } => "REMOVE",
            Self::Validate { .. } => "VALIDATE",
            Self::Find { .. } => "FIND",
            Self::Register { .. } => "REGISTER",
            Self::Reserve { .. } => "RESERVE",
            Self::Details { .. } => "GET_DETAILS",
            Self::Status => "STATUS",
            Self::Analytics => "GET_ANALYTICS",
            Self::Users => "GET_USERS",
        }
    }
}

fn parse_int(raw: &str, what: &'static str) -> Result<i64, CommandParseError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandParseError::InvalidNumber {
            field: what,
            value: raw.to_string(),
        })
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    InvalidSyntax(String),
    InvalidNumber { field: &'static str, value: String },
    InvalidArgument(String),
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty command"),
            Self::InvalidSyntax(line) => write!(f, "Invalid command syntax: {}", line),
            Self::InvalidNumber { field, value } => {
                write!(f, "Invalid {}: '{}' is not a number", field, value)
            }
            Self::InvalidArgument(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CommandParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_park() {
        let cmd = Command::parse("PARK,KA01,BIKE,Ravi,3,1").unwrap();
        assert_eq!(
            cmd,
            Command::Park {
                plate: "KA01".into(),
                vehicle_type: VehicleType::Bike,
                driver_name: "Ravi".into(),
                duration_hours: 3,
                valet: true,
            }
        );
    }

    #[test]
    fn parse_register() {
        let cmd = Command::parse("REGISTER,MH01,Asha,2,Room 301\r\n").unwrap();
        match cmd {
            Command::Register {
                class, billing_id, ..
            } => {
                assert_eq!(class, UserClass::Hotel);
                assert_eq!(billing_id, "Room 301");
            }
            _ => panic!("Expected Register"),
        }
    }

    #[test]
    fn parse_simple_queries() {
        assert_eq!(Command::parse("STATUS").unwrap(), Command::Status);
        assert_eq!(Command::parse("GET_ANALYTICS").unwrap(), Command::Analytics);
        assert_eq!(Command::parse("GET_USERS").unwrap(), Command::Users);
        assert_eq!(
            Command::parse("GET_DETAILS,-4").unwrap(),
            Command::Details { slot_id: -4 }
        );
    }

    #[test]
    fn wrong_arity_is_invalid_syntax() {
        assert!(matches!(
            Command::parse("PARK,KA01,CAR"),
            Err(CommandParseError::InvalidSyntax(_))
        ));
        assert!(matches!(
            Command::parse("FLY,KA01"),
            Err(CommandParseError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Command::parse("PARK,KA01,CAR,Ravi,two,0").unwrap_err();
        assert_eq!(err.to_string(), "Invalid duration: 'two' is not a number");
        assert!(matches!(
            Command::parse("REGISTER,MH01,Asha,9,Apt"),
            Err(CommandParseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(Command::parse("  "), Err(CommandParseError::Empty));
    }
}
