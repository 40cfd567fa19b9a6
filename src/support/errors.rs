use thiserror::Error;

/// Failures the parking core reports to its caller.
///
/// None of these are fatal; the engine keeps serving after any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Vehicle {0} is already parked")]
    AlreadyParked(String),

    #[error("Vehicle {0} is already waiting in a queue")]
    AlreadyQueued(String),

    #[error("Plate {0} is already registered")]
    DuplicatePlate(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Slot {slot_id} is out of range (1..={total})")]
    OutOfRange { slot_id: i64, total: u32 },

    #[error("Slot {0} is empty")]
    EmptySlot(u32),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl DomainError {
    /// Stable, machine-readable label for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::AlreadyParked(_) => "AlreadyParked",
            Self::AlreadyQueued(_) => "AlreadyQueued",
            Self::DuplicatePlate(_) => "DuplicatePlate",
            Self::NotFound { .. } => "NotFound",
            Self::OutOfRange { .. } => "OutOfRange",
            Self::EmptySlot(_) => "EmptySlot",
            Self::NotImplemented(_) => "NotImplemented",
        }
    }

    pub(crate) fn vehicle_not_found(plate: &str) -> Self {
        Self::NotFound {
            entity: "Vehicle",
            field: "plate",
            value: plate.to_string(),
        }
    }
}

/// Result type for parking operations
pub type DomainResult<T> = Result<T, DomainError>;
