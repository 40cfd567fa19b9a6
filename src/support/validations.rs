//! Input validation helpers shared by the engine's request types.

use validator::{Validate, ValidationErrors};

use super::errors::{DomainError, DomainResult};

/// Run `validator` rules and flatten any failures into a single
/// `DomainError::Validation` message (`field: message; field: message`).
pub fn validate_request<T: Validate>(request: &T) -> DomainResult<()> {
    request.validate().map_err(|errors| DomainError::Validation(flatten(&errors)))
}

fn flatten(errors: &ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{:?}", e.code));
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    field_errors.sort();

    if field_errors.is_empty() {
        "Validation failed".to_string()
    } else {
        field_errors.join("; ")
    }
}

/// Reject blank plates before they reach any lookup.
pub fn require_plate(plate: &str) -> DomainResult<&str> {
    let plate = plate.trim();
    if plate.is_empty() {
        return Err(DomainError::Validation(
            "Plate number cannot be empty".to_string(),
        ));
    }
    Ok(plate)
}
