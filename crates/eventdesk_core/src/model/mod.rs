//! Event and attendee domain model.
//!
//! # Responsibility
//! - Define the records persisted by the event store and their invariants.
//! - Render stored UTC instants into caller-facing views.
//!
//! # Invariants
//! - An `Event` owns its attendees; attendees are destroyed with the event.
//! - All instants are absolute (`DateTime<Utc>`); zones only matter at the edges.

use thiserror::Error;

pub mod attendee;
pub mod event;

/// Invariant violation detected before a record is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error("{field} must be at most {max_chars} characters")]
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    #[error("max capacity {value} is outside 1..={max}")]
    CapacityOutOfRange { value: u32, max: u32 },
    #[error("end time must be after start time")]
    EndNotAfterStart,
}

pub(crate) fn check_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::TooLong { field, max_chars });
    }
    Ok(())
}
