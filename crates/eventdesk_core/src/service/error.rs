//! Failure taxonomy shared by the catalog and registration services.
//!
//! # Invariants
//! - Named kinds carry a message that is safe to show to end users.
//! - `Unclassified` keeps its source for logs but never exposes it through
//!   [`ServiceError::safe_message`].

use crate::model::event::EventId;
use crate::repo::RepoError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Message used in place of any unclassified failure detail.
pub const UNCLASSIFIED_MESSAGE: &str = "An unexpected error occurred.";

/// Coarse failure category, for mapping onto transport outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    EventFull,
    DuplicateAttendee,
    Unclassified,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Event with ID {0} not found")]
    NotFound(EventId),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Event is fully booked.")]
    EventFull(EventId),
    #[error("Attendee already registered for this event.")]
    DuplicateAttendee(EventId),
    #[error("unclassified failure: {0}")]
    Unclassified(#[source] RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::EventFull(_) => ErrorKind::EventFull,
            Self::DuplicateAttendee(_) => ErrorKind::DuplicateAttendee,
            Self::Unclassified(_) => ErrorKind::Unclassified,
        }
    }

    /// Message suitable for the far side of the system boundary.
    pub fn safe_message(&self) -> String {
        match self {
            Self::Unclassified(_) => UNCLASSIFIED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Stable snake_case code for logs and error payloads.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::EventFull => "event_full",
            ErrorKind::DuplicateAttendee => "duplicate_attendee",
            ErrorKind::Unclassified => "unclassified",
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EventNotFound(id) => Self::NotFound(id),
            RepoError::CapacityReached(id) => Self::EventFull(id),
            RepoError::DuplicateEmail(id) => Self::DuplicateAttendee(id),
            RepoError::Validation(err) => Self::InvalidArgument(err.to_string()),
            other => Self::Unclassified(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValidationError;

    #[test]
    fn repository_races_map_to_named_kinds() {
        assert_eq!(
            ServiceError::from(RepoError::CapacityReached(4)).kind(),
            ErrorKind::EventFull
        );
        assert_eq!(
            ServiceError::from(RepoError::DuplicateEmail(4)).kind(),
            ErrorKind::DuplicateAttendee
        );
        assert_eq!(
            ServiceError::from(RepoError::EventNotFound(4)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ServiceError::from(RepoError::Validation(ValidationError::EndNotAfterStart)).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn unclassified_hides_internal_detail() {
        let err = ServiceError::from(RepoError::InvalidData(
            "timestamp `x` out of range in events.start_at_ms".to_string(),
        ));
        assert_eq!(err.kind(), ErrorKind::Unclassified);
        assert_eq!(err.safe_message(), UNCLASSIFIED_MESSAGE);
        assert!(err.to_string().contains("events.start_at_ms"));
    }

    #[test]
    fn named_kinds_keep_their_message() {
        assert_eq!(
            ServiceError::NotFound(12).safe_message(),
            "Event with ID 12 not found"
        );
        assert_eq!(ServiceError::EventFull(1).code(), "event_full");
    }
}
