//! Core domain logic for EventDesk: events, attendee registration and
//! capacity enforcement.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod service;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendee::{Attendee, AttendeeId, NewAttendee};
pub use model::event::{Event, EventId, EventRoster, EventView, NewEvent, MAX_CAPACITY_LIMIT};
pub use model::ValidationError;
pub use pagination::{PageRequest, PageWindow, PagedResult};
pub use repo::attendee_repo::{AttendeeRepository, SqliteAttendeeRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::{ErrorKind, ServiceError, ServiceResult, UNCLASSIFIED_MESSAGE};
pub use service::event_catalog::{CreateEvent, EventCatalog};
pub use service::registration_service::{RegisterAttendee, RegistrationService};
pub use time::{from_absolute, is_valid_zone, to_absolute, LocalTime, DEFAULT_TIME_ZONE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
