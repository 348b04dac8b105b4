//! Event aggregate root.
//!
//! # Invariants
//! - `end_at > start_at`.
//! - `1 <= max_capacity <= MAX_CAPACITY_LIMIT`.
//! - `created_at` is set once by the catalog and never changes.

use super::attendee::Attendee;
use super::{check_text, ValidationError};
use crate::time::from_absolute;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Store-assigned event identifier.
pub type EventId = i64;

/// Upper bound for `max_capacity`.
pub const MAX_CAPACITY_LIMIT: u32 = 10_000;
pub const EVENT_NAME_MAX_CHARS: usize = 200;
pub const EVENT_LOCATION_MAX_CHARS: usize = 300;

/// Event data before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_capacity: u32,
    pub created_at: DateTime<Utc>,
    /// Zone the creator's local times were given in.
    pub home_time_zone: String,
}

impl NewEvent {
    /// Checks the record invariants that the store also enforces.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name, EVENT_NAME_MAX_CHARS)?;
        check_text("location", &self.location, EVENT_LOCATION_MAX_CHARS)?;
        if self.end_at <= self.start_at {
            return Err(ValidationError::EndNotAfterStart);
        }
        if !(1..=MAX_CAPACITY_LIMIT).contains(&self.max_capacity) {
            return Err(ValidationError::CapacityOutOfRange {
                value: self.max_capacity,
                max: MAX_CAPACITY_LIMIT,
            });
        }
        if self.home_time_zone.trim().is_empty() {
            return Err(ValidationError::BlankField {
                field: "home_time_zone",
            });
        }
        Ok(())
    }
}

/// Persisted event plus its derived attendee count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_capacity: u32,
    pub created_at: DateTime<Utc>,
    pub home_time_zone: String,
    /// Number of attendee rows owned by this event at read time.
    pub attendee_count: u32,
}

impl Event {
    pub fn current_attendee_count(&self) -> u32 {
        self.attendee_count
    }

    pub fn is_fully_booked(&self) -> bool {
        self.attendee_count >= self.max_capacity
    }

    /// Renders this event with start/end shown as wall-clock time in `zone_id`.
    ///
    /// Unknown zones fall back to the default zone; see [`crate::time`].
    pub fn render(&self, zone_id: &str) -> EventView {
        EventView {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            start_time: from_absolute(self.start_at, zone_id),
            end_time: from_absolute(self.end_at, zone_id),
            max_capacity: self.max_capacity,
            current_attendee_count: self.attendee_count,
            is_fully_booked: self.is_fully_booked(),
            time_zone: self.home_time_zone.clone(),
            created_at: self.created_at,
        }
    }
}

/// Caller-facing event projection in a requested zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    pub id: EventId,
    pub name: String,
    pub location: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub max_capacity: u32,
    pub current_attendee_count: u32,
    pub is_fully_booked: bool,
    /// The event's home zone, independent of the zone used for rendering.
    pub time_zone: String,
    pub created_at: DateTime<Utc>,
}

/// An event loaded together with every attendee it owns.
///
/// This is the snapshot registration decisions are made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRoster {
    pub event: Event,
    pub attendees: Vec<Attendee>,
}

impl EventRoster {
    pub fn is_fully_booked(&self) -> bool {
        self.attendees.len() >= self.event.max_capacity as usize
    }

    /// Exact, case-sensitive match against persisted emails.
    pub fn has_email(&self, email: &str) -> bool {
        self.attendees.iter().any(|attendee| attendee.email == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_event() -> NewEvent {
        let start_at = Utc.with_ymd_and_hms(2030, 5, 1, 9, 0, 0).unwrap();
        NewEvent {
            name: "RustConf".to_string(),
            location: "Hall A".to_string(),
            start_at,
            end_at: start_at + Duration::hours(8),
            max_capacity: 50,
            created_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            home_time_zone: "Asia/Kolkata".to_string(),
        }
    }

    fn stored(max_capacity: u32, attendee_count: u32) -> Event {
        let new = new_event();
        Event {
            id: 7,
            name: new.name,
            location: new.location,
            start_at: new.start_at,
            end_at: new.end_at,
            max_capacity,
            created_at: new.created_at,
            home_time_zone: new.home_time_zone,
            attendee_count,
        }
    }

    #[test]
    fn validate_accepts_well_formed_event() {
        assert_eq!(new_event().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_inverted_or_empty_window() {
        let mut event = new_event();
        event.end_at = event.start_at;
        assert_eq!(event.validate(), Err(ValidationError::EndNotAfterStart));
    }

    #[test]
    fn validate_rejects_capacity_outside_range() {
        let mut event = new_event();
        event.max_capacity = 0;
        assert!(matches!(
            event.validate(),
            Err(ValidationError::CapacityOutOfRange { value: 0, .. })
        ));
        event.max_capacity = MAX_CAPACITY_LIMIT + 1;
        assert!(event.validate().is_err());
        event.max_capacity = MAX_CAPACITY_LIMIT;
        assert!(event.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_and_oversized_text() {
        let mut event = new_event();
        event.name = "   ".to_string();
        assert_eq!(
            event.validate(),
            Err(ValidationError::BlankField { field: "name" })
        );

        let mut event = new_event();
        event.location = "x".repeat(EVENT_LOCATION_MAX_CHARS + 1);
        assert!(matches!(
            event.validate(),
            Err(ValidationError::TooLong {
                field: "location",
                ..
            })
        ));
    }

    #[test]
    fn fully_booked_once_count_reaches_capacity() {
        assert!(!stored(2, 1).is_fully_booked());
        assert!(stored(2, 2).is_fully_booked());
        assert!(stored(2, 3).is_fully_booked());
    }

    #[test]
    fn render_uses_requested_zone_but_reports_home_zone() {
        let view = stored(10, 3).render("America/New_York");
        assert_eq!(view.start_time.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(view.start_time.with_timezone(&Utc), new_event().start_at);
        assert_eq!(view.time_zone, "Asia/Kolkata");
        assert_eq!(view.current_attendee_count, 3);
        assert!(!view.is_fully_booked);
    }
}
