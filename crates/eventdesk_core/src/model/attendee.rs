//! Attendee records owned by an event.
//!
//! # Invariants
//! - An attendee belongs to exactly one event and is never mutated.
//! - `email` is unique per event (exact, case-sensitive comparison).

use super::event::EventId;
use super::{check_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Store-assigned attendee identifier.
pub type AttendeeId = i64;

pub const ATTENDEE_NAME_MAX_CHARS: usize = 100;
pub const ATTENDEE_EMAIL_MAX_CHARS: usize = 150;

/// Registration data before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendee {
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

impl NewAttendee {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name, ATTENDEE_NAME_MAX_CHARS)?;
        check_text("email", &self.email, ATTENDEE_EMAIL_MAX_CHARS)?;
        Ok(())
    }
}

/// Persisted attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendee {
    pub id: AttendeeId,
    #[serde(skip_serializing)]
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn validate_bounds_name_and_email() {
        let mut attendee = NewAttendee {
            event_id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            registered_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        };
        assert!(attendee.validate().is_ok());

        attendee.email = format!("{}@example.com", "a".repeat(ATTENDEE_EMAIL_MAX_CHARS));
        assert!(matches!(
            attendee.validate(),
            Err(ValidationError::TooLong { field: "email", .. })
        ));

        attendee.email = "ada@example.com".to_string();
        attendee.name = String::new();
        assert_eq!(
            attendee.validate(),
            Err(ValidationError::BlankField { field: "name" })
        );
    }

    #[test]
    fn serialized_shape_omits_owning_event() {
        let attendee = Attendee {
            id: 3,
            event_id: 9,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            registered_at: Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&attendee).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["registered_at"], "2030-01-01T12:00:00Z");
        assert!(json.get("event_id").is_none());
    }
}
