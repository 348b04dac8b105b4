//! Caller request shapes and their validation.
//!
//! Validation here is the gate core services rely on: core trusts that names
//! are non-blank and bounded, capacity is in range, the window is ordered, the
//! start is not in the past, and emails are well-formed.

use crate::error::ApiError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseError, Utc};
use eventdesk_core::model::attendee::{ATTENDEE_EMAIL_MAX_CHARS, ATTENDEE_NAME_MAX_CHARS};
use eventdesk_core::model::event::{EVENT_LOCATION_MAX_CHARS, EVENT_NAME_MAX_CHARS};
use eventdesk_core::{
    from_absolute, to_absolute, CreateEvent, LocalTime, RegisterAttendee, MAX_CAPACITY_LIMIT,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email regex"));

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A start or end time as sent by a caller.
///
/// `2030-06-02T09:00:00` is wall-clock time in the request zone.
/// `2030-06-02T03:30:00Z` or `2030-06-02T09:00:00+05:30` is already an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RequestTime {
    Tagged(DateTime<FixedOffset>),
    Wall(NaiveDateTime),
}

impl RequestTime {
    fn to_local(self) -> LocalTime {
        match self {
            Self::Tagged(instant) => LocalTime::Absolute(instant.with_timezone(&Utc)),
            Self::Wall(naive) => LocalTime::Wall(naive),
        }
    }
}

impl From<NaiveDateTime> for RequestTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::Wall(value)
    }
}

impl From<DateTime<Utc>> for RequestTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Tagged(value.fixed_offset())
    }
}

impl FromStr for RequestTime {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match DateTime::parse_from_rfc3339(value) {
            Ok(instant) => Ok(Self::Tagged(instant)),
            Err(_) => value.parse::<NaiveDateTime>().map(Self::Wall),
        }
    }
}

/// Event creation request. Untagged times are wall-clock times in `time_zone`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub location: String,
    pub start_time: RequestTime,
    pub end_time: RequestTime,
    pub max_capacity: i64,
    /// Omitted or blank means the API's default zone.
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl CreateEventRequest {
    /// Validates the request and converts it into a core command.
    ///
    /// "Not in the past" compares a wall-clock `start_time` with `now`
    /// rendered in the request zone, and a tagged one with `now` directly.
    /// Ordering compares wall times as given and instants otherwise.
    pub fn validate(
        &self,
        now: DateTime<Utc>,
        default_zone: &str,
    ) -> Result<CreateEvent, ApiError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "name", &self.name, EVENT_NAME_MAX_CHARS);
        check_text(&mut errors, "location", &self.location, EVENT_LOCATION_MAX_CHARS);

        let max_capacity = u32::try_from(self.max_capacity)
            .ok()
            .filter(|value| (1..=MAX_CAPACITY_LIMIT).contains(value));
        if max_capacity.is_none() {
            errors.push(FieldError {
                field: "max_capacity",
                message: format!("must be between 1 and {MAX_CAPACITY_LIMIT}"),
            });
        }

        let time_zone = self
            .time_zone
            .as_deref()
            .map(str::trim)
            .filter(|zone| !zone.is_empty())
            .unwrap_or(default_zone)
            .to_string();

        let start = self.start_time.to_local();
        let end = self.end_time.to_local();

        let ordered = match (start, end) {
            (LocalTime::Wall(start), LocalTime::Wall(end)) => end > start,
            _ => to_absolute(end, &time_zone) > to_absolute(start, &time_zone),
        };
        if !ordered {
            errors.push(FieldError {
                field: "end_time",
                message: "End time must be after start time".to_string(),
            });
        }
        let in_past = match start {
            LocalTime::Wall(start) => start < from_absolute(now, &time_zone).naive_local(),
            LocalTime::Absolute(start) => start < now,
        };
        if in_past {
            errors.push(FieldError {
                field: "start_time",
                message: "Event cannot be scheduled in the past".to_string(),
            });
        }

        match max_capacity {
            Some(max_capacity) if errors.is_empty() => Ok(CreateEvent {
                name: self.name.clone(),
                location: self.location.clone(),
                start,
                end,
                max_capacity,
                time_zone,
            }),
            _ => Err(ApiError::invalid_request(errors)),
        }
    }
}

/// Attendee registration request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterAttendeeRequest {
    pub name: String,
    pub email: String,
}

impl RegisterAttendeeRequest {
    pub fn validate(&self) -> Result<RegisterAttendee, ApiError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "name", &self.name, ATTENDEE_NAME_MAX_CHARS);
        if check_text(&mut errors, "email", &self.email, ATTENDEE_EMAIL_MAX_CHARS)
            && !EMAIL_RE.is_match(&self.email)
        {
            errors.push(FieldError {
                field: "email",
                message: "must be a valid email address".to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(ApiError::invalid_request(errors));
        }
        Ok(RegisterAttendee {
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}

/// Records a problem with `value` and returns whether it passed.
fn check_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError {
            field,
            message: "is required".to_string(),
        });
        return false;
    }
    if value.chars().count() > max_chars {
        errors.push(FieldError {
            field,
            message: format!("must be at most {max_chars} characters"),
        });
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiStatus;
    use chrono::{NaiveDate, TimeZone};

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn now() -> DateTime<Utc> {
        // 10:00 in Kolkata.
        Utc.with_ymd_and_hms(2030, 6, 1, 4, 30, 0).unwrap()
    }

    fn create(start: NaiveDateTime, zone: Option<&str>) -> CreateEventRequest {
        CreateEventRequest {
            name: "Meetup".to_string(),
            location: "Library".to_string(),
            start_time: start.into(),
            end_time: (start + chrono::Duration::hours(1)).into(),
            max_capacity: 30,
            time_zone: zone.map(str::to_string),
        }
    }

    #[test]
    fn missing_zone_uses_default() {
        let command = create(wall(2030, 6, 2, 9, 0), None)
            .validate(now(), "Asia/Kolkata")
            .unwrap();
        assert_eq!(command.time_zone, "Asia/Kolkata");
        assert_eq!(command.max_capacity, 30);

        let command = create(wall(2030, 6, 2, 9, 0), Some("  "))
            .validate(now(), "UTC")
            .unwrap();
        assert_eq!(command.time_zone, "UTC");
    }

    #[test]
    fn past_start_is_judged_in_request_zone() {
        // 09:00 is already past in Kolkata (10:00) but still ahead in UTC
        // terms for a UTC caller (04:30).
        let request = create(wall(2030, 6, 1, 9, 0), Some("Asia/Kolkata"));
        let err = request.validate(now(), "UTC").unwrap_err();
        assert_eq!(err.status, ApiStatus::BadRequest);
        assert!(err.fields.iter().any(|f| f.field == "start_time"));

        let request = create(wall(2030, 6, 1, 9, 0), Some("UTC"));
        assert!(request.validate(now(), "UTC").is_ok());
    }

    #[test]
    fn collects_every_field_problem() {
        let mut request = create(wall(2030, 6, 2, 9, 0), Some("UTC"));
        request.name = String::new();
        request.location = "x".repeat(EVENT_LOCATION_MAX_CHARS + 1);
        request.max_capacity = 10_001;
        request.end_time = request.start_time;

        let err = request.validate(now(), "UTC").unwrap_err();
        let fields: Vec<_> = err.fields.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["name", "location", "max_capacity", "end_time"]);
        assert!(err.message.contains("End time must be after start time"));
    }

    #[test]
    fn capacity_bounds_are_inclusive() {
        let mut request = create(wall(2030, 6, 2, 9, 0), Some("UTC"));
        request.max_capacity = 1;
        assert!(request.validate(now(), "UTC").is_ok());
        request.max_capacity = 10_000;
        assert!(request.validate(now(), "UTC").is_ok());
        request.max_capacity = 0;
        assert!(request.validate(now(), "UTC").is_err());
        request.max_capacity = -5;
        assert!(request.validate(now(), "UTC").is_err());
    }

    #[test]
    fn registration_requires_name_and_valid_email() {
        let ok = RegisterAttendeeRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert_eq!(ok.validate().unwrap().email, "ada@example.com");

        for email in ["", "ada", "ada@", "ada@example", "a da@example.com", "@example.com"] {
            let request = RegisterAttendeeRequest {
                name: "Ada".to_string(),
                email: email.to_string(),
            };
            let err = request.validate().unwrap_err();
            assert_eq!(err.fields.len(), 1, "email `{email}`");
            assert_eq!(err.fields[0].field, "email");
        }

        let unnamed = RegisterAttendeeRequest {
            name: " ".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert_eq!(unnamed.validate().unwrap_err().fields[0].field, "name");
    }

    #[test]
    fn create_request_deserializes_with_optional_zone() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "name": "Meetup",
            "location": "Library",
            "start_time": "2030-06-02T09:00:00",
            "end_time": "2030-06-02T10:00:00",
            "max_capacity": 30
        }))
        .unwrap();
        assert_eq!(request.time_zone, None);
        assert_eq!(request.start_time, RequestTime::Wall(wall(2030, 6, 2, 9, 0)));
    }

    #[test]
    fn utc_tagged_times_are_kept_as_instants() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "name": "Meetup",
            "location": "Library",
            "start_time": "2030-06-02T03:30:00.000Z",
            "end_time": "2030-06-02T04:30:00.000Z",
            "max_capacity": 30,
            "time_zone": "America/New_York"
        }))
        .unwrap();
        let start = Utc.with_ymd_and_hms(2030, 6, 2, 3, 30, 0).unwrap();
        assert_eq!(request.start_time, RequestTime::from(start));

        let command = request.validate(now(), "UTC").unwrap();
        assert_eq!(command.start, LocalTime::Absolute(start));
        assert_eq!(
            command.end,
            LocalTime::Absolute(Utc.with_ymd_and_hms(2030, 6, 2, 4, 30, 0).unwrap())
        );
    }

    #[test]
    fn tagged_times_are_checked_as_instants() {
        let mut request = create(wall(2030, 6, 2, 9, 0), Some("Asia/Kolkata"));
        // 04:00Z is 09:30 in Kolkata, after the 09:00 wall-clock start.
        request.end_time = Utc.with_ymd_and_hms(2030, 6, 2, 4, 0, 0).unwrap().into();
        assert!(request.validate(now(), "UTC").is_ok());

        // 03:00Z is 08:30 in Kolkata, before the start.
        request.end_time = Utc.with_ymd_and_hms(2030, 6, 2, 3, 0, 0).unwrap().into();
        let err = request.validate(now(), "UTC").unwrap_err();
        assert_eq!(err.fields[0].field, "end_time");

        // One minute before now.
        let mut request = create(wall(2030, 6, 2, 9, 0), Some("UTC"));
        request.start_time = Utc.with_ymd_and_hms(2030, 6, 1, 4, 29, 0).unwrap().into();
        let err = request.validate(now(), "UTC").unwrap_err();
        assert!(err.fields.iter().any(|f| f.field == "start_time"));
    }

    #[test]
    fn request_time_parses_both_shapes() {
        assert_eq!(
            "2030-06-02T09:00:00".parse::<RequestTime>().unwrap(),
            RequestTime::Wall(wall(2030, 6, 2, 9, 0))
        );
        let tagged: RequestTime = "2030-06-02T09:00:00+05:30".parse().unwrap();
        assert_eq!(
            tagged,
            RequestTime::from(Utc.with_ymd_and_hms(2030, 6, 2, 3, 30, 0).unwrap())
        );
        assert!("next tuesday".parse::<RequestTime>().is_err());
    }
}
