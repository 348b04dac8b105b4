//! Event catalog use-cases: create, list upcoming, fetch, delete.
//!
//! # Responsibility
//! - Gate event creation on a known time zone, then store UTC instants.
//! - Render stored events in whatever zone the caller asks for.
//!
//! # Invariants
//! - "Upcoming" means `start_at > clock.now()`, compared in UTC.
//! - Creation does not re-check "start in the past"; callers validate wall
//!   times before calling `create`.

use crate::clock::Clock;
use crate::model::event::{EventId, EventView, NewEvent};
use crate::repo::event_repo::EventRepository;
use crate::service::error::{ServiceError, ServiceResult};
use crate::time::{is_valid_zone, to_absolute, LocalTime};
use log::{info, warn};

/// Input for [`EventCatalog::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEvent {
    pub name: String,
    pub location: String,
    pub start: LocalTime,
    pub end: LocalTime,
    pub max_capacity: u32,
    /// IANA zone the `start`/`end` wall times are expressed in.
    pub time_zone: String,
}

/// Use-case service for the event catalog.
pub struct EventCatalog<R: EventRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: EventRepository, C: Clock> EventCatalog<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates an event and returns it rendered in the creation zone.
    ///
    /// # Errors
    /// - `InvalidArgument` when `time_zone` is unknown or the record breaks
    ///   an event invariant.
    /// - `Unclassified` on storage failure.
    pub fn create(&self, request: &CreateEvent) -> ServiceResult<EventView> {
        if !is_valid_zone(&request.time_zone) {
            warn!("event=event_create module=catalog status=rejected error_code=invalid_time_zone");
            return Err(ServiceError::InvalidArgument(format!(
                "Invalid timezone: {}",
                request.time_zone
            )));
        }

        let new_event = NewEvent {
            name: request.name.clone(),
            location: request.location.clone(),
            start_at: to_absolute(request.start, &request.time_zone),
            end_at: to_absolute(request.end, &request.time_zone),
            max_capacity: request.max_capacity,
            created_at: self.clock.now(),
            home_time_zone: request.time_zone.clone(),
        };

        let event = self.repo.insert_event(&new_event)?;
        info!(
            "event=event_create module=catalog status=ok event_id={} max_capacity={} time_zone={}",
            event.id, event.max_capacity, event.home_time_zone
        );
        Ok(event.render(&request.time_zone))
    }

    /// Lists events starting strictly after now, earliest first.
    pub fn list_upcoming(&self, time_zone: &str) -> ServiceResult<Vec<EventView>> {
        let now = self.clock.now();
        let events = self.repo.list_events_starting_after(now)?;
        Ok(events.iter().map(|event| event.render(time_zone)).collect())
    }

    /// Gets one event; `Ok(None)` when it does not exist.
    pub fn get_by_id(&self, id: EventId, time_zone: &str) -> ServiceResult<Option<EventView>> {
        let event = self.repo.get_event(id)?;
        Ok(event.map(|event| event.render(time_zone)))
    }

    /// Deletes an event and all of its attendees.
    ///
    /// Returns `false` when no such event existed.
    pub fn delete_by_id(&self, id: EventId) -> ServiceResult<bool> {
        let removed = self.repo.delete_event(id)?;
        if !removed {
            info!("event=event_delete module=catalog status=absent event_id={id}");
        }
        Ok(removed)
    }
}
