//! Event and attendee entry points for front ends.
//!
//! # Responsibility
//! - Expose one call per use-case with caller-friendly inputs.
//! - Open repositories per call over a single owned connection.
//!
//! # Invariants
//! - Calls never panic; every failure is an [`ApiError`].
//! - A missing event on `get_event`/`delete_event` is `NotFound`, not `Ok`.

use crate::error::{ApiError, ApiResult};
use crate::request::{CreateEventRequest, RegisterAttendeeRequest};
use eventdesk_core::db::{open_db, open_db_in_memory};
use eventdesk_core::{
    Attendee, Clock, EventCatalog, EventId, EventView, PageRequest, PagedResult,
    RegistrationService, ServiceError, SqliteAttendeeRepository, SqliteEventRepository,
    SystemClock, DEFAULT_TIME_ZONE,
};
use log::error;
use rusqlite::Connection;
use std::path::Path;

/// Facade over the catalog and registration services.
pub struct EventsApi<C: Clock = SystemClock> {
    conn: Connection,
    clock: C,
    default_time_zone: String,
}

impl EventsApi<SystemClock> {
    /// Opens (and migrates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> ApiResult<Self> {
        let conn = open_db(path).map_err(|err| storage_failure("open", &err))?;
        Ok(Self::with_clock(conn, SystemClock))
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory() -> ApiResult<Self> {
        let conn = open_db_in_memory().map_err(|err| storage_failure("open", &err))?;
        Ok(Self::with_clock(conn, SystemClock))
    }
}

impl<C: Clock> EventsApi<C> {
    /// Wraps an already migrated connection.
    pub fn with_clock(conn: Connection, clock: C) -> Self {
        Self {
            conn,
            clock,
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }

    /// Replaces the zone used when callers omit one.
    pub fn with_default_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.default_time_zone = zone.into();
        self
    }

    pub fn default_time_zone(&self) -> &str {
        &self.default_time_zone
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn create_event(&self, request: &CreateEventRequest) -> ApiResult<EventView> {
        let command = request.validate(self.clock.now(), &self.default_time_zone)?;
        self.with_catalog(|catalog| catalog.create(&command))
    }

    /// Lists upcoming events rendered in `time_zone` (or the default zone).
    pub fn list_events(&self, time_zone: Option<&str>) -> ApiResult<Vec<EventView>> {
        let zone = self.zone_or_default(time_zone);
        self.with_catalog(|catalog| catalog.list_upcoming(zone))
    }

    pub fn get_event(&self, event_id: EventId, time_zone: Option<&str>) -> ApiResult<EventView> {
        let zone = self.zone_or_default(time_zone);
        self.with_catalog(|catalog| catalog.get_by_id(event_id, zone))?
            .ok_or_else(|| ApiError::from(ServiceError::NotFound(event_id)))
    }

    pub fn register_attendee(
        &self,
        event_id: EventId,
        request: &RegisterAttendeeRequest,
    ) -> ApiResult<Attendee> {
        let command = request.validate()?;
        self.with_registration(|service| service.register(event_id, &command))
    }

    /// Lists one page of attendees; raw paging input is normalized first.
    pub fn list_attendees(
        &self,
        event_id: EventId,
        page_number: Option<i64>,
        page_size: Option<i64>,
    ) -> ApiResult<PagedResult<Attendee>> {
        let page = PageRequest::normalize(page_number, page_size);
        self.with_registration(|service| service.list_attendees(event_id, page))
    }

    pub fn delete_event(&self, event_id: EventId) -> ApiResult<()> {
        if self.with_catalog(|catalog| catalog.delete_by_id(event_id))? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(event_id).into())
        }
    }

    fn zone_or_default<'a>(&'a self, time_zone: Option<&'a str>) -> &'a str {
        time_zone
            .map(str::trim)
            .filter(|zone| !zone.is_empty())
            .unwrap_or(&self.default_time_zone)
    }

    fn with_catalog<T>(
        &self,
        f: impl FnOnce(&EventCatalog<SqliteEventRepository<'_>, &C>) -> Result<T, ServiceError>,
    ) -> ApiResult<T> {
        let repo = SqliteEventRepository::try_new(&self.conn).map_err(ServiceError::from)?;
        let catalog = EventCatalog::new(repo, &self.clock);
        Ok(f(&catalog)?)
    }

    fn with_registration<T>(
        &self,
        f: impl FnOnce(
            &RegistrationService<SqliteAttendeeRepository<'_>, &C>,
        ) -> Result<T, ServiceError>,
    ) -> ApiResult<T> {
        let repo = SqliteAttendeeRepository::try_new(&self.conn).map_err(ServiceError::from)?;
        let service = RegistrationService::new(repo, &self.clock);
        Ok(f(&service)?)
    }
}

fn storage_failure(operation: &str, err: &dyn std::error::Error) -> ApiError {
    error!("event=storage_{operation} module=api status=error error={err}");
    ApiError {
        status: crate::error::ApiStatus::Internal,
        code: "unclassified",
        message: eventdesk_core::UNCLASSIFIED_MESSAGE.to_string(),
        fields: Vec::new(),
    }
}
