//! Attendee registration and paginated attendee listing.
//!
//! # Responsibility
//! - Decide whether a registration is accepted.
//! - Page through an event's attendees in registration order.
//!
//! # Invariants
//! - Checks run in the order existence, capacity, duplicate email. A full
//!   event reports full even for a duplicate email; a missing event reports
//!   not found and nothing else.
//! - The checks run against a snapshot. The store re-checks capacity and email
//!   uniqueness atomically on insert, so a lost race still yields
//!   `EventFull`/`DuplicateAttendee` rather than an over-booked event.

use crate::clock::Clock;
use crate::model::attendee::{Attendee, NewAttendee};
use crate::model::event::EventId;
use crate::pagination::{PageRequest, PageWindow, PagedResult};
use crate::repo::attendee_repo::AttendeeRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Input for [`RegistrationService::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAttendee {
    pub name: String,
    pub email: String,
}

/// Use-case service for attendee registration.
pub struct RegistrationService<R: AttendeeRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: AttendeeRepository, C: Clock> RegistrationService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Registers one attendee for `event_id`.
    ///
    /// # Errors
    /// - `NotFound` when the event does not exist.
    /// - `EventFull` when the event is at capacity.
    /// - `DuplicateAttendee` when the email is already registered.
    /// - `InvalidArgument` when name/email break the record bounds.
    pub fn register(
        &self,
        event_id: EventId,
        request: &RegisterAttendee,
    ) -> ServiceResult<Attendee> {
        let result = self.try_register(event_id, request);
        match &result {
            Ok(attendee) => info!(
                "event=attendee_register module=registration status=ok event_id={event_id} attendee_id={}",
                attendee.id
            ),
            Err(err) => warn!(
                "event=attendee_register module=registration status=rejected event_id={event_id} error_code={}",
                err.code()
            ),
        }
        result
    }

    fn try_register(
        &self,
        event_id: EventId,
        request: &RegisterAttendee,
    ) -> ServiceResult<Attendee> {
        let roster = self
            .repo
            .load_roster(event_id)?
            .ok_or(ServiceError::NotFound(event_id))?;

        if roster.is_fully_booked() {
            return Err(ServiceError::EventFull(event_id));
        }
        if roster.has_email(&request.email) {
            return Err(ServiceError::DuplicateAttendee(event_id));
        }

        let attendee = NewAttendee {
            event_id,
            name: request.name.clone(),
            email: request.email.clone(),
            registered_at: self.clock.now(),
        };
        Ok(self.repo.insert_attendee(&attendee)?)
    }

    /// Returns one page of attendees ordered by `registered_at`, then `id`.
    ///
    /// A page past the end is empty, not an error.
    pub fn list_attendees(
        &self,
        event_id: EventId,
        page: PageRequest,
    ) -> ServiceResult<PagedResult<Attendee>> {
        if !self.repo.event_exists(event_id)? {
            return Err(ServiceError::NotFound(event_id));
        }

        let total_count = self.repo.count_attendees(event_id)?;
        let window = PageWindow::compute(total_count, page);
        let items = if window.is_empty() {
            Vec::new()
        } else {
            self.repo
                .list_attendees(event_id, window.start, window.len())?
        };

        Ok(PagedResult::from_window(window, items))
    }
}
