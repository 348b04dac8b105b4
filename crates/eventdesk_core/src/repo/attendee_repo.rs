//! Attendee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load an event together with its attendees as one consistent snapshot.
//! - Insert attendees under store-enforced capacity and email uniqueness.
//! - Serve attendee pages in registration order.
//!
//! # Invariants
//! - `insert_attendee` writes a row only while the event is below capacity;
//!   the check and the insert run inside one immediate transaction, so
//!   concurrent writers cannot over-book.
//! - `UNIQUE(event_id, email)` is the final word on duplicates.
//! - Attendee order is `registered_at ASC, id ASC`.

use super::event_repo::fetch_event;
use super::{ensure_connection_ready, from_epoch_ms, to_epoch_ms, RepoError, RepoResult};
use crate::model::attendee::{Attendee, NewAttendee};
use crate::model::event::{EventId, EventRoster};
use rusqlite::{ffi, params, Connection, ErrorCode, Row, Transaction, TransactionBehavior};

const ATTENDEE_SELECT_SQL: &str = "SELECT
    id,
    event_id,
    name,
    email,
    registered_at_ms
FROM attendees";

/// Repository interface for attendees of one event.
pub trait AttendeeRepository {
    /// Loads an event and its full attendee set; `None` when the event is absent.
    fn load_roster(&self, event_id: EventId) -> RepoResult<Option<EventRoster>>;
    /// Returns whether an event with `event_id` exists.
    fn event_exists(&self, event_id: EventId) -> RepoResult<bool>;
    /// Inserts one attendee, guarded by capacity and email uniqueness.
    fn insert_attendee(&self, attendee: &NewAttendee) -> RepoResult<Attendee>;
    /// Counts attendees of one event.
    fn count_attendees(&self, event_id: EventId) -> RepoResult<u64>;
    /// Returns up to `limit` attendees starting at `offset` in registration order.
    fn list_attendees(&self, event_id: EventId, offset: u64, limit: u64)
        -> RepoResult<Vec<Attendee>>;
}

/// SQLite-backed attendee repository.
pub struct SqliteAttendeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["events", "attendees"])?;
        Ok(Self { conn })
    }
}

impl AttendeeRepository for SqliteAttendeeRepository<'_> {
    fn load_roster(&self, event_id: EventId) -> RepoResult<Option<EventRoster>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(event) = fetch_event(&tx, event_id)? else {
            return Ok(None);
        };

        let mut stmt = tx.prepare(&format!(
            "{ATTENDEE_SELECT_SQL}
             WHERE event_id = ?1
             ORDER BY registered_at_ms ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([event_id])?;
        let mut attendees = Vec::new();
        while let Some(row) = rows.next()? {
            attendees.push(parse_attendee_row(row)?);
        }
        drop(rows);
        drop(stmt);
        tx.commit()?;

        Ok(Some(EventRoster { event, attendees }))
    }

    fn event_exists(&self, event_id: EventId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1);",
            [event_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_attendee(&self, attendee: &NewAttendee) -> RepoResult<Attendee> {
        attendee.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let event_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1);",
            [attendee.event_id],
            |row| row.get(0),
        )?;
        if event_exists != 1 {
            return Err(RepoError::EventNotFound(attendee.event_id));
        }

        let inserted = tx
            .execute(
                "INSERT INTO attendees (event_id, name, email, registered_at_ms)
                 SELECT ?1, ?2, ?3, ?4
                 WHERE (SELECT COUNT(*) FROM attendees WHERE event_id = ?1)
                     < (SELECT max_capacity FROM events WHERE id = ?1);",
                params![
                    attendee.event_id,
                    attendee.name.as_str(),
                    attendee.email.as_str(),
                    to_epoch_ms(attendee.registered_at),
                ],
            )
            .map_err(|err| map_insert_error(err, attendee.event_id))?;
        if inserted == 0 {
            return Err(RepoError::CapacityReached(attendee.event_id));
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Attendee {
            id,
            event_id: attendee.event_id,
            name: attendee.name.clone(),
            email: attendee.email.clone(),
            registered_at: attendee.registered_at,
        })
    }

    fn count_attendees(&self, event_id: EventId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM attendees WHERE event_id = ?1;",
            [event_id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative attendee count `{count}`")))
    }

    fn list_attendees(
        &self,
        event_id: EventId,
        offset: u64,
        limit: u64,
    ) -> RepoResult<Vec<Attendee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTENDEE_SELECT_SQL}
             WHERE event_id = ?1
             ORDER BY registered_at_ms ASC, id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![
            event_id,
            to_sql_int(limit),
            to_sql_int(offset),
        ])?;
        let mut attendees = Vec::new();
        while let Some(row) = rows.next()? {
            attendees.push(parse_attendee_row(row)?);
        }
        Ok(attendees)
    }
}

fn parse_attendee_row(row: &Row<'_>) -> RepoResult<Attendee> {
    Ok(Attendee {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        registered_at: from_epoch_ms(row.get("registered_at_ms")?, "attendees.registered_at_ms")?,
    })
}

fn map_insert_error(err: rusqlite::Error, event_id: EventId) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateEmail(event_id)
        }
        _ => err.into(),
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
