//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist new events and read them back with their attendee counts.
//! - Delete an event together with every attendee it owns.
//!
//! # Invariants
//! - `insert_event` calls `NewEvent::validate()` before SQL.
//! - `delete_event` removes attendees and the event in one transaction.

use super::{
    ensure_connection_ready, from_epoch_ms, to_count, to_epoch_ms, RepoError, RepoResult,
};
use crate::model::event::{Event, EventId, NewEvent};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

pub(crate) const EVENT_SELECT_SQL: &str = "SELECT
    e.id,
    e.name,
    e.location,
    e.start_at_ms,
    e.end_at_ms,
    e.max_capacity,
    e.created_at_ms,
    e.home_time_zone,
    (SELECT COUNT(*) FROM attendees a WHERE a.event_id = e.id) AS attendee_count
FROM events e";

/// Repository interface for the event aggregate root.
pub trait EventRepository {
    /// Stores a new event and returns it with its assigned id.
    fn insert_event(&self, event: &NewEvent) -> RepoResult<Event>;
    /// Gets one event by id; `None` when absent.
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists events whose start is strictly after `instant`, earliest first.
    fn list_events_starting_after(&self, instant: DateTime<Utc>) -> RepoResult<Vec<Event>>;
    /// Deletes an event and its attendees. Returns `false` when absent.
    fn delete_event(&self, id: EventId) -> RepoResult<bool>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["events", "attendees"])?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert_event(&self, event: &NewEvent) -> RepoResult<Event> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                name,
                location,
                start_at_ms,
                end_at_ms,
                max_capacity,
                created_at_ms,
                home_time_zone
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                event.name.as_str(),
                event.location.as_str(),
                to_epoch_ms(event.start_at),
                to_epoch_ms(event.end_at),
                event.max_capacity,
                to_epoch_ms(event.created_at),
                event.home_time_zone.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        self.get_event(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("event {id} missing after insert"))
        })
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        fetch_event(self.conn, id)
    }

    fn list_events_starting_after(&self, instant: DateTime<Utc>) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE e.start_at_ms > ?1
             ORDER BY e.start_at_ms ASC, e.id ASC;"
        ))?;
        let mut rows = stmt.query([to_epoch_ms(instant)])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed_attendees = tx.execute("DELETE FROM attendees WHERE event_id = ?1;", [id])?;
        let removed_events = tx.execute("DELETE FROM events WHERE id = ?1;", [id])?;
        tx.commit()?;

        if removed_events == 0 {
            return Ok(false);
        }
        info!(
            "event=event_delete module=repo status=ok event_id={id} removed_attendees={removed_attendees}"
        );
        Ok(true)
    }
}

pub(crate) fn fetch_event(conn: &Connection, id: EventId) -> RepoResult<Option<Event>> {
    let mut stmt = conn.prepare(&format!("{EVENT_SELECT_SQL} WHERE e.id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_event_row(row)))
        .optional()?;
    row.transpose()
}

pub(crate) fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let max_capacity: i64 = row.get("max_capacity")?;
    let attendee_count: i64 = row.get("attendee_count")?;

    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        location: row.get("location")?,
        start_at: from_epoch_ms(row.get("start_at_ms")?, "events.start_at_ms")?,
        end_at: from_epoch_ms(row.get("end_at_ms")?, "events.end_at_ms")?,
        max_capacity: to_count(max_capacity, "events.max_capacity")?,
        created_at: from_epoch_ms(row.get("created_at_ms")?, "events.created_at_ms")?,
        home_time_zone: row.get("home_time_zone")?,
        attendee_count: to_count(attendee_count, "attendee_count")?,
    })
}
