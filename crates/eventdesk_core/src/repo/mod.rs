//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for events and attendees.
//! - Isolate SQL details from catalog/registration orchestration.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Read paths reject corrupt persisted rows instead of masking them.
//! - Store-level races (capacity, duplicate email) surface as semantic errors,
//!   not raw SQLite failures.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::event::EventId;
use crate::model::ValidationError;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

pub mod attendee_repo;
pub mod event_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event/attendee persistence and queries.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("event not found: {0}")]
    EventNotFound(EventId),
    /// The conditional insert found the event already at capacity.
    #[error("event {0} reached its capacity")]
    CapacityReached(EventId),
    /// The `(event_id, email)` uniqueness constraint rejected the insert.
    #[error("email already registered for event {0}")]
    DuplicateEmail(EventId),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

pub(crate) fn to_epoch_ms(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub(crate) fn from_epoch_ms(value: i64, column: &'static str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` out of range in {column}"))
    })
}

pub(crate) fn to_count(value: i64, column: &'static str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in {column}")))
}
