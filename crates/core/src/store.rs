// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed local store for attendance tracking.
//!
//! The [`LocalStore`] struct provides all data access operations for events,
//! persons, and attendance marks. Records are kept across restarts and remain
//! readable while the remote authority is unreachable.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{AttendanceMark, Event, EventStatus, EventSummary, Person, PersonAttendance};

/// SQL schema for the attendance database.
///
/// Three record containers, the offline queue, and a checkpoint table. The
/// attendance container carries the composite uniqueness constraint that
/// makes queued-submission replay safe.
pub const SCHEMA: &str = r#"
-- Events fetched from the remote authority
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'open'
);

-- Persons registered for an event
CREATE TABLE IF NOT EXISTS persons (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    credential_number TEXT NOT NULL,
    dni TEXT NOT NULL,
    email TEXT NOT NULL,
    event_id TEXT NOT NULL
);

-- Attendance marks, at most one per (event, person)
CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id TEXT NOT NULL,
    person_id TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    UNIQUE (event_id, person_id)
);

-- Mutations pending remote confirmation
CREATE TABLE IF NOT EXISTS offline_queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL,
    payload TEXT NOT NULL,
    queued_at TEXT NOT NULL
);

-- Client-side checkpoints (last sync time and the like)
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_persons_event ON persons(event_id);
CREATE INDEX IF NOT EXISTS idx_attendance_event ON attendance(event_id);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
pub(crate) fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Run schema creation on a database connection.
///
/// This is the single migration path for every connection that touches the
/// store, including the offline queue's. The schema is idempotent, so it is
/// safe to apply on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Outcome of an attendance insert attempt.
///
/// A duplicate is not an error: a second insert for the same (event, person)
/// pair means the mark already exists, which callers treat as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The mark was inserted with this database-assigned id.
    Inserted(i64),
    /// A mark for the composite key already existed. Nothing was written.
    Duplicate,
}

impl InsertOutcome {
    /// Returns true if the insert created a new row.
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// SQLite connection with attendance store operations.
pub struct LocalStore {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl LocalStore {
    /// Open a store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for concurrency
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let store = LocalStore { conn };
        run_migrations(&store.conn)?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = LocalStore { conn };
        run_migrations(&store.conn)?;
        Ok(store)
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Upsert an event by identifier.
    ///
    /// An existing row keeps its position in insertion order.
    pub fn put_event(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (id, name, description, date, status)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 description = excluded.description,
                 date = excluded.date,
                 status = excluded.status",
            params![
                event.id,
                event.name,
                event.description,
                event.date.to_rfc3339(),
                event.status.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Upsert a batch of events inside a single transaction.
    ///
    /// Either every record lands or none does. Used by the sync refresh so a
    /// failure mid-batch never leaves a half-applied event list.
    pub fn put_events(&self, events: &[Event]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for event in events {
            tx.execute(
                "INSERT INTO events (id, name, description, date, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     description = excluded.description,
                     date = excluded.date,
                     status = excluded.status",
                params![
                    event.id,
                    event.name,
                    event.description,
                    event.date.to_rfc3339(),
                    event.status.as_str(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Get an event by ID.
    pub fn event(&self, id: &str) -> Result<Event> {
        let event = self
            .conn
            .query_row(
                "SELECT id, name, description, date, status FROM events WHERE id = ?1",
                params![id],
                map_event_row,
            )
            .optional()?;

        event.ok_or_else(|| Error::EventNotFound(id.to_string()))
    }

    /// Get all events in insertion order.
    pub fn events(&self) -> Result<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, date, status FROM events ORDER BY rowid")?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Get all events with their derived counters, in insertion order.
    ///
    /// The counters are recomputed on every call; they are never stored.
    pub fn event_summaries(&self) -> Result<Vec<EventSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.name, e.description, e.date, e.status,
                    (SELECT COUNT(*) FROM persons p WHERE p.event_id = e.id),
                    (SELECT COUNT(*) FROM attendance a WHERE a.event_id = e.id)
             FROM events e ORDER BY e.rowid",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(EventSummary {
                    event: map_event_row(row)?,
                    total_persons: row.get(5)?,
                    attendance_count: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    /// Delete an event. No-ops if absent.
    pub fn delete_event(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    // ── Persons ─────────────────────────────────────────────────────────

    /// Upsert a person by identifier.
    pub fn put_person(&self, person: &Person) -> Result<()> {
        self.conn.execute(
            "INSERT INTO persons (id, name, credential_number, dni, email, event_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 credential_number = excluded.credential_number,
                 dni = excluded.dni,
                 email = excluded.email,
                 event_id = excluded.event_id",
            params![
                person.id,
                person.name,
                person.credential_number,
                person.dni,
                person.email,
                person.event_id,
            ],
        )?;
        Ok(())
    }

    /// Upsert a batch of persons inside a single transaction.
    pub fn put_persons(&self, persons: &[Person]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for person in persons {
            tx.execute(
                "INSERT INTO persons (id, name, credential_number, dni, email, event_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     credential_number = excluded.credential_number,
                     dni = excluded.dni,
                     email = excluded.email,
                     event_id = excluded.event_id",
                params![
                    person.id,
                    person.name,
                    person.credential_number,
                    person.dni,
                    person.email,
                    person.event_id,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Get a person by ID.
    pub fn person(&self, id: &str) -> Result<Person> {
        let person = self
            .conn
            .query_row(
                "SELECT id, name, credential_number, dni, email, event_id
                 FROM persons WHERE id = ?1",
                params![id],
                map_person_row,
            )
            .optional()?;

        person.ok_or_else(|| Error::PersonNotFound(id.to_string()))
    }

    /// Get all persons in insertion order.
    pub fn persons(&self) -> Result<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, credential_number, dni, email, event_id
             FROM persons ORDER BY rowid",
        )?;

        let persons = stmt
            .query_map([], map_person_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(persons)
    }

    /// Get the persons registered for an event, in insertion order.
    pub fn persons_for_event(&self, event_id: &str) -> Result<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, credential_number, dni, email, event_id
             FROM persons WHERE event_id = ?1 ORDER BY rowid",
        )?;

        let persons = stmt
            .query_map(params![event_id], map_person_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(persons)
    }

    /// Get an event's persons joined with their attendance state.
    pub fn persons_with_attendance(&self, event_id: &str) -> Result<Vec<PersonAttendance>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name, p.credential_number, p.dni, p.email, p.event_id,
                    a.recorded_at
             FROM persons p
             LEFT JOIN attendance a
                    ON a.event_id = p.event_id AND a.person_id = p.id
             WHERE p.event_id = ?1
             ORDER BY p.rowid",
        )?;

        let rows = stmt
            .query_map(params![event_id], |row| {
                let attended: Option<String> = row.get(6)?;
                let attended_at = match attended {
                    Some(ts) => Some(parse_timestamp(&ts, "recorded_at")?),
                    None => None,
                };
                Ok(PersonAttendance {
                    person: map_person_row(row)?,
                    attended_at,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Delete a person. No-ops if absent.
    pub fn delete_person(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM persons WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    // ── Attendance ──────────────────────────────────────────────────────

    /// Insert an attendance mark, reporting a duplicate instead of erroring.
    ///
    /// The uniqueness constraint on (event_id, person_id) is the sole
    /// concurrency guard for the recording path: two racing callers both
    /// attempt the insert, exactly one row wins, and the loser observes
    /// [`InsertOutcome::Duplicate`].
    pub fn insert_attendance(&self, mark: &AttendanceMark) -> Result<InsertOutcome> {
        let affected = self.conn.execute(
            "INSERT OR IGNORE INTO attendance (event_id, person_id, recorded_at)
             VALUES (?1, ?2, ?3)",
            params![
                mark.event_id,
                mark.person_id,
                mark.recorded_at.to_rfc3339(),
            ],
        )?;

        if affected == 0 {
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid()))
        }
    }

    /// Look up an attendance mark by its composite key.
    pub fn attendance_for(&self, event_id: &str, person_id: &str) -> Result<Option<AttendanceMark>> {
        let mark = self
            .conn
            .query_row(
                "SELECT id, event_id, person_id, recorded_at
                 FROM attendance WHERE event_id = ?1 AND person_id = ?2",
                params![event_id, person_id],
                map_attendance_row,
            )
            .optional()?;

        Ok(mark)
    }

    /// Get all attendance marks in insertion order.
    pub fn attendance_marks(&self) -> Result<Vec<AttendanceMark>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, person_id, recorded_at FROM attendance ORDER BY rowid",
        )?;

        let marks = stmt
            .query_map([], map_attendance_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(marks)
    }

    /// Delete an attendance mark by database id. No-ops if absent.
    pub fn delete_attendance(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM attendance WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    // ── Meta ────────────────────────────────────────────────────────────

    /// Read a client-side checkpoint value.
    pub fn meta_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a client-side checkpoint value.
    pub fn meta_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Map an event row in (id, name, description, date, status) column order.
fn map_event_row(row: &rusqlite::Row<'_>) -> std::result::Result<Event, rusqlite::Error> {
    let date_str: String = row.get(3)?;
    let status_str: String = row.get(4)?;
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        date: parse_timestamp(&date_str, "date")?,
        status: parse_db::<EventStatus>(&status_str, "status")?,
    })
}

/// Map a person row in (id, name, credential_number, dni, email, event_id) column order.
fn map_person_row(row: &rusqlite::Row<'_>) -> std::result::Result<Person, rusqlite::Error> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        credential_number: row.get(2)?,
        dni: row.get(3)?,
        email: row.get(4)?,
        event_id: row.get(5)?,
    })
}

/// Map an attendance row in (id, event_id, person_id, recorded_at) column order.
fn map_attendance_row(
    row: &rusqlite::Row<'_>,
) -> std::result::Result<AttendanceMark, rusqlite::Error> {
    let recorded_str: String = row.get(3)?;
    Ok(AttendanceMark {
        id: row.get(0)?,
        event_id: row.get(1)?,
        person_id: row.get(2)?,
        recorded_at: parse_timestamp(&recorded_str, "recorded_at")?,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
