// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core data types for the rollcall attendance tracker.
//!
//! This module contains the record shapes persisted by the local store:
//! Event, Person, AttendanceMark, and the queued operation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Accepting attendance marks.
    Open,
    /// No longer accepting attendance marks.
    Closed,
}

impl EventStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "open",
            EventStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(EventStatus::Open),
            "closed" => Ok(EventStatus::Closed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// An event people register for and attend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identifier assigned by the remote authority.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Longer description shown in listings.
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Whether the event still accepts attendance.
    pub status: EventStatus,
}

impl Event {
    /// Creates an open event with an empty description.
    pub fn new(id: String, name: String, date: DateTime<Utc>) -> Self {
        Event {
            id,
            name,
            description: String::new(),
            date,
            status: EventStatus::Open,
        }
    }
}

/// A person registered for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identifier assigned by the remote authority.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Credential number printed on the badge. Unique per event.
    pub credential_number: String,
    /// National identity document number. Unique per event.
    pub dni: String,
    /// Contact email.
    pub email: String,
    /// The event this person is registered for.
    pub event_id: String,
}

/// A recorded attendance for one (event, person) pair.
///
/// At most one mark exists per pair. The local store enforces this with a
/// uniqueness constraint on the composite key, which is what makes replaying
/// queued submissions safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceMark {
    /// Database-assigned identifier.
    pub id: i64,
    /// The event attended.
    pub event_id: String,
    /// The person who attended.
    pub person_id: String,
    /// Client-generated timestamp of when attendance was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl AttendanceMark {
    /// Creates a mark stamped with the current time. The id is assigned on insert.
    pub fn new(event_id: String, person_id: String) -> Self {
        AttendanceMark {
            id: 0, // Will be set by database
            event_id,
            person_id,
            recorded_at: Utc::now(),
        }
    }
}

/// A mutation pending remote confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueOp {
    /// Submit an attendance mark to the remote authority.
    RecordAttendance {
        event_id: String,
        person_id: String,
        recorded_at: DateTime<Utc>,
    },
}

impl QueueOp {
    /// Creates a record-attendance operation.
    pub fn record_attendance(
        event_id: String,
        person_id: String,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        QueueOp::RecordAttendance {
            event_id,
            person_id,
            recorded_at,
        }
    }

    /// Returns the operation kind string stored in the queue container.
    pub fn kind(&self) -> &'static str {
        match self {
            QueueOp::RecordAttendance { .. } => "record_attendance",
        }
    }
}

/// A durable entry in the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Sequence identifier assigned at enqueue time. Ascending in queue order.
    pub id: i64,
    /// The queued mutation.
    pub op: QueueOp,
    /// When the item was enqueued.
    pub queued_at: DateTime<Utc>,
}

/// An event joined with its derived counters.
///
/// The counters are computed by aggregate query at read time and are never
/// stored on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// The event record.
    pub event: Event,
    /// Number of persons registered for the event.
    pub total_persons: i64,
    /// Number of attendance marks recorded for the event.
    pub attendance_count: i64,
}

/// A person joined with their optional attendance mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonAttendance {
    /// The person record.
    pub person: Person,
    /// When attendance was recorded, if it was.
    pub attended_at: Option<DateTime<Utc>>,
}

impl PersonAttendance {
    /// Returns true if an attendance mark exists for this person.
    pub fn has_attended(&self) -> bool {
        self.attended_at.is_some()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
