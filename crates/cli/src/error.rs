// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the rollcall CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("event not found: {0}\n  hint: run 'rollcall sync' while online to refresh local data")]
    EventNotFound(String),

    #[error("person not found: {0}\n  hint: run 'rollcall sync' while online to refresh local data")]
    PersonNotFound(String),

    #[error("person {person_id} is not registered for event {event_id}")]
    NotRegistered {
        person_id: String,
        event_id: String,
    },

    #[error("invalid event status: '{0}'\n  hint: valid statuses are: open, closed")]
    InvalidStatus(String),

    #[error("unknown queue operation: '{0}'")]
    UnknownOperation(String),

    #[error("unknown config key: '{0}'\n  hint: run 'rollcall config get' to list available keys")]
    UnknownConfigKey(String),

    #[error("gateway error: {0}")]
    Gateway(#[from] crate::sync::GatewayError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for rollcall CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<rollcall_core::Error> for Error {
    fn from(e: rollcall_core::Error) -> Self {
        match e {
            rollcall_core::Error::EventNotFound(id) => Error::EventNotFound(id),
            rollcall_core::Error::PersonNotFound(id) => Error::PersonNotFound(id),
            rollcall_core::Error::InvalidStatus(s) => Error::InvalidStatus(s),
            rollcall_core::Error::UnknownOperation(s) => Error::UnknownOperation(s),
            rollcall_core::Error::Database(e) => Error::Database(e),
            rollcall_core::Error::Io(e) => Error::Io(e),
            rollcall_core::Error::Json(e) => Error::Json(e),
            rollcall_core::Error::CorruptedData(s) => Error::CorruptedData(s),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
