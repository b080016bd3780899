// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rollcall-core: Storage layer for the rollcall attendance tracker
//!
//! This crate provides the data model, the SQLite-backed local store, and
//! the durable offline queue shared by the rollcall CLI and sync engine.

pub mod error;
pub mod model;
pub mod queue;
pub mod store;

pub use error::{Error, Result};
pub use model::{
    AttendanceMark, Event, EventStatus, EventSummary, Person, PersonAttendance, QueueItem, QueueOp,
};
pub use queue::OfflineQueue;
pub use store::{InsertOutcome, LocalStore};
