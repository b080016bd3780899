// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync between the local store and the attendance server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Engine    │────►│ Orchestrator │────►│   Gateway    │
//! │ (timer loop) │     │ (sync cycle) │◄────│   (trait)    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        │                    │
//!        ▼                    ▼
//! ┌──────────────┐     ┌──────────────┐
//! │ Connectivity │     │ Store+Queue  │
//! │  (monitor)   │     │  (SQLite)    │
//! └──────────────┘     └──────────────┘
//! ```
//!
//! # Behavior
//!
//! - Attendance marks land locally first; remote submission is best effort
//! - Failed or offline submissions queue durably and drain in order
//! - A duplicate submission is accepted by the server as a no-op
//! - Sync runs on connectivity restoration and on a periodic timer while
//!   online; concurrent triggers are dropped
//! - Injectable gateway trait for testing

pub mod connectivity;
pub mod engine;
pub mod gateway;
pub mod orchestrator;

pub use connectivity::{ConnectivityEvent, ConnectivityMonitor};
pub use engine::EngineConfig;
pub use gateway::{GatewayError, HttpGateway, RemoteGateway, SubmitOutcome};
pub use orchestrator::{RecordOutcome, SyncOrchestrator, SyncReport, SyncStatus};

#[cfg(test)]
mod test_helpers;
