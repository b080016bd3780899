// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rollcall - An offline-first attendance tracker library.
//!
//! This crate provides the functionality behind the `rollcall` CLI tool.
//! Events, rosters, and attendance marks are cached in a local SQLite
//! database; marks recorded while offline queue durably and drain to the
//! server once it is reachable again.
//!
//! # Main Components
//!
//! - [`sync::SyncOrchestrator`] - Drains the queue and refreshes the cache
//! - [`sync::ConnectivityMonitor`] - Turns reachability flips into events
//! - [`sync::HttpGateway`] - HTTP client for the attendance server
//! - [`Config`] - Client configuration (server URL, intervals, paths)
//! - [`Error`] - Error types for all operations
//!
//! The storage layer itself lives in the `rollcall-core` crate.

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, ConfigCommand};
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Events => commands::events::run(),
        Command::Persons { event_id } => commands::persons::run(&event_id),
        Command::Mark {
            event_id,
            person_id,
        } => commands::mark::run(&event_id, &person_id),
        Command::Sync => commands::sync::run(),
        Command::Status => commands::status::run(),
        Command::Queue => commands::queue::run(),
        Command::Run { log_file } => commands::run::run(log_file.as_deref()),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rollcall", &mut std::io::stdout());
            Ok(())
        }
        Command::Config(cmd) => commands::config::run(cmd),
    }
}
