// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use clap_complete::Shell;

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Attendance:
  events      List events
  persons     List the people registered for an event
  mark        Record a person's attendance at an event

Synchronization:
  sync        Run a sync cycle now
  status      Show connectivity, queue depth, and last sync time
  queue       Show attendance marks waiting to reach the server
  run         Keep syncing in the background until interrupted

Setup & Configuration:
  config      Manage configuration
  completion  Generate shell completions";

const QUICKSTART_HELP: &str = "\
Get started:
  rollcall config set server.base_url http://host:4000
  rollcall sync                    Pull events and rosters from the server
  rollcall events                  List events
  rollcall mark <event> <person>   Record attendance (queues while offline)";

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An offline-first attendance tracker that syncs when the server is reachable")]
#[command(
    long_about = "An offline-first attendance tracker.\n\n\
    Events, rosters, and attendance marks live in a local SQLite database. Marks\n\
    recorded while offline queue locally and drain to the server once it is\n\
    reachable again."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Attendance
    // ─────────────────────────────────────────────────────────────────────────
    /// List events
    Events,

    /// List the people registered for an event
    #[command(arg_required_else_help = true)]
    Persons {
        /// Event ID
        event_id: String,
    },

    /// Record a person's attendance at an event
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        rollcall mark ev-42 p-7     Record that person p-7 attended event ev-42\n\n\
        While offline the mark is stored locally and queued; it reaches the\n\
        server on the next successful sync."
    )]
    Mark {
        /// Event ID
        event_id: String,

        /// Person ID
        person_id: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Synchronization
    // ─────────────────────────────────────────────────────────────────────────
    /// Run a sync cycle now (drain the queue, then refresh events and rosters)
    Sync,

    /// Show connectivity, queue depth, and last sync time
    Status,

    /// Show attendance marks waiting to reach the server
    Queue,

    /// Keep syncing in the background until interrupted
    #[command(after_help = "Examples:\n  \
        rollcall run                Sync every minute while online\n  \
        RUST_LOG=debug rollcall run Verbose logging\n  \
        rollcall run --log-file /var/log/rollcall.log\n\n\
        Stops cleanly on Ctrl-C.")]
    Run {
        /// Append logs to this file instead of stderr
        #[arg(long, value_name = "PATH")]
        log_file: Option<std::path::PathBuf>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Setup & Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Generate shell completions
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        rollcall completion bash > ~/.local/share/bash-completion/completions/rollcall\n  \
        rollcall completion zsh > ~/.zfunc/_rollcall\n  \
        rollcall completion fish > ~/.config/fish/completions/rollcall.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Manage configuration settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Configuration management commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show configuration values
    #[command(after_help = "Examples:\n  \
        rollcall config get                    Show all settings\n  \
        rollcall config get server.base_url    Show one setting")]
    Get {
        /// Setting to show (all settings when omitted)
        key: Option<String>,
    },

    /// Change a configuration value
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        rollcall config set server.base_url http://host:4000\n  \
        rollcall config set sync.interval_secs 30"
    )]
    Set {
        /// Setting to change
        key: String,

        /// New value
        value: String,
    },

    /// Print the path of the configuration file
    Path,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
