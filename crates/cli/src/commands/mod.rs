// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod events;
pub mod mark;
pub mod persons;
pub mod queue;
pub mod run;
pub mod status;
pub mod sync;

use tokio::sync::mpsc;

use crate::config::{config_path, Config};
use crate::error::Result;
use crate::sync::{ConnectivityEvent, ConnectivityMonitor, HttpGateway, SyncOrchestrator};
use rollcall_core::{LocalStore, OfflineQueue};

/// Load the active configuration, falling back to defaults when no config
/// file exists yet.
pub fn load_config() -> Result<Config> {
    Config::load_or_default(&config_path()?)
}

/// Helper to open the local store from the loaded config.
///
/// Creates the data directory on first use.
pub fn open_store(config: &Config) -> Result<LocalStore> {
    let db_path = config.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(LocalStore::open(&db_path)?)
}

/// Helper to open the offline queue from the loaded config.
pub fn open_queue(config: &Config) -> Result<OfflineQueue> {
    let db_path = config.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OfflineQueue::open(&db_path)?)
}

/// Helper to wire up the full sync stack: store, queue, gateway, and monitor.
///
/// The monitor starts offline; callers that need connectivity run a probe
/// or let the engine's probe timer establish it.
pub fn open_orchestrator(
    config: &Config,
) -> Result<(SyncOrchestrator, mpsc::Receiver<ConnectivityEvent>)> {
    let db_path = config.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = LocalStore::open(&db_path)?;
    let queue = OfflineQueue::open(&db_path)?;
    let gateway = HttpGateway::new(&config.server.base_url, config.server.timeout());
    let (monitor, events) = ConnectivityMonitor::new();
    let orchestrator = SyncOrchestrator::new(store, queue, gateway, monitor)?;
    Ok((orchestrator, events))
}
