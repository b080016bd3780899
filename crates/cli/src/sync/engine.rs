// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running sync engine loop.
//!
//! A single task drives everything: reachability probes on one timer,
//! periodic sync on another (gated on being online), and an immediate sync
//! whenever the monitor reports the connection came back. Cancellation
//! wins over all other arms so shutdown is prompt.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::Result;
use crate::sync::connectivity::ConnectivityEvent;
use crate::sync::gateway::RemoteGateway;
use crate::sync::orchestrator::SyncOrchestrator;

/// Timer settings for the engine loop.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Periodic sync interval while online.
    pub sync_interval: Duration,
    /// Reachability probe interval.
    pub probe_interval: Duration,
}

/// Run the engine until the token is cancelled.
///
/// The first probe fires immediately, so a reachable server is noticed at
/// startup and the resulting online transition triggers the first sync.
/// Returns early only on a fatal local storage error.
pub async fn run<G: RemoteGateway>(
    orchestrator: &SyncOrchestrator<G>,
    events: &mut mpsc::Receiver<ConnectivityEvent>,
    config: EngineConfig,
    cancel: CancellationToken,
) -> Result<()> {
    info!(
        sync_interval_secs = config.sync_interval.as_secs(),
        probe_interval_secs = config.probe_interval.as_secs(),
        "sync engine started"
    );

    let mut sync_timer = time::interval_at(
        Instant::now() + config.sync_interval,
        config.sync_interval,
    );
    sync_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut probe_timer = time::interval(config.probe_interval);
    probe_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                info!("sync engine stopping");
                return Ok(());
            }
            Some(event) = events.recv() => match event {
                ConnectivityEvent::BecameOnline => {
                    info!("connection restored, syncing");
                    orchestrator.sync_now().await?;
                }
                ConnectivityEvent::BecameOffline => {
                    info!("connection lost, marks will queue locally");
                }
            },
            _ = sync_timer.tick(), if orchestrator.monitor().is_online() => {
                debug!("periodic sync");
                orchestrator.sync_now().await?;
            }
            _ = probe_timer.tick() => {
                orchestrator.probe().await;
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
