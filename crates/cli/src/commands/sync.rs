// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::{load_config, open_orchestrator};

/// Run one sync cycle: drain the queue, then refresh events and rosters.
pub fn run() -> Result<()> {
    let config = load_config()?;
    let (orchestrator, _events) = open_orchestrator(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        if !orchestrator.probe().await {
            let pending = orchestrator.queue().len()?;
            println!("Server unreachable at {}.", config.server.base_url);
            if pending > 0 {
                let noun = if pending == 1 { "mark" } else { "marks" };
                println!("{} queued {} will sync once it is reachable.", pending, noun);
            }
            return Ok(());
        }

        let report = match orchestrator.sync_now().await? {
            Some(report) => report,
            None => {
                println!("A sync cycle is already running.");
                return Ok(());
            }
        };

        if report.drained > 0 {
            println!("Submitted {} queued mark(s).", report.drained);
        }
        if let Some(reason) = &report.drain_error {
            println!(
                "Drain stopped early ({} still queued): {}",
                report.pending, reason
            );
        }
        match &report.refresh_error {
            None => {
                println!(
                    "Refreshed {} event(s) and {} person(s).",
                    report.events_refreshed, report.persons_refreshed
                );
                println!("Sync complete.");
            }
            Some(reason) => {
                println!("Refresh failed: {}", reason);
            }
        }
        Ok(())
    })
}
