// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::{load_config, open_orchestrator};

/// Show connectivity, queue depth, and last sync time.
pub fn run() -> Result<()> {
    let config = load_config()?;
    let (orchestrator, _events) = open_orchestrator(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let online = rt.block_on(orchestrator.probe());

    let status = orchestrator.status();
    let pending = orchestrator.queue().len()?;

    println!("Server: {}", config.server.base_url);
    println!("Status: {}", if online { "online" } else { "offline" });
    println!("Pending marks: {}", pending);
    match status.last_sync_time {
        Some(at) => println!("Last sync: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last sync: never"),
    }
    Ok(())
}
