// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::sync::{engine, EngineConfig};

use super::{load_config, open_orchestrator};

/// Run the sync engine in the foreground until interrupted.
pub fn run(log_file: Option<&Path>) -> Result<()> {
    setup_logging(log_file);

    let config = load_config()?;
    let engine_config = EngineConfig {
        sync_interval: config.sync.interval(),
        probe_interval: config.sync.probe_interval(),
    };

    println!(
        "Syncing against {} every {}s. Ctrl-C to stop.",
        config.server.base_url,
        config.sync.interval_secs
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let (orchestrator, mut events) = open_orchestrator(&config)?;

        let cancel = CancellationToken::new();
        let signal_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                signal_cancel.cancel();
            }
        });

        engine::run(&orchestrator, &mut events, engine_config, cancel).await
    })?;

    println!("Stopped.");
    Ok(())
}

fn setup_logging(log_file: Option<&Path>) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to open the log file if one was asked for, fall back to stderr
    let file = log_file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    if let Some(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
