// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::{load_config, open_store};

/// List cached events with their attendance counts.
pub fn run() -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    let summaries = store.event_summaries()?;
    if summaries.is_empty() {
        println!("No events cached. Run 'rollcall sync' while online to fetch them.");
        return Ok(());
    }

    for summary in &summaries {
        let event = &summary.event;
        println!(
            "{}  {}  {:<6}  {}  ({}/{} marked)",
            event.id,
            event.date.format("%Y-%m-%d"),
            event.status,
            event.name,
            summary.attendance_count,
            summary.total_persons,
        );
    }
    Ok(())
}
