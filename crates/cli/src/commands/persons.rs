// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::{load_config, open_store};

/// List the people registered for an event, marking those already recorded.
pub fn run(event_id: &str) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    let event = store.event(event_id)?;

    println!("{} ({})", event.name, event.date.format("%Y-%m-%d"));

    let roster = store.persons_with_attendance(event_id)?;
    if roster.is_empty() {
        println!("No one is registered for this event.");
        return Ok(());
    }

    for entry in &roster {
        let marker = match entry.attended_at {
            Some(at) => format!("present {}", at.format("%H:%M")),
            None => "-".to_string(),
        };
        println!(
            "{}  {:<24}  {}  {}",
            entry.person.id, entry.person.name, entry.person.credential_number, marker
        );
    }
    Ok(())
}
