// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{Error, Result};
use crate::sync::RecordOutcome;

use super::{load_config, open_orchestrator};

/// Record a person's attendance at an event.
///
/// The mark is written locally first. If the server is reachable it is
/// submitted right away; otherwise it queues for the next sync.
pub fn run(event_id: &str, person_id: &str) -> Result<()> {
    let config = load_config()?;
    let (orchestrator, _events) = open_orchestrator(&config)?;

    // Validate against the local cache before touching the network.
    let store = orchestrator.store();
    store.event(event_id)?;
    let person = store.person(person_id)?;
    if person.event_id != event_id {
        return Err(Error::NotRegistered {
            person_id: person_id.to_string(),
            event_id: event_id.to_string(),
        });
    }

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async {
        orchestrator.probe().await;
        orchestrator.record_attendance(event_id, person_id).await
    })?;

    match outcome {
        RecordOutcome::Confirmed => {
            println!("Marked {} present at {} (synced).", person.name, event_id);
        }
        RecordOutcome::Queued => {
            println!(
                "Marked {} present at {} (queued, will sync when the server is reachable).",
                person.name, event_id
            );
        }
        RecordOutcome::AlreadyMarked => {
            println!("{} is already marked present at {}.", person.name, event_id);
        }
    }
    Ok(())
}
