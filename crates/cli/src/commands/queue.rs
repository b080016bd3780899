// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rollcall_core::QueueOp;

use crate::error::Result;

use super::{load_config, open_queue};

/// Show attendance marks waiting to reach the server, oldest first.
pub fn run() -> Result<()> {
    let config = load_config()?;
    let queue = open_queue(&config)?;

    let items = queue.pending()?;
    if items.is_empty() {
        println!("Queue is empty.");
        return Ok(());
    }

    for item in &items {
        let QueueOp::RecordAttendance {
            event_id,
            person_id,
            recorded_at,
        } = &item.op;
        println!(
            "#{}  {}  {} at {}",
            item.id,
            recorded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            person_id,
            event_id,
        );
    }
    let noun = if items.len() == 1 { "mark" } else { "marks" };
    println!("{} {} waiting to sync.", items.len(), noun);
    Ok(())
}
