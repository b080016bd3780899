// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue for persisting operations when disconnected.
//!
//! Operations land in the `offline_queue` table of the same SQLite database
//! as the rest of the store, so an enqueue is committed before the call
//! returns. On reconnect, queued operations are replayed to the server in
//! enqueue order, each removed only after the server confirms it.

use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{QueueItem, QueueOp};
use crate::store::{parse_timestamp, LocalStore};

/// Durable FIFO of operations awaiting remote confirmation.
///
/// Items are ordered by their auto-assigned sequence id. The queue holds its
/// own connection; WAL journaling makes it safe to use alongside a
/// [`LocalStore`] opened on the same path.
pub struct OfflineQueue {
    conn: Connection,
}

impl OfflineQueue {
    /// Create or open an offline queue backed by the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let store = LocalStore::open(path)?;
        Ok(OfflineQueue { conn: store.conn })
    }

    /// Open an in-memory queue (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let store = LocalStore::open_in_memory()?;
        Ok(OfflineQueue { conn: store.conn })
    }

    /// Enqueue an operation for later sending, returning its sequence id.
    ///
    /// The operation is committed to the database before this returns.
    pub fn enqueue(&self, op: &QueueOp) -> Result<i64> {
        let payload = serde_json::to_string(op)?;
        self.conn.execute(
            "INSERT INTO offline_queue (operation, payload, queued_at)
             VALUES (?1, ?2, ?3)",
            params![op.kind(), payload, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Read all queued operations in enqueue order, without removing them.
    pub fn pending(&self) -> Result<Vec<QueueItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, operation, payload, queued_at FROM offline_queue ORDER BY id",
        )?;

        let items = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let operation: String = row.get(1)?;
                let payload: String = row.get(2)?;
                let queued_str: String = row.get(3)?;
                Ok((id, operation, payload, queued_str))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        items
            .into_iter()
            .map(|(id, operation, payload, queued_str)| {
                let op: QueueOp = serde_json::from_str(&payload)
                    .map_err(|_| Error::UnknownOperation(operation))?;
                let queued_at =
                    parse_timestamp(&queued_str, "queued_at").map_err(Error::Database)?;
                Ok(QueueItem { id, op, queued_at })
            })
            .collect()
    }

    /// Remove a queue item by sequence id. No-ops if absent.
    ///
    /// Call this only after the server has confirmed the operation.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM offline_queue WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Get the number of queued operations.
    pub fn len(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM offline_queue", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
