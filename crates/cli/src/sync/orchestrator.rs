// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator: the write path for attendance marks and the cycle
//! that reconciles local state with the server.
//!
//! A sync cycle drains the offline queue oldest first, then refreshes the
//! local event list and rosters from the server. At most one cycle runs at
//! a time; a trigger that arrives while one is running is dropped, not
//! queued. Observers follow `{is_syncing, last_sync_time}` through a watch
//! channel.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use rollcall_core::{AttendanceMark, LocalStore, OfflineQueue, QueueOp};

use crate::error::Result;
use crate::sync::connectivity::ConnectivityMonitor;
use crate::sync::gateway::{GatewayError, HttpGateway, RemoteGateway};

/// Meta key the last completed sync time is checkpointed under.
const LAST_SYNC_META_KEY: &str = "last_sync_time";

/// Externally visible sync state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// True while a sync cycle is running.
    pub is_syncing: bool,
    /// When the last cycle ran to completion, if one ever did.
    pub last_sync_time: Option<DateTime<Utc>>,
}

/// What happened during one sync cycle.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Queue items confirmed by the server and removed.
    pub drained: usize,
    /// Items still queued after the drain pass.
    pub pending: usize,
    /// The failure that stopped the drain, if it stopped early.
    pub drain_error: Option<String>,
    /// Events upserted by the refresh.
    pub events_refreshed: usize,
    /// Persons upserted across all refreshed rosters.
    pub persons_refreshed: usize,
    /// The failure that prevented the refresh, if it failed.
    pub refresh_error: Option<String>,
}

impl SyncReport {
    /// True when the cycle ran to completion and the sync time advanced.
    pub fn completed(&self) -> bool {
        self.refresh_error.is_none()
    }
}

/// Outcome of a record-attendance call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Stored locally and confirmed by the server.
    Confirmed,
    /// Stored locally and queued for a later sync.
    Queued,
    /// A mark for the pair already existed; nothing was written or sent.
    AlreadyMarked,
}

/// Coordinates the local store, the offline queue, and the gateway.
pub struct SyncOrchestrator<G: RemoteGateway = HttpGateway> {
    store: LocalStore,
    queue: OfflineQueue,
    gateway: G,
    monitor: ConnectivityMonitor,
    syncing: AtomicBool,
    status: watch::Sender<SyncStatus>,
}

impl<G: RemoteGateway> SyncOrchestrator<G> {
    /// Create an orchestrator over an opened store and queue.
    ///
    /// The last sync time is seeded from the store's checkpoint so a fresh
    /// process reports it; an unreadable checkpoint degrades to "never".
    pub fn new(
        store: LocalStore,
        queue: OfflineQueue,
        gateway: G,
        monitor: ConnectivityMonitor,
    ) -> Result<Self> {
        let last_sync_time = match store.meta_get(LAST_SYNC_META_KEY)? {
            Some(value) => match DateTime::parse_from_rfc3339(&value) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(_) => {
                    warn!(%value, "unreadable last-sync checkpoint, treating as never synced");
                    None
                }
            },
            None => None,
        };

        let (status, _) = watch::channel(SyncStatus {
            is_syncing: false,
            last_sync_time,
        });

        Ok(SyncOrchestrator {
            store,
            queue,
            gateway,
            monitor,
            syncing: AtomicBool::new(false),
            status,
        })
    }

    /// The local store backing this orchestrator.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// The offline queue backing this orchestrator.
    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    /// The connectivity monitor observed by the recording path.
    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    /// Current sync status snapshot.
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to sync status changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Probe the server and feed the result to the connectivity monitor.
    pub async fn probe(&self) -> bool {
        let online = self.gateway.probe().await;
        self.monitor.observe(online);
        online
    }

    /// Record attendance for a person at an event.
    ///
    /// The mark lands in the local store first and the call is acknowledged
    /// from there; remote submission is best effort. An existing mark
    /// short-circuits without touching the network or the queue, and losing
    /// an insert race counts as that same success.
    pub async fn record_attendance(
        &self,
        event_id: &str,
        person_id: &str,
    ) -> Result<RecordOutcome> {
        if self.store.attendance_for(event_id, person_id)?.is_some() {
            return Ok(RecordOutcome::AlreadyMarked);
        }

        let mark = AttendanceMark::new(event_id.to_string(), person_id.to_string());
        if !self.store.insert_attendance(&mark)?.is_inserted() {
            return Ok(RecordOutcome::AlreadyMarked);
        }
        info!(event_id, person_id, "attendance recorded locally");

        if !self.monitor.is_online() {
            self.enqueue_mark(&mark)?;
            return Ok(RecordOutcome::Queued);
        }

        match self
            .gateway
            .submit_attendance(event_id, person_id, mark.recorded_at)
            .await
        {
            Ok(outcome) => {
                self.monitor.observe(true);
                debug!(event_id, person_id, outcome = ?outcome, "attendance confirmed");
                Ok(RecordOutcome::Confirmed)
            }
            Err(e) => {
                self.monitor
                    .observe(!matches!(e, GatewayError::Unreachable(_)));
                warn!(event_id, person_id, error = %e, "submission failed, queueing");
                self.enqueue_mark(&mark)?;
                Ok(RecordOutcome::Queued)
            }
        }
    }

    fn enqueue_mark(&self, mark: &AttendanceMark) -> Result<i64> {
        let op = QueueOp::record_attendance(
            mark.event_id.clone(),
            mark.person_id.clone(),
            mark.recorded_at,
        );
        let id = self.queue.enqueue(&op)?;
        info!(
            queue_item = id,
            event_id = %mark.event_id,
            person_id = %mark.person_id,
            "attendance queued for sync"
        );
        Ok(id)
    }

    /// Run one sync cycle: drain the queue, then refresh events and rosters.
    ///
    /// Returns `None` when a cycle was already running and this trigger was
    /// dropped. The in-progress flag is taken before the first await and
    /// released on every exit path by a guard.
    pub async fn sync_now(&self) -> Result<Option<SyncReport>> {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync trigger dropped, cycle already running");
            return Ok(None);
        }
        let _guard = SyncFlagGuard { orchestrator: self };
        self.status.send_modify(|s| s.is_syncing = true);
        info!("sync started");

        let mut report = SyncReport::default();
        self.drain_queue(&mut report).await?;
        self.refresh(&mut report).await?;

        if report.completed() {
            let now = Utc::now();
            self.store.meta_set(LAST_SYNC_META_KEY, &now.to_rfc3339())?;
            self.status.send_modify(|s| s.last_sync_time = Some(now));
            info!(
                drained = report.drained,
                pending = report.pending,
                events = report.events_refreshed,
                persons = report.persons_refreshed,
                "sync completed"
            );
        } else {
            warn!(
                error = report.refresh_error.as_deref().unwrap_or("unknown"),
                "sync finished without a refresh"
            );
        }

        Ok(Some(report))
    }

    /// Submit queued items oldest first.
    ///
    /// Stops at the first failure so submission order is preserved; the
    /// failed item and everything behind it stay queued for the next cycle.
    async fn drain_queue(&self, report: &mut SyncReport) -> Result<()> {
        for item in self.queue.pending()? {
            let QueueOp::RecordAttendance {
                event_id,
                person_id,
                recorded_at,
            } = &item.op;

            match self
                .gateway
                .submit_attendance(event_id, person_id, *recorded_at)
                .await
            {
                Ok(outcome) => {
                    self.queue.remove(item.id)?;
                    report.drained += 1;
                    info!(queue_item = item.id, outcome = ?outcome, "queued attendance submitted");
                }
                Err(e) => {
                    self.monitor
                        .observe(!matches!(e, GatewayError::Unreachable(_)));
                    warn!(queue_item = item.id, error = %e, "drain stopped");
                    report.drain_error = Some(e.to_string());
                    break;
                }
            }
        }
        report.pending = self.queue.len()?;
        Ok(())
    }

    /// Pull the authoritative event list and each event's roster into the
    /// local store. Upsert only; events absent remotely are kept.
    async fn refresh(&self, report: &mut SyncReport) -> Result<()> {
        let events = match self.gateway.list_events().await {
            Ok(events) => events,
            Err(e) => {
                self.monitor
                    .observe(!matches!(e, GatewayError::Unreachable(_)));
                report.refresh_error = Some(e.to_string());
                return Ok(());
            }
        };
        self.monitor.observe(true);

        self.store.put_events(&events)?;
        report.events_refreshed = events.len();

        for event in &events {
            match self.gateway.list_persons(&event.id).await {
                Ok(persons) => {
                    self.store.put_persons(&persons)?;
                    report.persons_refreshed += persons.len();
                }
                Err(e) => {
                    // One roster failing does not abort the cycle.
                    warn!(event_id = %event.id, error = %e, "roster refresh failed");
                }
            }
        }
        Ok(())
    }
}

/// Clears the in-progress flag when a sync cycle exits by any path.
struct SyncFlagGuard<'a, G: RemoteGateway> {
    orchestrator: &'a SyncOrchestrator<G>,
}

impl<G: RemoteGateway> Drop for SyncFlagGuard<'_, G> {
    fn drop(&mut self) {
        self.orchestrator.syncing.store(false, Ordering::Release);
        self.orchestrator.status.send_modify(|s| s.is_syncing = false);
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
