// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor for the sync engine.
//!
//! Reachability observations arrive from probe results and from gateway
//! call outcomes. The monitor keeps the current boolean state and emits an
//! edge-triggered event on every transition; repeated observations of the
//! same state emit nothing. There is no debouncing.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::info;

/// A connectivity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// The server became reachable.
    BecameOnline,
    /// The server became unreachable.
    BecameOffline,
}

/// Tracks whether the remote server is currently reachable.
pub struct ConnectivityMonitor {
    online: AtomicBool,
    events: mpsc::Sender<ConnectivityEvent>,
}

impl ConnectivityMonitor {
    /// Create a monitor starting offline, plus the receiver for its
    /// transition events.
    pub fn new() -> (Self, mpsc::Receiver<ConnectivityEvent>) {
        let (events, rx) = mpsc::channel(16);
        let monitor = ConnectivityMonitor {
            online: AtomicBool::new(false),
            events,
        };
        (monitor, rx)
    }

    /// Current reachability state.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Record a reachability observation.
    ///
    /// Returns the transition event when the state flipped, `None` when the
    /// observation matched the current state. The event is also forwarded
    /// to the receiver; if nobody is listening it is simply dropped.
    pub fn observe(&self, online: bool) -> Option<ConnectivityEvent> {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous == online {
            return None;
        }

        let event = if online {
            ConnectivityEvent::BecameOnline
        } else {
            ConnectivityEvent::BecameOffline
        };
        info!(online, "connectivity changed");
        let _ = self.events.try_send(event);
        Some(event)
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
