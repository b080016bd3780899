// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use rollcall_core::{Event, LocalStore, OfflineQueue, Person};

use super::connectivity::{ConnectivityEvent, ConnectivityMonitor};
use super::gateway::{GatewayError, GatewayResult, RemoteGateway, SubmitOutcome};
use super::orchestrator::SyncOrchestrator;

/// Create a test event with the given id and name.
pub fn test_event(id: &str, name: &str) -> Event {
    Event::new(id.to_string(), name.to_string(), Utc::now())
}

/// Create a test person registered for the given event.
pub fn test_person(id: &str, name: &str, event_id: &str) -> Person {
    Person {
        id: id.to_string(),
        name: name.to_string(),
        credential_number: format!("C-{}", id),
        dni: format!("D-{}", id),
        email: format!("{}@example.com", id),
        event_id: event_id.to_string(),
    }
}

/// Open an orchestrator over a database file in the given directory.
///
/// Returns the connectivity event receiver alongside so tests can assert
/// on transitions. The monitor starts offline.
pub fn open_orchestrator(
    dir: &Path,
    gateway: MockGateway,
) -> (
    SyncOrchestrator<MockGateway>,
    mpsc::Receiver<ConnectivityEvent>,
) {
    let db_path = dir.join("rollcall.db");
    let store = LocalStore::open(&db_path).unwrap();
    let queue = OfflineQueue::open(&db_path).unwrap();
    let (monitor, rx) = ConnectivityMonitor::new();
    let orchestrator = SyncOrchestrator::new(store, queue, gateway, monitor).unwrap();
    (orchestrator, rx)
}

/// In-memory stand-in for the attendance server.
///
/// Clones share state, so a test can keep a handle while the orchestrator
/// owns another. Attendance submissions land in a set; resubmitting an
/// accepted pair answers [`SubmitOutcome::AlreadyRecorded`], matching the
/// server's duplicate handling.
#[derive(Clone)]
pub struct MockGateway {
    state: Arc<MockState>,
}

struct MockState {
    online: AtomicBool,
    fail_events: AtomicBool,
    events: Mutex<Vec<Event>>,
    persons: Mutex<HashMap<String, Vec<Person>>>,
    accepted: Mutex<HashSet<(String, String)>>,
    failing_pairs: Mutex<HashSet<(String, String)>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    /// Create a reachable mock with no data.
    pub fn new() -> Self {
        MockGateway {
            state: Arc::new(MockState {
                online: AtomicBool::new(true),
                fail_events: AtomicBool::new(false),
                events: Mutex::new(Vec::new()),
                persons: Mutex::new(HashMap::new()),
                accepted: Mutex::new(HashSet::new()),
                failing_pairs: Mutex::new(HashSet::new()),
                delay: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Toggle reachability. While unreachable every call fails and the
    /// probe answers false.
    pub fn set_online(&self, online: bool) {
        self.state.online.store(online, Ordering::SeqCst);
    }

    /// Make `list_events` fail with a server error.
    pub fn set_fail_events(&self, fail: bool) {
        self.state.fail_events.store(fail, Ordering::SeqCst);
    }

    /// Add an event to the server's list.
    pub fn add_event(&self, event: Event) {
        self.state.events.lock().unwrap().push(event);
    }

    /// Set the roster for an event.
    pub fn set_persons(&self, event_id: &str, persons: Vec<Person>) {
        self.state
            .persons
            .lock()
            .unwrap()
            .insert(event_id.to_string(), persons);
    }

    /// Pretend the server already has a mark for this pair, as if an
    /// earlier submission succeeded.
    pub fn preseed_accepted(&self, event_id: &str, person_id: &str) {
        self.state
            .accepted
            .lock()
            .unwrap()
            .insert((event_id.to_string(), person_id.to_string()));
    }

    /// Make submissions for this pair fail with a server error.
    pub fn fail_pair(&self, event_id: &str, person_id: &str) {
        self.state
            .failing_pairs
            .lock()
            .unwrap()
            .insert((event_id.to_string(), person_id.to_string()));
    }

    /// Let previously failing pairs succeed again.
    pub fn clear_failing_pairs(&self) {
        self.state.failing_pairs.lock().unwrap().clear();
    }

    /// Delay every call by the given duration.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    /// True if the server holds a mark for the pair.
    pub fn accepted(&self, event_id: &str, person_id: &str) -> bool {
        self.state
            .accepted
            .lock()
            .unwrap()
            .contains(&(event_id.to_string(), person_id.to_string()))
    }

    /// Number of marks the server holds.
    pub fn accepted_len(&self) -> usize {
        self.state.accepted.lock().unwrap().len()
    }

    /// Every call made against the mock, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Count calls whose label starts with the given prefix.
    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

async fn maybe_delay(state: &MockState) {
    let delay = *state.delay.lock().unwrap();
    if let Some(duration) = delay {
        tokio::time::sleep(duration).await;
    }
}

impl RemoteGateway for MockGateway {
    fn list_events(&self) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<Event>>> + Send + '_>> {
        let state = self.state.clone();
        Box::pin(async move {
            maybe_delay(&state).await;
            state.calls.lock().unwrap().push("list_events".to_string());
            if !state.online.load(Ordering::SeqCst) {
                return Err(GatewayError::Unreachable("mock offline".to_string()));
            }
            if state.fail_events.load(Ordering::SeqCst) {
                return Err(GatewayError::Rejected {
                    status: 500,
                    message: "simulated failure".to_string(),
                });
            }
            Ok(state.events.lock().unwrap().clone())
        })
    }

    fn list_persons(
        &self,
        event_id: &str,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<Person>>> + Send + '_>> {
        let state = self.state.clone();
        let event_id = event_id.to_string();
        Box::pin(async move {
            maybe_delay(&state).await;
            state
                .calls
                .lock()
                .unwrap()
                .push(format!("list_persons {}", event_id));
            if !state.online.load(Ordering::SeqCst) {
                return Err(GatewayError::Unreachable("mock offline".to_string()));
            }
            match state.persons.lock().unwrap().get(&event_id) {
                Some(persons) => Ok(persons.clone()),
                None => Ok(Vec::new()),
            }
        })
    }

    fn submit_attendance(
        &self,
        event_id: &str,
        person_id: &str,
        _recorded_at: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<SubmitOutcome>> + Send + '_>> {
        let state = self.state.clone();
        let event_id = event_id.to_string();
        let person_id = person_id.to_string();
        Box::pin(async move {
            maybe_delay(&state).await;
            state
                .calls
                .lock()
                .unwrap()
                .push(format!("submit {}/{}", event_id, person_id));
            if !state.online.load(Ordering::SeqCst) {
                return Err(GatewayError::Unreachable("mock offline".to_string()));
            }
            let pair = (event_id, person_id);
            if state.failing_pairs.lock().unwrap().contains(&pair) {
                return Err(GatewayError::Rejected {
                    status: 500,
                    message: "simulated failure".to_string(),
                });
            }
            if state.accepted.lock().unwrap().insert(pair) {
                Ok(SubmitOutcome::Recorded)
            } else {
                Ok(SubmitOutcome::AlreadyRecorded)
            }
        })
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let state = self.state.clone();
        Box::pin(async move {
            maybe_delay(&state).await;
            state.calls.lock().unwrap().push("probe".to_string());
            state.online.load(Ordering::SeqCst)
        })
    }
}
