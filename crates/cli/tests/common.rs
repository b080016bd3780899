// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use chrono::Utc;
use rollcall_core::{Event, LocalStore, OfflineQueue, Person};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A temp directory holding the config file and database for one test.
///
/// The config points at a server nothing listens on, so every command runs
/// against the local cache and queues instead of syncing.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self::with_base_url("http://127.0.0.1:9")
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("rollcall.db");
        let config = format!(
            "[server]\nbase_url = \"{}\"\ntimeout_secs = 1\n\n[storage]\ndb_path = \"{}\"\n",
            base_url,
            db_path.display()
        );
        std::fs::write(dir.path().join("rollcall.toml"), config).unwrap();
        TestHome { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("rollcall.toml")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("rollcall.db")
    }

    /// A `rollcall` command wired to this home's config.
    pub fn rollcall(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rollcall");
        cmd.env("ROLLCALL_CONFIG", self.config_path());
        cmd
    }

    /// Seed an event and its roster directly into the local store.
    pub fn seed_event(&self, event_id: &str, name: &str, person_ids: &[&str]) {
        let store = LocalStore::open(&self.db_path()).unwrap();
        store
            .put_event(&Event::new(
                event_id.to_string(),
                name.to_string(),
                Utc::now(),
            ))
            .unwrap();
        for pid in person_ids {
            store
                .put_person(&Person {
                    id: (*pid).to_string(),
                    name: format!("Person {}", pid),
                    credential_number: format!("C-{}", pid),
                    dni: format!("D-{}", pid),
                    email: format!("{}@example.com", pid),
                    event_id: event_id.to_string(),
                })
                .unwrap();
        }
    }

    /// Number of items currently queued.
    pub fn queue_len(&self) -> usize {
        let queue = OfflineQueue::open(&self.db_path()).unwrap();
        queue.len().unwrap()
    }
}
