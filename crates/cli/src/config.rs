// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration lives in `rollcall.toml`, resolved from `$ROLLCALL_CONFIG`
//! first and the platform config directory second (e.g.
//! `~/.config/rollcall/rollcall.toml`). A missing file yields defaults, so
//! the tool works out of the box against a local server.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const CONFIG_ENV_VAR: &str = "ROLLCALL_CONFIG";
const CONFIG_FILE_NAME: &str = "rollcall.toml";
const APP_DIR_NAME: &str = "rollcall";
const DB_FILE_NAME: &str = "rollcall.db";

/// Keys accepted by `rollcall config get/set`, in display order.
pub const CONFIG_KEYS: [&str; 5] = [
    "server.base_url",
    "server.timeout_secs",
    "storage.db_path",
    "sync.interval_secs",
    "sync.probe_interval_secs",
];

/// Client configuration stored in `rollcall.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Remote server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the attendance server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds for gateway calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

/// Sync engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Seconds between periodic sync cycles while online (default: 60).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds between connectivity probes in the engine loop (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    60
}

fn default_probe_interval_secs() -> u64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval_secs: default_interval_secs(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

impl ServerConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SyncConfig {
    /// Periodic sync interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Connectivity probe interval as a [`Duration`].
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

impl Config {
    /// Loads configuration from the given file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Loads configuration from the given path, falling back to defaults
    /// when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Config::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Saves configuration to the given file path, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolves the database path: the configured one, else the platform
    /// data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = dirs::data_dir().ok_or_else(|| {
                    Error::Config("could not determine data directory".to_string())
                })?;
                Ok(data_dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
            }
        }
    }

    /// Returns the effective value for a dotted config key.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "server.base_url" => Ok(self.server.base_url.clone()),
            "server.timeout_secs" => Ok(self.server.timeout_secs.to_string()),
            "storage.db_path" => Ok(self.db_path()?.display().to_string()),
            "sync.interval_secs" => Ok(self.sync.interval_secs.to_string()),
            "sync.probe_interval_secs" => Ok(self.sync.probe_interval_secs.to_string()),
            _ => Err(Error::UnknownConfigKey(key.to_string())),
        }
    }

    /// Sets a dotted config key from its string representation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.base_url" => {
                self.server.base_url = value.trim_end_matches('/').to_string();
            }
            "server.timeout_secs" => {
                self.server.timeout_secs = parse_secs(key, value)?;
            }
            "storage.db_path" => {
                self.storage.db_path = Some(PathBuf::from(value));
            }
            "sync.interval_secs" => {
                self.sync.interval_secs = parse_secs(key, value)?;
            }
            "sync.probe_interval_secs" => {
                self.sync.probe_interval_secs = parse_secs(key, value)?;
            }
            _ => return Err(Error::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("invalid value for {}: '{}'", key, value)))
}

/// Resolves the active config file path: `$ROLLCALL_CONFIG` if set, else
/// the platform config directory.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;
    Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
