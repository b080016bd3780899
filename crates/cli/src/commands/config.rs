// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::ConfigCommand;
use crate::config::{config_path, Config, CONFIG_KEYS};
use crate::error::Result;

use super::load_config;

/// Execute a config subcommand.
pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Get { key } => get(key.as_deref()),
        ConfigCommand::Set { key, value } => set(&key, &value),
        ConfigCommand::Path => {
            println!("{}", config_path()?.display());
            Ok(())
        }
    }
}

/// Show one setting, or all of them when no key is given.
fn get(key: Option<&str>) -> Result<()> {
    let config = load_config()?;
    match key {
        Some(key) => println!("{}", config.get(key)?),
        None => {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    Ok(())
}

/// Change a setting and persist the config file.
fn set(key: &str, value: &str) -> Result<()> {
    let path = config_path()?;
    let mut config = Config::load_or_default(&path)?;
    config.set(key, value)?;
    config.save(&path)?;
    println!("Set {} = {}", key, config.get(key)?);
    Ok(())
}
