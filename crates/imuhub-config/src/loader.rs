// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Implements the two-tier loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{validate_config, ConfigError, ConfigResult, HubConfig};

/// Name of the configuration file searched for on disk.
pub const CONFIG_FILE_NAME: &str = "imu_hub.toml";

/// Environment variable naming an explicit config file location.
pub const CONFIG_PATH_ENV: &str = "IMU_HUB_CONFIG_PATH";

/// Find the IMU Hub configuration file.
///
/// Search order:
/// 1. `IMU_HUB_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Parent directories (up to 5 levels, for workspace layouts)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file exists in any
/// location.
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration, applying environment overrides and validating.
///
/// If `config_path` is `None` the file is searched for (see
/// [`find_config_file`]); if no file exists anywhere, built-in defaults are
/// used so the hub can run with zero setup.
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<HubConfig> {
    let mut config = match config_path {
        Some(path) => parse_file(path)?,
        None => match find_config_file() {
            Ok(found) => parse_file(&found)?,
            Err(ConfigError::FileNotFound(_)) => HubConfig::default(),
            Err(other) => return Err(other),
        },
    };

    apply_environment_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> ConfigResult<HubConfig> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `IMU_HUB_*` environment variable overrides.
fn apply_environment_overrides(config: &mut HubConfig) {
    if let Ok(endpoint) = env::var("IMU_HUB_BROKER_ENDPOINT") {
        config.broker.endpoint = endpoint;
    }
    if let Ok(prefix) = env::var("IMU_HUB_TOPIC_PREFIX") {
        config.broker.topic_prefix = prefix;
    }
    if let Ok(filter) = env::var("IMU_HUB_DEVICE_FILTER") {
        config.broker.device_filter = filter;
    }
    if let Ok(delay) = env::var("IMU_HUB_RECONNECT_DELAY_MS") {
        if let Ok(parsed) = delay.parse() {
            config.broker.reconnect_delay_ms = parsed;
        }
    }
    if let Ok(level) = env::var("IMU_HUB_LOG_LEVEL") {
        config.logging.level = level;
    }
}
