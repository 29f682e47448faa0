// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration loading for IMU Hub.
//!
//! Configuration comes from `imu_hub.toml` with two override tiers applied
//! on top:
//! 1. TOML file (base defaults)
//! 2. `IMU_HUB_*` environment variables (runtime overrides)
//!
//! See [`loader::load_config`] for the search order and override rules.

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{find_config_file, load_config};
pub use types::{BrokerConfig, HubConfig, LoggingConfig, PipelineConfig, WirelessConfig};
pub use validation::validate_config;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while locating, parsing, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
