// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation

use crate::{ConfigError, ConfigResult, HubConfig};

/// Validate a loaded configuration before the hub starts.
pub fn validate_config(config: &HubConfig) -> ConfigResult<()> {
    let broker = &config.broker;
    if broker.endpoint.is_empty() {
        return Err(ConfigError::Invalid("broker.endpoint must not be empty".into()));
    }
    if !(broker.endpoint.starts_with("tcp://") || broker.endpoint.starts_with("ipc://")) {
        return Err(ConfigError::Invalid(format!(
            "broker.endpoint must use tcp:// or ipc://, got '{}'",
            broker.endpoint
        )));
    }
    if broker.topic_prefix.is_empty() {
        return Err(ConfigError::Invalid(
            "broker.topic_prefix must not be empty".into(),
        ));
    }
    if broker.topic_prefix.contains('/') {
        return Err(ConfigError::Invalid(
            "broker.topic_prefix must be a single path segment".into(),
        ));
    }
    if broker.reconnect_delay_ms == 0 {
        return Err(ConfigError::Invalid(
            "broker.reconnect_delay_ms must be greater than zero".into(),
        ));
    }
    if config.wireless.event_capacity == 0 {
        return Err(ConfigError::Invalid(
            "wireless.event_capacity must be greater than zero".into(),
        ));
    }
    if config.wireless.reconnect_delay_ms == 0 {
        return Err(ConfigError::Invalid(
            "wireless.reconnect_delay_ms must be greater than zero".into(),
        ));
    }
    Ok(())
}
