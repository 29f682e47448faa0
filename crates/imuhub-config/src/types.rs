// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! These structs map to sections in `imu_hub.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HubConfig {
    pub broker: BrokerConfig,
    pub wireless: WirelessConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// Broker subscription configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Endpoint of the telemetry publisher, e.g. `tcp://127.0.0.1:5580`.
    pub endpoint: String,
    /// Topic prefix devices publish under; the final path segment is the
    /// device id.
    pub topic_prefix: String,
    /// Restrict the subscription to a single device id. Empty = all devices.
    pub device_filter: String,
    /// Fixed delay between reconnection attempts after a lost connection.
    /// There is deliberately no backoff and no retry cap.
    pub reconnect_delay_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            endpoint: "tcp://127.0.0.1:5580".to_string(),
            topic_prefix: "imu".to_string(),
            device_filter: String::new(),
            reconnect_delay_ms: 1000,
        }
    }
}

/// Wireless (notify link) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WirelessConfig {
    /// Capacity of the notify event channel between the link and the adapter.
    pub event_capacity: usize,
    /// Fixed delay between reconnection attempts after the link drops.
    pub reconnect_delay_ms: u64,
}

impl Default for WirelessConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Fusion pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Hint for consumers: a device whose last sample is older than this is
    /// considered stale. The pipeline itself never expires records.
    pub stale_after_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { stale_after_ms: 2000 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable via `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
