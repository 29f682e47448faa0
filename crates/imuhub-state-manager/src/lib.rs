// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime state management for IMU Hub: the per-device state store, the
//! sample fusion step, and the consumer fan-out dispatcher.
//!
//! The central type is [`SensorHub`], the explicitly-constructed pipeline
//! context. One instance is built at process startup, handed to each
//! transport adapter, and torn down with the process — there is no
//! module-level singleton state anywhere.

pub mod consumers;
pub mod device_states;
pub mod pipeline;
pub mod reporting;

pub use consumers::{ConsumerError, ConsumerId, SensorConsumer};
pub use device_states::DeviceStateStore;
pub use pipeline::SensorHub;
pub use reporting::ReportOnce;
