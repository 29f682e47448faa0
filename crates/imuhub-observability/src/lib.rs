// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for IMU Hub.
//!
//! One call at process startup wires up `tracing` with an environment-aware
//! filter; everything else in the workspace just uses the `tracing` macros.

pub mod init;

pub use init::{init_logging, LoggingGuard};
