//! Core data structures for IMU Hub.
//!
//! This is the foundation crate: it defines the canonical per-device state
//! types (`Sample`, `DeviceRecord`, `DeviceMap`), the shared error type, and
//! the pure spatial math used to derive orientation matrices and Euler angles
//! from device quaternions. It performs no I/O.

pub mod device;
pub mod error;
pub mod sample;
pub mod spatial;

pub use device::{DeviceId, DeviceMap, DeviceRecord};
pub use error::{SensorDataError, SensorDataResult};
pub use sample::Sample;
