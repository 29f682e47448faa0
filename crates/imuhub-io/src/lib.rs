//! Transport adapters for IMU Hub.
//!
//! Two ways telemetry reaches the fusion pipeline:
//!
//! - [`broker`]: a SUB socket on a publish-subscribe endpoint, where devices
//!   (or a link-to-broker bridge) publish JSON payloads under
//!   `imu/<deviceId>` topics.
//! - [`wireless`]: a short-range notify link speaking the device's GATT
//!   protocol; the connection plumbing lives behind the
//!   [`wireless::WirelessLink`] trait, this crate owns the protocol framing.
//!
//! Both adapters are thin: they tag raw payloads with a device id, decode
//! them, and hand them to [`imuhub_state_manager::SensorHub::ingest`]. Lost
//! connections are retried forever on a fixed delay, and surfaced to display
//! code only as a human-readable [`ConnectionStatus`] string.

#[cfg(feature = "broker-transport")]
pub mod broker;
pub mod error;
pub mod status;
#[cfg(feature = "wireless-transport")]
pub mod wireless;

#[cfg(feature = "broker-transport")]
pub use broker::BrokerSubscriber;
pub use error::{TransportError, TransportResult};
pub use status::{status_channel, ConnectionStatus};
#[cfg(feature = "wireless-transport")]
pub use wireless::{WirelessAdapter, WirelessEvent, WirelessLink};
