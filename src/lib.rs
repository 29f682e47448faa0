//! # IMU Hub - real-time wearable IMU telemetry ingestion, fusion, and fan-out
//!
//! IMU Hub ingests inertial telemetry from wearable/handheld sensor devices
//! over a local wireless notify link or a publish-subscribe broker,
//! normalizes every reading into a canonical per-device state record, and
//! fans fused samples out to registered consumers (3D visualizers,
//! dashboards, charts).
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! imuhub = "0.0.1-beta.3"  # Default: both transports
//! ```
//!
//! ```rust,no_run
//! use imuhub::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = imuhub::config::load_config(None)?;
//! let hub = SensorHub::new();
//!
//! hub.add_consumer(
//!     |record: &DeviceRecord, all: &DeviceMap| -> Result<(), ConsumerError> {
//!         println!("{}: {:?} ({} devices)", record.device_id, record.latest.euler, all.len());
//!         Ok(())
//!     },
//! );
//!
//! let (subscriber, _status) = BrokerSubscriber::new(config.broker, hub.clone());
//! subscriber.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - **`transport-broker`** (default): pub-sub broker SUB adapter
//! - **`transport-wireless`** (default): wireless notify-link adapter
//! - **`file-logging`**: rotate logs to disk in addition to the console
//!
//! ## Architecture
//!
//! Transport adapter -> binary frame / JSON decode -> quaternion validity
//! filter -> orientation enrichment -> device state store -> fan-out
//! dispatcher -> consumers. The whole pipeline is event-driven on one tokio
//! runtime; fusion and dispatch run to completion per message.

pub use imuhub_config as config;
pub use imuhub_observability as observability;
pub use imuhub_serialization as serialization;
pub use imuhub_state_manager as state_manager;
pub use imuhub_structures as structures;

#[cfg(any(feature = "transport-broker", feature = "transport-wireless"))]
pub use imuhub_io as io;

/// Convenience re-exports for the common case.
pub mod prelude {
    pub use imuhub_config::HubConfig;
    pub use imuhub_serialization::{decode_sensor_frame, encode_sensor_frame};
    pub use imuhub_state_manager::{ConsumerError, ConsumerId, SensorConsumer, SensorHub};
    pub use imuhub_structures::spatial::{
        euler_to_quat, is_valid_quaternion, quat_to_euler, quat_to_matrix,
    };
    pub use imuhub_structures::{DeviceId, DeviceMap, DeviceRecord, Sample, SensorDataError};

    #[cfg(feature = "transport-broker")]
    pub use imuhub_io::BrokerSubscriber;
    #[cfg(any(feature = "transport-broker", feature = "transport-wireless"))]
    pub use imuhub_io::ConnectionStatus;
    #[cfg(feature = "transport-wireless")]
    pub use imuhub_io::{WirelessAdapter, WirelessEvent, WirelessLink};
}
