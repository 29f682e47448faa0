//! Wireless notify adapter.
//!
//! Sensor devices expose two GATT services over the short-range link: an
//! identity service (hardware address, mutable display name) and an IMU
//! service (binary sensor frames by notification, plus a one-byte
//! calibration characteristic with its own change notifications).
//!
//! This module owns the protocol framing only. Scanning, pairing, and GATT
//! session management are connection plumbing and live behind the
//! [`WirelessLink`] trait, implemented by whatever backend drives the radio.

use std::time::Duration;

use imuhub_config::WirelessConfig;
use imuhub_serialization::decode_sensor_frame;
use imuhub_state_manager::SensorHub;
use imuhub_structures::{DeviceId, SensorDataError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::{TransportError, TransportResult};
use crate::status::{status_channel, ConnectionStatus};

/// Identity service: hardware address and display name.
pub const IDENTITY_SERVICE_UUID: &str = "709f0001-37e3-439e-a338-23f00067988b";
pub const DEVICE_ID_CHAR_UUID: &str = "709f0002-37e3-439e-a338-23f00067988b";
pub const DEVICE_NAME_CHAR_UUID: &str = "709f0003-37e3-439e-a338-23f00067988b";

/// IMU service: sensor frames and the calibration side channel.
pub const IMU_SERVICE_UUID: &str = "509b0001-ebe1-4aa5-bc51-11004b78d5cb";
pub const SENSOR_CHAR_UUID: &str = "509b0002-ebe1-4aa5-bc51-11004b78d5cb";
pub const CALIBRATION_CHAR_UUID: &str = "509b0003-ebe1-4aa5-bc51-11004b78d5cb";

/// Notification delivered by a [`WirelessLink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WirelessEvent {
    /// A binary sensor frame from the IMU characteristic.
    SensorFrame(Vec<u8>),
    /// The calibration characteristic changed.
    CalibrationChanged(u8),
    /// The device name characteristic changed.
    NameChanged(String),
    /// The link dropped; the adapter will reconnect.
    LinkDown(String),
}

/// One connected wireless device, as seen by the adapter.
///
/// Implementations wrap a concrete radio/GATT backend. Characteristic reads
/// and writes are synchronous; notifications arrive on the channel returned
/// by [`WirelessLink::subscribe`].
pub trait WirelessLink: Send {
    /// The MAC-like hardware address string (identity service).
    fn device_id(&self) -> TransportResult<String>;

    /// The current display name (identity service).
    fn device_name(&self) -> TransportResult<String>;

    /// Write a new display name to the device.
    fn write_device_name(&mut self, name: &str) -> TransportResult<()>;

    /// Read the calibration byte; 0 = uncalibrated.
    fn read_calibration(&self) -> TransportResult<u8>;

    /// Start notifications, returning the event stream for this session.
    /// `event_capacity` bounds the channel between the radio backend and the
    /// adapter.
    fn subscribe(&mut self, event_capacity: usize) -> TransportResult<mpsc::Receiver<WirelessEvent>>;

    /// Re-establish a dropped session.
    fn reconnect(&mut self) -> TransportResult<()>;
}

/// Adapter pumping one wireless device's notifications into a [`SensorHub`].
pub struct WirelessAdapter<L: WirelessLink> {
    link: L,
    config: WirelessConfig,
    hub: SensorHub,
    status: watch::Sender<ConnectionStatus>,
}

impl<L: WirelessLink> WirelessAdapter<L> {
    /// Build an adapter over `link`, returning it together with the
    /// receiving end of its status channel.
    pub fn new(
        link: L,
        config: WirelessConfig,
        hub: SensorHub,
    ) -> (Self, watch::Receiver<ConnectionStatus>) {
        let (status, status_rx) = status_channel();
        (
            WirelessAdapter {
                link,
                config,
                hub,
                status,
            },
            status_rx,
        )
    }

    /// Rename the device, on the device itself and in the state store.
    pub fn set_device_name(&mut self, name: &str) -> TransportResult<()> {
        self.link.write_device_name(name)?;
        let device_id = DeviceId::from(self.link.device_id()?);
        self.hub.set_device_name(&device_id, name);
        Ok(())
    }

    /// Run the adapter forever: stream one session, then reconnect on the
    /// configured fixed delay (no backoff, no retry cap) when it drops.
    pub async fn run(mut self) -> TransportResult<()> {
        let delay = Duration::from_millis(self.config.reconnect_delay_ms);
        loop {
            if let Err(err) = self.session().await {
                let message = format!(
                    "Wireless connection lost: {}; retrying in {:?}",
                    err, delay
                );
                info!("{}", message);
                let _ = self.status.send(ConnectionStatus::Reconnecting(message));
            }
            tokio::time::sleep(delay).await;
            while let Err(err) = self.link.reconnect() {
                debug!(error = %err, "wireless reconnect attempt failed");
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// One connected session: read identity and calibration, then pump
    /// notifications until the link drops.
    async fn session(&mut self) -> TransportResult<()> {
        let device_id = DeviceId::from(self.link.device_id()?);
        let mut device_name = self.link.device_name().ok();
        let mut calibration = self.link.read_calibration()?;
        let mut events = self.link.subscribe(self.config.event_capacity)?;

        let message = format!("Connected to device {}", device_id);
        info!(calibration, "{}", message);
        let _ = self.status.send(ConnectionStatus::Connected(message));

        // The record only exists once the device produces a valid sample;
        // the cached name is pushed into the store right after that.
        let mut name_synced = false;

        while let Some(event) = events.recv().await {
            match event {
                WirelessEvent::SensorFrame(bytes) => match decode_sensor_frame(&bytes) {
                    Ok(mut sample) => {
                        sample.calibration = Some(calibration);
                        let accepted = self.hub.ingest(device_id.clone(), sample);
                        if accepted && !name_synced {
                            if let Some(name) = &device_name {
                                self.hub.set_device_name(&device_id, name);
                            }
                            name_synced = true;
                        }
                    }
                    Err(SensorDataError::UnsupportedVersion(version)) => {
                        if self
                            .hub
                            .report_once(format!("wireless:unsupported-version:{}", version))
                        {
                            warn!(
                                device = %device_id,
                                version,
                                "device sends a newer frame version; upgrade the hub to read it"
                            );
                        }
                    }
                    Err(err) => {
                        debug!(device = %device_id, error = %err, "discarding undecodable frame");
                    }
                },
                WirelessEvent::CalibrationChanged(value) => {
                    debug!(device = %device_id, calibration = value, "calibration changed");
                    calibration = value;
                }
                WirelessEvent::NameChanged(name) => {
                    if self.hub.set_device_name(&device_id, &name) {
                        name_synced = true;
                    }
                    device_name = Some(name);
                }
                WirelessEvent::LinkDown(reason) => {
                    return Err(TransportError::Lost(reason));
                }
            }
        }
        Err(TransportError::Lost("event channel closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imuhub_serialization::encode_sensor_frame;
    use imuhub_structures::Sample;

    struct MockLink {
        events: Option<mpsc::Receiver<WirelessEvent>>,
        calibration: u8,
    }

    impl MockLink {
        fn new(calibration: u8) -> (Self, mpsc::Sender<WirelessEvent>) {
            let (tx, rx) = mpsc::channel(16);
            (
                MockLink {
                    events: Some(rx),
                    calibration,
                },
                tx,
            )
        }
    }

    impl WirelessLink for MockLink {
        fn device_id(&self) -> TransportResult<String> {
            Ok("a4cf1291fd62".to_string())
        }

        fn device_name(&self) -> TransportResult<String> {
            Ok("wrist-left".to_string())
        }

        fn write_device_name(&mut self, _name: &str) -> TransportResult<()> {
            Ok(())
        }

        fn read_calibration(&self) -> TransportResult<u8> {
            Ok(self.calibration)
        }

        fn subscribe(&mut self, _event_capacity: usize) -> TransportResult<mpsc::Receiver<WirelessEvent>> {
            self.events
                .take()
                .ok_or_else(|| TransportError::Link("already subscribed".to_string()))
        }

        fn reconnect(&mut self) -> TransportResult<()> {
            Err(TransportError::Link("mock link cannot reconnect".to_string()))
        }
    }

    fn quat_frame() -> Vec<u8> {
        let mut sample = Sample::default();
        sample.quaternion = Some([0.0, 0.0, 0.0, 1.0]);
        encode_sensor_frame(&sample, 0)
    }

    async fn wait_for<F: Fn() -> bool>(predicate: F) {
        for _ in 0..200 {
            if predicate() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn frames_flow_into_the_hub_with_calibration_attached() {
        let (link, events) = MockLink::new(2);
        let hub = SensorHub::new();
        let (adapter, _status) = WirelessAdapter::new(link, WirelessConfig::default(), hub.clone());
        let task = tokio::spawn(adapter.run());

        events
            .send(WirelessEvent::SensorFrame(quat_frame()))
            .await
            .unwrap();
        wait_for(|| hub.device_count() == 1).await;

        let snapshot = hub.snapshot();
        let record = &snapshot[&DeviceId::from("a4cf1291fd62")];
        assert_eq!(record.latest.calibration, Some(2));
        assert_eq!(record.device_name.as_deref(), Some("wrist-left"));

        task.abort();
    }

    #[tokio::test]
    async fn calibration_changes_apply_to_subsequent_samples() {
        let (link, events) = MockLink::new(0);
        let hub = SensorHub::new();
        let (adapter, _status) = WirelessAdapter::new(link, WirelessConfig::default(), hub.clone());
        let task = tokio::spawn(adapter.run());

        events
            .send(WirelessEvent::SensorFrame(quat_frame()))
            .await
            .unwrap();
        wait_for(|| hub.device_count() == 1).await;

        events
            .send(WirelessEvent::CalibrationChanged(3))
            .await
            .unwrap();
        events
            .send(WirelessEvent::SensorFrame(quat_frame()))
            .await
            .unwrap();
        wait_for(|| {
            hub.snapshot()[&DeviceId::from("a4cf1291fd62")]
                .latest
                .calibration
                == Some(3)
        })
        .await;

        task.abort();
    }

    #[tokio::test]
    async fn unsupported_version_frames_are_skipped() {
        let (link, events) = MockLink::new(0);
        let hub = SensorHub::new();
        let (adapter, _status) = WirelessAdapter::new(link, WirelessConfig::default(), hub.clone());
        let task = tokio::spawn(adapter.run());

        let mut frame = quat_frame();
        frame[0] = 9;
        events
            .send(WirelessEvent::SensorFrame(frame))
            .await
            .unwrap();
        events
            .send(WirelessEvent::SensorFrame(quat_frame()))
            .await
            .unwrap();

        // The good frame still lands even though the bad one preceded it.
        wait_for(|| hub.device_count() == 1).await;

        task.abort();
    }

    #[tokio::test]
    async fn name_changes_update_the_record() {
        let (link, events) = MockLink::new(0);
        let hub = SensorHub::new();
        let (adapter, _status) = WirelessAdapter::new(link, WirelessConfig::default(), hub.clone());
        let task = tokio::spawn(adapter.run());

        events
            .send(WirelessEvent::SensorFrame(quat_frame()))
            .await
            .unwrap();
        wait_for(|| hub.device_count() == 1).await;

        events
            .send(WirelessEvent::NameChanged("racket".to_string()))
            .await
            .unwrap();
        wait_for(|| {
            hub.snapshot()[&DeviceId::from("a4cf1291fd62")]
                .device_name
                .as_deref()
                == Some("racket")
        })
        .await;

        task.abort();
    }
}
