//! Broker subscribe adapter.
//!
//! Devices (or a wireless-to-broker bridge) publish JSON telemetry under
//! `<topic_prefix>/<deviceId>` topics. This adapter subscribes with a SUB
//! socket, tags each payload with the device id taken from the final topic
//! path segment, and feeds the fusion pipeline.
//!
//! Connection loss is handled by an unbounded fixed-delay reconnect loop —
//! a deliberate liveness choice, see the retry note in DESIGN.md.

use std::time::Duration;

use imuhub_config::BrokerConfig;
use imuhub_state_manager::SensorHub;
use imuhub_structures::{DeviceId, Sample};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use zeromq::{Socket, SocketRecv, SubSocket, ZmqMessage};

use crate::error::TransportResult;
use crate::status::{status_channel, ConnectionStatus};

/// JSON payload shape published on the broker.
///
/// Only the known channels are kept; unknown fields are dropped rather than
/// spread into the sample. A payload without a quaternion is a presence
/// message and never becomes a sample.
#[derive(Debug, Deserialize)]
struct BrokerPayload {
    quaternion: Option<[f64; 4]>,
    accelerometer: Option<[f64; 3]>,
    gyroscope: Option<[f64; 3]>,
    magnetometer: Option<[f64; 3]>,
    linear_acceleration: Option<[f64; 3]>,
    /// Device-reported Euler angles (degrees). Passed through when present;
    /// otherwise the fusion step reconstructs them from the quaternion.
    euler: Option<[f64; 3]>,
    calibration: Option<u8>,
}

fn narrow3(values: [f64; 3]) -> [f32; 3] {
    values.map(|value| value as f32)
}

/// Device id = final segment of the topic path.
fn device_id_from_topic(topic: &str) -> Option<DeviceId> {
    match topic.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => Some(DeviceId::from(segment)),
        _ => None,
    }
}

/// Convert a broker payload into a raw sample; `None` for presence messages.
fn sample_from_payload(payload: BrokerPayload) -> Option<Sample> {
    let quaternion = payload.quaternion?;
    let mut sample = Sample::default();
    sample.quaternion = Some(quaternion.map(|component| component as f32));
    sample.accelerometer = payload.accelerometer.map(narrow3);
    sample.gyroscope = payload.gyroscope.map(narrow3);
    sample.magnetometer = payload.magnetometer.map(narrow3);
    sample.linear_acceleration = payload.linear_acceleration.map(narrow3);
    sample.euler = payload.euler.map(narrow3);
    sample.calibration = payload.calibration;
    Some(sample)
}

/// SUB-socket adapter feeding broker telemetry into a [`SensorHub`].
pub struct BrokerSubscriber {
    config: BrokerConfig,
    hub: SensorHub,
    status: watch::Sender<ConnectionStatus>,
}

impl BrokerSubscriber {
    /// Build a subscriber for `config`, returning the adapter and the
    /// receiving end of its status channel.
    pub fn new(config: BrokerConfig, hub: SensorHub) -> (Self, watch::Receiver<ConnectionStatus>) {
        let (status, status_rx) = status_channel();
        (
            BrokerSubscriber {
                config,
                hub,
                status,
            },
            status_rx,
        )
    }

    /// The subscription string: the topic prefix, narrowed to one device when
    /// a filter is configured. SUB matching is by prefix, so the trailing
    /// slash keeps `imu/` from also matching a hypothetical `imufoo/` topic.
    fn subscription_topic(&self) -> String {
        if self.config.device_filter.is_empty() {
            format!("{}/", self.config.topic_prefix)
        } else {
            format!("{}/{}", self.config.topic_prefix, self.config.device_filter)
        }
    }

    /// Run the subscription forever.
    ///
    /// Never returns under normal operation: a lost connection publishes a
    /// status string and retries on the configured fixed delay, with no
    /// backoff and no retry cap.
    pub async fn run(mut self) -> TransportResult<()> {
        let delay = Duration::from_millis(self.config.reconnect_delay_ms);
        loop {
            if let Err(err) = self.connect_and_stream().await {
                let message = format!(
                    "Broker connection lost: {}; retrying in {:?}",
                    err, delay
                );
                info!("{}", message);
                let _ = self.status.send(ConnectionStatus::Reconnecting(message));
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn connect_and_stream(&mut self) -> TransportResult<()> {
        let mut socket = SubSocket::new();
        socket.connect(&self.config.endpoint).await?;
        let topic = self.subscription_topic();
        socket.subscribe(&topic).await?;

        let message = format!("Connected to {}", self.config.endpoint);
        info!(topic = %topic, "{}", message);
        let _ = self.status.send(ConnectionStatus::Connected(message));

        loop {
            let message = socket.recv().await?;
            self.handle_message(message);
        }
    }

    /// Decode one broker message and feed it to the pipeline. Decode
    /// problems are filtering decisions, never errors that escape here.
    fn handle_message(&self, message: ZmqMessage) {
        let frames = message.into_vec();
        if frames.len() != 2 {
            if self.hub.report_once("broker:frame-count") {
                warn!(
                    frames = frames.len(),
                    "expected multipart [topic, payload] broker messages; dropping"
                );
            }
            return;
        }

        let topic = String::from_utf8_lossy(&frames[0]).into_owned();
        let device_id = match device_id_from_topic(&topic) {
            Some(device_id) => device_id,
            None => {
                debug!(topic = %topic, "broker message without a device id segment");
                return;
            }
        };

        let payload: BrokerPayload = match serde_json::from_slice(&frames[1]) {
            Ok(payload) => payload,
            Err(err) => {
                if self.hub.report_once(format!("broker:bad-payload:{}", device_id)) {
                    warn!(device = %device_id, error = %err, "undecodable broker payload");
                }
                return;
            }
        };

        match sample_from_payload(payload) {
            Some(sample) => {
                self.hub.ingest(device_id, sample);
            }
            // Devices on the current protocol announce themselves with a
            // payload that carries no sensor data. Don't pass these on.
            None => debug!(device = %device_id, "ignoring presence message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_suffix_is_the_device_id() {
        assert_eq!(
            device_id_from_topic("imu/a4cf1291fd62"),
            Some(DeviceId::from("a4cf1291fd62"))
        );
        assert_eq!(device_id_from_topic("a4cf1291fd62"), Some(DeviceId::from("a4cf1291fd62")));
        assert_eq!(device_id_from_topic("imu/"), None);
    }

    #[test]
    fn presence_payload_yields_no_sample() {
        let payload: BrokerPayload =
            serde_json::from_str(r#"{"timestamp": 123, "temperature": 26.0}"#).unwrap();
        assert!(sample_from_payload(payload).is_none());
    }

    #[test]
    fn known_channels_are_converted_and_unknown_fields_dropped() {
        let payload: BrokerPayload = serde_json::from_str(
            r#"{
                "quaternion": [0.0, 0.0, 0.0, 1.0],
                "gyroscope": [0.5, -0.5, 0.25],
                "calibration": 3,
                "temperature": 26.0,
                "timestamp": 98765
            }"#,
        )
        .unwrap();
        let sample = sample_from_payload(payload).unwrap();
        assert_eq!(sample.quaternion, Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(sample.gyroscope, Some([0.5, -0.5, 0.25]));
        assert_eq!(sample.calibration, Some(3));
        assert!(sample.accelerometer.is_none());
    }

    #[test]
    fn device_euler_is_passed_through() {
        let payload: BrokerPayload = serde_json::from_str(
            r#"{"quaternion": [0.0, 0.0, 0.0, 1.0], "euler": [10.0, 20.0, 30.0]}"#,
        )
        .unwrap();
        let sample = sample_from_payload(payload).unwrap();
        assert_eq!(sample.euler, Some([10.0, 20.0, 30.0]));
    }

    #[test]
    fn subscription_topic_honors_the_device_filter() {
        let hub = SensorHub::new();
        let mut config = BrokerConfig::default();
        config.device_filter = "a4cf1291fd62".into();
        let (subscriber, _status) = BrokerSubscriber::new(config, hub.clone());
        assert_eq!(subscriber.subscription_topic(), "imu/a4cf1291fd62");

        let (subscriber, _status) = BrokerSubscriber::new(BrokerConfig::default(), hub);
        assert_eq!(subscriber.subscription_topic(), "imu/");
    }
}
