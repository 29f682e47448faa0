//! Workspace integration tests: frame decode -> fusion -> fan-out, driven
//! through the public umbrella API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use imuhub::io::TransportResult;
use imuhub::prelude::*;
use tokio::sync::mpsc;

fn quat_sample(quat: [f32; 4]) -> Sample {
    Sample {
        quaternion: Some(quat),
        ..Sample::default()
    }
}

#[test]
fn decoded_frames_fuse_and_fan_out() {
    let hub = SensorHub::new();
    let seen: Arc<Mutex<Vec<DeviceRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    hub.add_consumer(
        move |record: &DeviceRecord, _all: &DeviceMap| -> Result<(), ConsumerError> {
            sink.lock().map_err(|e| e.to_string())?.push(record.clone());
            Ok(())
        },
    );

    let mut sample = Sample::default();
    sample.quaternion = Some([0.0, 0.0, 0.0, 1.0]);
    sample.accelerometer = Some([0.0, 0.0, 9.81]);
    let bytes = encode_sensor_frame(&sample, 7);

    let decoded = decode_sensor_frame(&bytes).expect("valid frame");
    assert!(hub.ingest(DeviceId::from("it-dev"), decoded));

    let seen = seen.lock().expect("no poisoned lock");
    assert_eq!(seen.len(), 1);
    let record = &seen[0];
    assert_eq!(record.latest.quaternion, Some([0.0, 0.0, 0.0, 1.0]));
    assert_eq!(record.latest.accelerometer, Some([0.0, 0.0, 9.81]));
    assert!(record.latest.orientation_matrix.is_some());
    assert!(record.latest.euler.is_some());
    assert!(record.latest.received_at.is_some());
}

#[test]
fn garbage_quaternions_never_reach_consumers() {
    let hub = SensorHub::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    hub.add_consumer(
        move |_: &DeviceRecord, _: &DeviceMap| -> Result<(), ConsumerError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    );

    assert!(!hub.ingest(DeviceId::from("it-dev"), quat_sample([1.0, 1.0, 1.0, 1.0])));
    assert!(!hub.ingest(DeviceId::from("it-dev"), Sample::default()));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(hub.device_count(), 0);
}

#[test]
fn consumers_see_the_full_device_map() {
    let hub = SensorHub::new();
    let map_sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = map_sizes.clone();
    hub.add_consumer(
        move |_: &DeviceRecord, all: &DeviceMap| -> Result<(), ConsumerError> {
            sink.lock().map_err(|e| e.to_string())?.push(all.len());
            Ok(())
        },
    );

    hub.ingest(DeviceId::from("dev-a"), quat_sample([0.0, 0.0, 0.0, 1.0]));
    hub.ingest(DeviceId::from("dev-b"), quat_sample([0.0, 0.0, 0.0, 1.0]));
    hub.ingest(DeviceId::from("dev-a"), quat_sample([0.02, 0.0, 0.0, 1.0]));

    assert_eq!(*map_sizes.lock().expect("no poisoned lock"), vec![1, 2, 2]);
}

/// A scripted wireless link for exercising the adapter end to end.
struct ScriptedLink {
    events: Option<mpsc::Receiver<WirelessEvent>>,
}

impl WirelessLink for ScriptedLink {
    fn device_id(&self) -> TransportResult<String> {
        Ok("e2e-device".to_string())
    }

    fn device_name(&self) -> TransportResult<String> {
        Ok("helmet".to_string())
    }

    fn write_device_name(&mut self, _name: &str) -> TransportResult<()> {
        Ok(())
    }

    fn read_calibration(&self) -> TransportResult<u8> {
        Ok(1)
    }

    fn subscribe(&mut self, _event_capacity: usize) -> TransportResult<mpsc::Receiver<WirelessEvent>> {
        self.events
            .take()
            .ok_or_else(|| imuhub::io::TransportError::Link("already subscribed".to_string()))
    }

    fn reconnect(&mut self) -> TransportResult<()> {
        Err(imuhub::io::TransportError::Link("scripted link ended".to_string()))
    }
}

#[tokio::test]
async fn wireless_adapter_end_to_end() {
    let (tx, rx) = mpsc::channel(16);
    let link = ScriptedLink { events: Some(rx) };
    let hub = SensorHub::new();
    let (adapter, status) = WirelessAdapter::new(
        link,
        imuhub::config::WirelessConfig::default(),
        hub.clone(),
    );
    let task = tokio::spawn(adapter.run());

    let mut sample = Sample::default();
    sample.quaternion = Some([0.0, 0.0, 0.0, 1.0]);
    tx.send(WirelessEvent::SensorFrame(encode_sensor_frame(&sample, 0)))
        .await
        .expect("adapter alive");

    for _ in 0..200 {
        if hub.device_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let snapshot = hub.snapshot();
    let record = &snapshot[&DeviceId::from("e2e-device")];
    assert_eq!(record.device_name.as_deref(), Some("helmet"));
    assert_eq!(record.latest.calibration, Some(1));
    assert!(matches!(&*status.borrow(), ConnectionStatus::Connected(_)));

    task.abort();
}
