// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
IMU Hub Monitor

Subscribes to the telemetry broker and prints a live table of every known
device: orientation, calibration level, and staleness.

Usage:
  cargo run --bin hub_monitor [-- <config.toml>]

Configuration is read from imu_hub.toml (or IMU_HUB_CONFIG_PATH); built-in
defaults are used when no file exists.
*/

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use imuhub::prelude::*;

/// Console consumer: redraws the device table, at most once per interval.
struct TablePrinter {
    last_drawn: Option<Instant>,
    min_interval: Duration,
    stale_after: Duration,
}

impl TablePrinter {
    fn new(stale_after: Duration) -> Self {
        TablePrinter {
            last_drawn: None,
            min_interval: Duration::from_millis(250),
            stale_after,
        }
    }

    fn draw(&self, devices: &DeviceMap) {
        println!("{:-<78}", "");
        println!(
            "{:<16} {:<12} {:>8} {:>8} {:>8}  {:>5}  {}",
            "device", "name", "roll", "pitch", "yaw", "cal", "age"
        );
        for record in devices.values() {
            let [roll, pitch, yaw] = record.latest.euler.unwrap_or([0.0, 0.0, 0.0]);
            let age = record.latest.age().unwrap_or_default();
            let marker = if age > self.stale_after { " (stale)" } else { "" };
            println!(
                "{:<16} {:<12} {:>8.1} {:>8.1} {:>8.1}  {:>5}  {:>6.1}s{}",
                record.device_id,
                record.device_name.as_deref().unwrap_or("-"),
                roll,
                pitch,
                yaw,
                record.latest.calibration.unwrap_or(0),
                age.as_secs_f32(),
                marker
            );
        }
    }
}

impl SensorConsumer for TablePrinter {
    fn on_sensor_data(
        &mut self,
        _record: &DeviceRecord,
        devices: &DeviceMap,
    ) -> Result<(), ConsumerError> {
        let now = Instant::now();
        if let Some(last) = self.last_drawn {
            if now - last < self.min_interval {
                return Ok(());
            }
        }
        self.last_drawn = Some(now);
        self.draw(devices);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = imuhub::config::load_config(config_path.as_deref())?;
    let _logging = imuhub::observability::init_logging(&config.logging.level)?;

    let hub = SensorHub::new();
    hub.add_consumer(TablePrinter::new(Duration::from_millis(
        config.pipeline.stale_after_ms,
    )));

    let (subscriber, mut status) = BrokerSubscriber::new(config.broker, hub.clone());
    let runner = tokio::spawn(subscriber.run());

    // Echo broker status transitions next to the device table.
    let mut last: Option<ConnectionStatus> = None;
    loop {
        if status.changed().await.is_err() {
            break;
        }
        let current = status.borrow_and_update().clone();
        if last.as_ref() != Some(&current) {
            println!("[broker] {}", current);
            last = Some(current);
        }
    }

    runner.abort();
    Ok(())
}
