// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed consumer subscription with first-class failure isolation.
//!
//! Consumers (renderers, dashboards, chart widgets) subscribe to fused
//! samples. Delivery is synchronous and in registration order. A consumer
//! that returns an error is logged once and disabled from further
//! dispatches — the pipeline stays alive for everyone else rather than
//! crashing or spamming the log on behalf of one bad subscriber.

use imuhub_structures::{DeviceMap, DeviceRecord};
use tracing::warn;

use crate::reporting::ReportOnce;

/// Error type consumers may return; the dispatcher only logs it.
pub type ConsumerError = Box<dyn std::error::Error + Send + Sync>;

/// Handle returned by registration, usable for explicit removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerId(u64);

/// A subscriber to fused sensor samples.
///
/// Implemented automatically for closures of the matching shape, so the
/// callback style works too:
///
/// ```
/// use imuhub_state_manager::{ConsumerError, SensorHub};
/// use imuhub_structures::{DeviceMap, DeviceRecord};
///
/// let hub = SensorHub::new();
/// hub.add_consumer(
///     |record: &DeviceRecord, _all: &DeviceMap| -> Result<(), ConsumerError> {
///         println!("{}", record.device_id);
///         Ok(())
///     },
/// );
/// ```
pub trait SensorConsumer: Send {
    /// Called once per fused sample, after the store update is committed.
    ///
    /// `devices` is the full shared map; it may change between calls.
    fn on_sensor_data(
        &mut self,
        record: &DeviceRecord,
        devices: &DeviceMap,
    ) -> Result<(), ConsumerError>;
}

impl<F> SensorConsumer for F
where
    F: FnMut(&DeviceRecord, &DeviceMap) -> Result<(), ConsumerError> + Send,
{
    fn on_sensor_data(
        &mut self,
        record: &DeviceRecord,
        devices: &DeviceMap,
    ) -> Result<(), ConsumerError> {
        self(record, devices)
    }
}

struct ConsumerSlot {
    id: ConsumerId,
    consumer: Box<dyn SensorConsumer>,
    disabled: bool,
}

/// Ordered consumer list with the disable-after-first-failure policy.
#[derive(Default)]
pub(crate) struct ConsumerRegistry {
    slots: Vec<ConsumerSlot>,
    next_id: u64,
}

impl ConsumerRegistry {
    pub fn add(&mut self, consumer: Box<dyn SensorConsumer>) -> ConsumerId {
        let id = ConsumerId(self.next_id);
        self.next_id += 1;
        self.slots.push(ConsumerSlot {
            id,
            consumer,
            disabled: false,
        });
        id
    }

    pub fn remove(&mut self, id: ConsumerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Deliver one fused sample to every enabled consumer, in registration
    /// order. No consumer failure escapes this call.
    pub fn dispatch(
        &mut self,
        record: &DeviceRecord,
        devices: &DeviceMap,
        reporter: &mut ReportOnce,
    ) {
        for slot in self.slots.iter_mut() {
            if slot.disabled {
                continue;
            }
            if let Err(err) = slot.consumer.on_sensor_data(record, devices) {
                if reporter.first(format!("consumer-failure:{}", slot.id.0)) {
                    warn!(
                        consumer = slot.id.0,
                        error = %err,
                        "consumer failed; disabling it for future dispatches"
                    );
                }
                slot.disabled = true;
            }
        }
    }
}
