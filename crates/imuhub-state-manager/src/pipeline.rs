// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The fusion pipeline context.

use std::sync::Arc;
use std::time::{Instant, SystemTime};

use imuhub_structures::spatial::{body_euler_radians, body_orientation_matrix, is_valid_quaternion};
use imuhub_structures::{DeviceId, DeviceMap, Sample};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::consumers::{ConsumerId, ConsumerRegistry, SensorConsumer};
use crate::device_states::DeviceStateStore;
use crate::reporting::ReportOnce;

struct HubInner {
    store: DeviceStateStore,
    consumers: ConsumerRegistry,
    reporter: ReportOnce,
}

/// The pipeline context: device state store, consumer registry, and the
/// shared deduplicating reporter.
///
/// `SensorHub` is a cheap-clone handle; every transport adapter holds one and
/// feeds decoded samples through [`SensorHub::ingest`]. Fusion and dispatch
/// run synchronously under one lock, so no frame is ever processed
/// concurrently with another and consumers always observe the store state as
/// of the sample they are being handed.
#[derive(Clone)]
pub struct SensorHub {
    inner: Arc<Mutex<HubInner>>,
}

impl SensorHub {
    pub fn new() -> Self {
        SensorHub {
            inner: Arc::new(Mutex::new(HubInner {
                store: DeviceStateStore::new(),
                consumers: ConsumerRegistry::default(),
                reporter: ReportOnce::new(),
            })),
        }
    }

    /// Register a consumer; it will be invoked for every subsequently fused
    /// sample, in registration order.
    pub fn add_consumer(&self, consumer: impl SensorConsumer + 'static) -> ConsumerId {
        self.inner.lock().consumers.add(Box::new(consumer))
    }

    /// Remove a previously registered consumer. Returns `false` if the id is
    /// unknown (e.g. already removed).
    pub fn remove_consumer(&self, id: ConsumerId) -> bool {
        self.inner.lock().consumers.remove(id)
    }

    pub fn consumer_count(&self) -> usize {
        self.inner.lock().consumers.len()
    }

    /// Fuse one raw sample into the device state and fan it out.
    ///
    /// Samples without a quaternion (presence frames) or with an invalid one
    /// are dropped silently — that is expected sensor noise, not an error.
    /// Accepted samples are stamped with receipt timestamps, enriched with
    /// the derived orientation matrix and Euler angles (degrees) if the
    /// transport did not supply them, and merged into the existing record so
    /// that channels absent from this frame keep their previous values.
    ///
    /// Returns `true` if the sample was accepted and dispatched.
    pub fn ingest(&self, device_id: DeviceId, mut sample: Sample) -> bool {
        let quat = match sample.quaternion {
            Some(quat) => quat,
            None => {
                trace!(device = %device_id, "dropping sample without quaternion");
                return false;
            }
        };
        if !is_valid_quaternion(&quat) {
            trace!(device = %device_id, "dropping sample with invalid quaternion");
            return false;
        }

        sample.received_at = Some(Instant::now());
        sample.local_timestamp = Some(SystemTime::now());
        if sample.orientation_matrix.is_none() {
            sample.orientation_matrix = Some(body_orientation_matrix(&quat));
        }
        if sample.euler.is_none() {
            let radians = body_euler_radians(&quat);
            sample.euler = Some(radians.map(f32::to_degrees));
        }

        let inner = &mut *self.inner.lock();
        inner.store.upsert(device_id.clone(), sample);
        let record = match inner.store.get(&device_id) {
            Some(record) => record,
            // upsert just inserted the key; this arm is unreachable.
            None => return false,
        };
        inner
            .consumers
            .dispatch(record, inner.store.map(), &mut inner.reporter);
        true
    }

    /// Update a device's display name (identity sub-channel write). Does not
    /// produce a sample event.
    pub fn set_device_name(&self, device_id: &DeviceId, name: &str) -> bool {
        let renamed = self.inner.lock().store.set_device_name(device_id, name);
        if renamed {
            debug!(device = %device_id, name, "device renamed");
        }
        renamed
    }

    /// Report a recurring condition at most once per process.
    ///
    /// Returns `true` the first time `key` is seen; adapters gate their
    /// warn-level logs on this so a stuck device cannot flood the log.
    pub fn report_once(&self, key: impl Into<String>) -> bool {
        self.inner.lock().reporter.first(key)
    }

    pub fn device_count(&self) -> usize {
        self.inner.lock().store.len()
    }

    /// Clone of the current device map, for display surfaces that render
    /// outside the dispatch path.
    pub fn snapshot(&self) -> DeviceMap {
        self.inner.lock().store.map().clone()
    }
}

impl Default for SensorHub {
    fn default() -> Self {
        Self::new()
    }
}
