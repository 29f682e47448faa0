// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The point of truth for "currently known devices".

use imuhub_structures::{DeviceId, DeviceMap, DeviceRecord, Sample};

/// Mapping from device id to its latest fused record.
///
/// Mutated only by the fusion step; records are never deleted (staleness is
/// judged by consumers from `received_at`).
#[derive(Debug, Default)]
pub struct DeviceStateStore {
    devices: DeviceMap,
}

impl DeviceStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `sample` into the record for `device_id`, creating the record if
    /// this is the first valid sample from that device.
    pub fn upsert(&mut self, device_id: DeviceId, sample: Sample) {
        self.devices
            .entry(device_id.clone())
            .or_insert_with(|| DeviceRecord::new(device_id))
            .absorb(sample);
    }

    /// Update the mutable display name of an already-known device.
    ///
    /// Returns `false` if the device has not produced a valid sample yet
    /// (records only come into existence through fusion).
    pub fn set_device_name(&mut self, device_id: &DeviceId, name: &str) -> bool {
        match self.devices.get_mut(device_id) {
            Some(record) => {
                record.device_name = Some(name.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, device_id: &DeviceId) -> Option<&DeviceRecord> {
        self.devices.get(device_id)
    }

    pub fn map(&self) -> &DeviceMap {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
