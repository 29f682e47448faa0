//! Per-device identity and latest-known state.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Stable identifier for a sensor device: the hardware address string on the
/// wireless link, or the final topic path segment on the broker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        DeviceId(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        DeviceId(id)
    }
}

/// Latest known state of one device.
///
/// A record is created on the first valid sample for an unseen device and
/// merged (never replaced) on every subsequent one. Records are never
/// deleted: a device that disconnects simply stops updating and goes stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: DeviceId,
    /// Short human-readable name; mutable through the identity sub-channel.
    pub device_name: Option<String>,
    pub latest: Sample,
}

impl DeviceRecord {
    pub fn new(device_id: DeviceId) -> Self {
        DeviceRecord {
            device_id,
            device_name: None,
            latest: Sample::default(),
        }
    }

    /// Merge a new sample into this record. Fields absent in `sample` keep
    /// their previous value.
    pub fn absorb(&mut self, mut sample: Sample) {
        sample.merge_from(&self.latest);
        self.latest = sample;
    }
}

/// The shared device map handed to every consumer alongside each new record.
///
/// Mutated only by the fusion step; consumers must not assume it is
/// unchanged between calls.
pub type DeviceMap = HashMap<DeviceId, DeviceRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_keeps_prior_channels() {
        let mut record = DeviceRecord::new(DeviceId::from("aa:bb"));
        let mut first = Sample::default();
        first.quaternion = Some([0.0, 0.0, 0.0, 1.0]);
        first.calibration = Some(2);
        record.absorb(first);

        let mut second = Sample::default();
        second.quaternion = Some([0.1, 0.0, 0.0, 0.99]);
        record.absorb(second);

        assert_eq!(record.latest.quaternion, Some([0.1, 0.0, 0.0, 0.99]));
        assert_eq!(record.latest.calibration, Some(2));
    }
}
