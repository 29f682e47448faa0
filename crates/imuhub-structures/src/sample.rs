//! The canonical decoded sensor reading.

use std::time::{Instant, SystemTime};

use serde::{Deserialize, Serialize};

/// One decoded reading from a device at a point in time.
///
/// Every sensor channel is optional: a frame carries only the channels whose
/// flag bits were set, and the calibration byte arrives on a separate
/// characteristic with its own cadence. Derived fields (`orientation_matrix`,
/// `euler`) are present iff a quaternion is present.
///
/// `euler` is expressed in **degrees** once a sample leaves the fusion step;
/// the raw conversion routines in [`crate::spatial`] stay in radians.
///
/// Timestamps are stamped by the receiving process when the sample is fused,
/// not by the device: `received_at` is monotonic and drives staleness,
/// `local_timestamp` is wall-clock time for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    /// Unit quaternion in wire order `[x, y, z, w]`.
    pub quaternion: Option<[f32; 4]>,
    pub accelerometer: Option<[f32; 3]>,
    pub gyroscope: Option<[f32; 3]>,
    pub magnetometer: Option<[f32; 3]>,
    pub linear_acceleration: Option<[f32; 3]>,
    /// Row-major 4x4 rotation matrix derived from the quaternion.
    pub orientation_matrix: Option<[f32; 16]>,
    /// `[roll, pitch, yaw]` in degrees (see the type-level docs).
    pub euler: Option<[f32; 3]>,
    /// Calibration level, 0 = uncalibrated.
    pub calibration: Option<u8>,
    #[serde(skip)]
    pub received_at: Option<Instant>,
    pub local_timestamp: Option<SystemTime>,
}

impl Sample {
    /// True if this sample carries orientation data.
    pub fn has_quaternion(&self) -> bool {
        self.quaternion.is_some()
    }

    /// Age of this sample relative to now, if it has been fused.
    ///
    /// Staleness is a consumer-side concern; the pipeline never deletes
    /// records, consumers fade them out by this age.
    pub fn age(&self) -> Option<std::time::Duration> {
        self.received_at.map(|at| at.elapsed())
    }

    /// Fill any field that is absent here from `prior`.
    ///
    /// This is the fusion merge: a sparse update (say, a quaternion-only
    /// frame) keeps whatever the device previously reported on the other
    /// channels, including the calibration byte from its side channel.
    pub fn merge_from(&mut self, prior: &Sample) {
        if self.quaternion.is_none() {
            self.quaternion = prior.quaternion;
        }
        if self.accelerometer.is_none() {
            self.accelerometer = prior.accelerometer;
        }
        if self.gyroscope.is_none() {
            self.gyroscope = prior.gyroscope;
        }
        if self.magnetometer.is_none() {
            self.magnetometer = prior.magnetometer;
        }
        if self.linear_acceleration.is_none() {
            self.linear_acceleration = prior.linear_acceleration;
        }
        if self.orientation_matrix.is_none() {
            self.orientation_matrix = prior.orientation_matrix;
        }
        if self.euler.is_none() {
            self.euler = prior.euler;
        }
        if self.calibration.is_none() {
            self.calibration = prior.calibration;
        }
        if self.received_at.is_none() {
            self.received_at = prior.received_at;
        }
        if self.local_timestamp.is_none() {
            self.local_timestamp = prior.local_timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_retains_absent_fields() {
        let mut prior = Sample::default();
        prior.quaternion = Some([0.0, 0.0, 0.0, 1.0]);
        prior.calibration = Some(1);

        let mut update = Sample::default();
        update.quaternion = Some([0.1, 0.0, 0.0, 0.99]);
        update.merge_from(&prior);

        assert_eq!(update.quaternion, Some([0.1, 0.0, 0.0, 0.99]));
        assert_eq!(update.calibration, Some(1));
    }

    #[test]
    fn merge_prefers_new_fields() {
        let mut prior = Sample::default();
        prior.calibration = Some(1);

        let mut update = Sample::default();
        update.calibration = Some(3);
        update.merge_from(&prior);

        assert_eq!(update.calibration, Some(3));
    }
}
