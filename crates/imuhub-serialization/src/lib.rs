//! Binary wire format for IMU sensor frames.
//!
//! Devices notify their readings as a small versioned binary frame: a version
//! byte, a channel flag byte, a two-byte timestamp, then the flagged float
//! groups. This crate decodes those frames into
//! [`imuhub_structures::Sample`] values (and can encode them, for bridges and
//! device simulators).

pub mod sensor_frame;

pub use sensor_frame::{
    decode_sensor_frame, encode_sensor_frame, SENSOR_FRAME_VERSION,
};
