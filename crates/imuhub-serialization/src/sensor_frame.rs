//! Versioned binary sensor frame codec.
//!
//! # Format
//! - byte 0: message version (only [`SENSOR_FRAME_VERSION`] is accepted)
//! - byte 1: channel flag bitmask
//! - bytes 2..4: device timestamp (decoded, not surfaced)
//! - remaining bytes: the flagged float groups, packed contiguously in the
//!   fixed priority order quaternion(4) -> accelerometer(3) -> gyroscope(3)
//!   -> magnetometer(3) -> linear acceleration(3), regardless of flag bit
//!   positions
//!
//! Each float32 is transmitted with its four bytes swapped relative to
//! standard little-endian; `[0x3F, 0x80, 0x00, 0x00]` decodes to `1.0`. The
//! swap is reproduced here bit-for-bit — do not "simplify" it away.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use imuhub_structures::spatial::body_orientation_matrix;
use imuhub_structures::{Sample, SensorDataError, SensorDataResult};

/// The only frame version this build understands.
pub const SENSOR_FRAME_VERSION: u8 = 1;

/// Channel flag bits, matching the device firmware.
pub const ACCELEROMETER_FLAG: u8 = 0x01;
pub const MAGNETOMETER_FLAG: u8 = 0x02;
pub const GYROSCOPE_FLAG: u8 = 0x04;
/// Reserved: calibration rides a separate characteristic, never the frame.
pub const CALIBRATION_FLAG: u8 = 0x08;
/// Reserved: Euler angles are reconstructed from the quaternion instead.
pub const EULER_FLAG: u8 = 0x10;
pub const QUATERNION_FLAG: u8 = 0x20;
pub const LINEAR_ACCELERATION_FLAG: u8 = 0x40;

/// Sequential reader over a frame's bytes.
struct FrameReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> FrameReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        FrameReader { bytes, cursor: 0 }
    }

    fn take(&mut self, count: usize) -> SensorDataResult<&'a [u8]> {
        let end = self.cursor + count;
        if end > self.bytes.len() {
            return Err(SensorDataError::UnexpectedEnd {
                expected: end,
                actual: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> SensorDataResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> SensorDataResult<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Read one byte-swapped float32.
    fn read_f32(&mut self) -> SensorDataResult<f32> {
        let raw = self.take(4)?;
        let swapped = [raw[3], raw[2], raw[1], raw[0]];
        Ok(LittleEndian::read_f32(&swapped))
    }

    fn read_vec3(&mut self) -> SensorDataResult<[f32; 3]> {
        Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
    }

    fn read_quat(&mut self) -> SensorDataResult<[f32; 4]> {
        Ok([
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ])
    }
}

/// Decode one binary sensor frame into a [`Sample`].
///
/// The sample contains exactly the channels whose flag bits were set, plus a
/// derived orientation matrix when a quaternion is present. An unknown
/// version yields [`SensorDataError::UnsupportedVersion`] and never a partial
/// sample; callers are expected to report that at most once per process while
/// continuing to decode later frames.
pub fn decode_sensor_frame(bytes: &[u8]) -> SensorDataResult<Sample> {
    let mut reader = FrameReader::new(bytes);

    let version = reader.read_u8()?;
    if version != SENSOR_FRAME_VERSION {
        return Err(SensorDataError::UnsupportedVersion(version));
    }
    let flags = reader.read_u8()?;
    let _timestamp = reader.read_u16()?;

    let mut sample = Sample::default();
    if flags & QUATERNION_FLAG != 0 {
        let quat = reader.read_quat()?;
        sample.orientation_matrix = Some(body_orientation_matrix(&quat));
        sample.quaternion = Some(quat);
    }
    if flags & ACCELEROMETER_FLAG != 0 {
        sample.accelerometer = Some(reader.read_vec3()?);
    }
    if flags & GYROSCOPE_FLAG != 0 {
        sample.gyroscope = Some(reader.read_vec3()?);
    }
    if flags & MAGNETOMETER_FLAG != 0 {
        sample.magnetometer = Some(reader.read_vec3()?);
    }
    if flags & LINEAR_ACCELERATION_FLAG != 0 {
        sample.linear_acceleration = Some(reader.read_vec3()?);
    }

    Ok(sample)
}

fn push_f32(out: &mut Vec<u8>, value: f32) {
    let mut le = [0u8; 4];
    LittleEndian::write_f32(&mut le, value);
    out.extend_from_slice(&[le[3], le[2], le[1], le[0]]);
}

fn push_vec3(out: &mut Vec<u8>, value: &[f32; 3]) {
    for component in value {
        push_f32(out, *component);
    }
}

/// Encode a [`Sample`] as a version-1 sensor frame.
///
/// The flag byte is derived from the channels present on the sample; derived
/// fields and the calibration byte are never framed. Used by link-to-broker
/// bridges and device simulators.
pub fn encode_sensor_frame(sample: &Sample, timestamp: u16) -> Vec<u8> {
    let mut flags = 0u8;
    if sample.quaternion.is_some() {
        flags |= QUATERNION_FLAG;
    }
    if sample.accelerometer.is_some() {
        flags |= ACCELEROMETER_FLAG;
    }
    if sample.gyroscope.is_some() {
        flags |= GYROSCOPE_FLAG;
    }
    if sample.magnetometer.is_some() {
        flags |= MAGNETOMETER_FLAG;
    }
    if sample.linear_acceleration.is_some() {
        flags |= LINEAR_ACCELERATION_FLAG;
    }

    let mut out = Vec::with_capacity(4 + 16 * 4);
    out.push(SENSOR_FRAME_VERSION);
    out.push(flags);
    let mut ts = [0u8; 2];
    BigEndian::write_u16(&mut ts, timestamp);
    out.extend_from_slice(&ts);

    if let Some(quat) = &sample.quaternion {
        for component in quat {
            push_f32(&mut out, *component);
        }
    }
    if let Some(accel) = &sample.accelerometer {
        push_vec3(&mut out, accel);
    }
    if let Some(gyro) = &sample.gyroscope {
        push_vec3(&mut out, gyro);
    }
    if let Some(mag) = &sample.magnetometer {
        push_vec3(&mut out, mag);
    }
    if let Some(linear) = &sample.linear_acceleration {
        push_vec3(&mut out, linear);
    }
    out
}
