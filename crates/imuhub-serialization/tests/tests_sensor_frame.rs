//! Tests for the binary sensor frame codec.

use imuhub_serialization::sensor_frame::{
    decode_sensor_frame, encode_sensor_frame, ACCELEROMETER_FLAG, GYROSCOPE_FLAG,
    QUATERNION_FLAG, SENSOR_FRAME_VERSION,
};
use imuhub_structures::SensorDataError;

/// Wire bytes for 1.0f32: the byte-swapped form of little-endian encoding.
const ONE: [u8; 4] = [0x3F, 0x80, 0x00, 0x00];
/// Wire bytes for 2.0f32.
const TWO: [u8; 4] = [0x40, 0x00, 0x00, 0x00];
/// Wire bytes for 0.0f32.
const ZERO: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

fn frame(flags: u8, floats: &[[u8; 4]]) -> Vec<u8> {
    let mut bytes = vec![SENSOR_FRAME_VERSION, flags, 0x00, 0x00];
    for group in floats {
        bytes.extend_from_slice(group);
    }
    bytes
}

#[test]
fn unknown_version_is_rejected_without_partial_sample() {
    for version in [0u8, 2, 3, 0xFF] {
        let mut bytes = frame(QUATERNION_FLAG, &[ZERO, ZERO, ZERO, ONE]);
        bytes[0] = version;
        let err = decode_sensor_frame(&bytes).unwrap_err();
        assert_eq!(err, SensorDataError::UnsupportedVersion(version));
    }
}

#[test]
fn byte_swapped_float_decodes_to_one() {
    let bytes = frame(QUATERNION_FLAG, &[ONE, ZERO, ZERO, ZERO]);
    let sample = decode_sensor_frame(&bytes).unwrap();
    assert_eq!(sample.quaternion, Some([1.0, 0.0, 0.0, 0.0]));
}

#[test]
fn populated_fields_match_the_flag_mask() {
    let bytes = frame(ACCELEROMETER_FLAG, &[ONE, TWO, ZERO]);
    let sample = decode_sensor_frame(&bytes).unwrap();
    assert_eq!(sample.accelerometer, Some([1.0, 2.0, 0.0]));
    assert!(sample.quaternion.is_none());
    assert!(sample.gyroscope.is_none());
    assert!(sample.magnetometer.is_none());
    assert!(sample.linear_acceleration.is_none());
    assert!(sample.orientation_matrix.is_none());
}

#[test]
fn fields_are_decoded_in_fixed_priority_order() {
    // Quaternion is decoded before gyroscope even though the gyro bit sits
    // lower in the mask.
    let bytes = frame(
        QUATERNION_FLAG | GYROSCOPE_FLAG,
        &[ZERO, ZERO, ZERO, ONE, TWO, TWO, TWO],
    );
    let sample = decode_sensor_frame(&bytes).unwrap();
    assert_eq!(sample.quaternion, Some([0.0, 0.0, 0.0, 1.0]));
    assert_eq!(sample.gyroscope, Some([2.0, 2.0, 2.0]));
}

#[test]
fn quaternion_frames_carry_a_derived_orientation_matrix() {
    let bytes = frame(QUATERNION_FLAG, &[ZERO, ZERO, ZERO, ONE]);
    let sample = decode_sensor_frame(&bytes).unwrap();
    let matrix = sample.orientation_matrix.unwrap();
    // Identity quaternion -> identity rotation.
    for row in 0..4 {
        for col in 0..4 {
            let expected = if row == col { 1.0 } else { 0.0 };
            assert!((matrix[row * 4 + col] - expected).abs() < 1e-6);
        }
    }
}

#[test]
fn truncated_frames_error_instead_of_panicking() {
    let full = frame(QUATERNION_FLAG, &[ZERO, ZERO, ZERO, ONE]);
    for len in 0..full.len() {
        let err = decode_sensor_frame(&full[..len]).unwrap_err();
        assert!(matches!(
            err,
            SensorDataError::UnexpectedEnd { .. } | SensorDataError::UnsupportedVersion(_)
        ));
    }
}

#[test]
fn encoded_frames_decode_to_the_same_channels() {
    let mut sample = imuhub_structures::Sample::default();
    sample.quaternion = Some([0.0, 0.0, 0.0, 1.0]);
    sample.gyroscope = Some([0.25, -0.5, 1.0]);

    let bytes = encode_sensor_frame(&sample, 42);
    let decoded = decode_sensor_frame(&bytes).unwrap();
    assert_eq!(decoded.quaternion, sample.quaternion);
    assert_eq!(decoded.gyroscope, sample.gyroscope);
    assert!(decoded.accelerometer.is_none());
}
