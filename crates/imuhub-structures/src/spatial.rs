//! Pure spatial math: quaternion, Euler angle, and rotation matrix
//! conversions.
//!
//! All functions are stateless and perform no I/O. Angles are radians unless
//! a function says otherwise.
//!
//! The sensor devices store quaternions in `[q0, q1, q2, q3]` wire order, but
//! their body-frame-to-world-frame mapping feeds the conversion routines with
//! the components permuted: `(q3, q1, q0, q2)`. That reordering is part of
//! the device protocol, not a bug; use [`body_orientation_matrix`] and
//! [`body_euler_radians`] to apply it consistently.

/// Tolerance on the squared norm of an acceptable unit quaternion.
pub const QUATERNION_NORM_TOLERANCE: f32 = 0.1;

/// Is `q` approximately a unit quaternion?
///
/// Certain sensor models occasionally emit garbage quaternions (flaky I2C on
/// the sensor board); those fail this check and are dropped before fusion.
pub fn is_valid_quaternion(q: &[f32; 4]) -> bool {
    let norm_sq = q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3];
    (norm_sq - 1.0).abs() < QUATERNION_NORM_TOLERANCE
}

/// Convert a quaternion to a row-major 4x4 homogeneous rotation matrix.
pub fn quat_to_matrix(w: f32, x: f32, y: f32, z: f32) -> [f32; 16] {
    let x2 = x * x;
    let y2 = y * y;
    let z2 = z * z;
    let wx = w * x;
    let wy = w * y;
    let wz = w * z;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    [
        1.0 - 2.0 * (y2 + z2),
        2.0 * (xy - wz),
        2.0 * (xz + wy),
        0.0,
        2.0 * (xy + wz),
        1.0 - 2.0 * (x2 + z2),
        2.0 * (yz - wx),
        0.0,
        2.0 * (xz - wy),
        2.0 * (yz + wx),
        1.0 - 2.0 * (x2 + y2),
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]
}

/// Convert a quaternion to `[roll, pitch, yaw]` in radians using the
/// standard aerospace sequence.
pub fn quat_to_euler(q0: f32, q1: f32, q2: f32, q3: f32) -> [f32; 3] {
    let rx = (2.0 * (q0 * q1 + q2 * q3)).atan2(1.0 - 2.0 * (q1 * q1 + q2 * q2));
    let ry = (2.0 * (q0 * q2 - q3 * q1)).asin();
    let rz = (2.0 * (q0 * q3 + q1 * q2)).atan2(1.0 - 2.0 * (q2 * q2 + q3 * q3));
    [rx, ry, rz]
}

/// Build the `[x, y, z, w]` quaternion for the given yaw/pitch/roll radians.
///
/// Exact inverse of [`quat_to_euler`]; used for diagnostic round-trip checks.
pub fn euler_to_quat(yaw: f32, pitch: f32, roll: f32) -> [f32; 4] {
    let (c1, s1) = ((yaw / 2.0).cos(), (yaw / 2.0).sin());
    let (c2, s2) = ((pitch / 2.0).cos(), (pitch / 2.0).sin());
    let (c3, s3) = ((roll / 2.0).cos(), (roll / 2.0).sin());
    let w = c1 * c2 * c3 - s1 * s2 * s3;
    let x = s1 * s2 * c3 + c1 * c2 * s3;
    let y = s1 * c2 * c3 + c1 * s2 * s3;
    let z = c1 * s2 * c3 - s1 * c2 * s3;
    [x, y, z, w]
}

/// Orientation matrix for a stored wire-order quaternion, applying the
/// device's component permutation.
pub fn body_orientation_matrix(q: &[f32; 4]) -> [f32; 16] {
    quat_to_matrix(q[3], q[1], q[0], q[2])
}

/// Euler angles (radians) for a stored wire-order quaternion, applying the
/// device's component permutation.
///
/// The on-device Euler registers are unreliable; angles are always
/// reconstructed from the quaternion instead.
pub fn body_euler_radians(q: &[f32; 4]) -> [f32; 3] {
    quat_to_euler(q[3], q[1], q[0], q[2])
}
