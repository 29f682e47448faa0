//! Common error type for IMU Hub data operations.

/// Result alias for sensor-data operations.
pub type SensorDataResult<T> = Result<T, SensorDataError>;

/// Errors produced while decoding or validating sensor data.
///
/// Invalid quaternions are deliberately *not* represented here: a sample with
/// a bad quaternion is expected sensor noise and is filtered silently by the
/// fusion step rather than surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorDataError {
    /// The frame declared a message version this build does not understand.
    /// Callers must report this at most once per process and keep decoding
    /// subsequent frames.
    #[error("unsupported sensor frame version {0}")]
    UnsupportedVersion(u8),

    /// The frame ended before all flagged fields could be read.
    #[error("sensor frame truncated: needed {expected} bytes, had {actual}")]
    UnexpectedEnd { expected: usize, actual: usize },

    /// Invalid parameters provided to a data operation.
    #[error("bad parameters: {0}")]
    BadParameters(String),
}
