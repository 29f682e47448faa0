//! Transport error types.

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised at the transport boundary.
///
/// None of these are fatal to the pipeline: the adapters treat them as
/// recoverable, retry on a fixed delay, and keep streaming for whatever
/// devices stay healthy.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Broker socket error.
    #[cfg(feature = "broker-transport")]
    #[error("broker transport error: {0}")]
    Zmq(#[from] zeromq::ZmqError),

    /// Malformed JSON payload.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Wireless link operation failed.
    #[error("wireless link error: {0}")]
    Link(String),

    /// The transport connection dropped; the adapter will reconnect.
    #[error("transport lost: {0}")]
    Lost(String),
}
