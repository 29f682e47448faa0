//! Human-readable connection status for display surfaces.
//!
//! Transport errors are never surfaced to consumers as errors; dashboards get
//! a best-effort status string on a watch channel instead (and the adapters
//! keep reconnecting underneath).

use std::fmt;

use tokio::sync::watch;

/// Current state of one transport connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The adapter has not attempted a connection yet.
    Idle,
    /// Connected; the string names the peer (endpoint or device).
    Connected(String),
    /// Connection lost; the string carries the reason and the retry delay.
    Reconnecting(String),
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Idle => f.write_str("idle"),
            ConnectionStatus::Connected(message) => f.write_str(message),
            ConnectionStatus::Reconnecting(message) => f.write_str(message),
        }
    }
}

/// Build a status watch channel starting in [`ConnectionStatus::Idle`].
pub fn status_channel() -> (watch::Sender<ConnectionStatus>, watch::Receiver<ConnectionStatus>) {
    watch::channel(ConnectionStatus::Idle)
}
