//! Error types for the monitor subsystem.

use crate::bencode::BencodeError;
use thiserror::Error;

/// Main error type for monitor operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid arguments: {0}")]
    BadArgs(String),

    #[error("Encoding error: {0}")]
    Codec(#[from] BencodeError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error codes sent back to `monitor.messages` callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i64)]
pub enum MonitorResponse {
    /// Malformed envelope or unparseable element.
    BadArgs = 1,
    /// Missing or wrong-width account key.
    BadPubkey = 2,
    /// Missing, empty or unsorted namespace list.
    BadNamespace = 3,
}

impl MonitorResponse {
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
