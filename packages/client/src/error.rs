//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The server answered the handshake with an HTTP error
    #[error("Server rejected the connection with HTTP {0}")]
    Rejected(u16),

    /// Could not establish a connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// An established connection was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
