//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Client identifiers must contain at least one character
    #[error("client_id must not be empty")]
    EmptyClientId,
}

/// Durable message log errors
#[derive(Debug, Error)]
pub enum MessageLogError {
    /// The underlying file could not be opened or written
    #[error("message log I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
