//! Centralized error types for the relay.

use thiserror::Error;

/// Main error type for relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The request body is missing a required field or is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A member channel could not accept an event.
    #[error("Channel {0} is no longer reachable")]
    ChannelSend(String),

    /// A frame received on a push channel could not be understood.
    #[error("Malformed channel message: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller can fix this error by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
