//! Shared Error Types
//!
//! Errors that can occur on both sides of the wire: validating user input and
//! encoding or decoding socket frames.
//!
//! # Error Categories
//!
//! - `ValidationError` - A field failed validation (user id, message text, ...)
//! - `SerializationError` - JSON encoding/decoding failed
//! - `ProtocolError` - A frame was well-formed JSON but not a known event
//!
//! # Usage
//!
//! ```rust
//! use xfchat::shared::error::SharedError;
//!
//! let error = SharedError::validation("userId", "user id is required");
//! assert!(error.to_string().contains("userId"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Unexpected frame on the realtime channel
    #[error("Protocol error: {message}")]
    ProtocolError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Human-readable message without the category prefix
    pub fn detail(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
            Self::SerializationError { message } => message,
            Self::ProtocolError { message } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
