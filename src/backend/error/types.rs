/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors occur when processing HTTP requests:
 * - Invalid request bodies
 * - Authentication failures
 * - Unknown users or routes
 *
 * ## Handshake Errors
 *
 * Handshake errors occur when a realtime socket upgrade is refused because
 * the `userId` parameter is missing or malformed. The upgrade never happens
 * and nothing is registered.
 *
 * ## State Errors
 *
 * State errors occur when shared server state cannot be used, for example
 * when hashing or signing fails.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// Each variant can be converted to an HTTP response.
///
/// # Usage
///
/// ```rust
/// use xfchat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = BackendError::handshake("user id is required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., bad credentials, invalid body)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Realtime handshake rejected
    #[error("Handshake error: {message}")]
    HandshakeError {
        /// Human-readable error message
        message: String,
    },

    /// State management error (e.g., password hashing failure)
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Create a new handshake error
    pub fn handshake(message: impl Into<String>) -> Self {
        Self::HandshakeError {
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `HandshakeError` - 400 Bad Request
    /// - `StateError` - 500 Internal Server Error
    /// - `SharedError` - 400 for validation, 500 otherwise
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::HandshakeError { .. } => StatusCode::BAD_REQUEST,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::ProtocolError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::HandshakeError { message } => message.clone(),
            Self::StateError { message } => message.clone(),
            Self::SharedError(err) => err.detail().to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}
