//! Client error types

use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

/// Errors from the client session adapter
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error status
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    /// Socket-level failure
    #[error("socket transport error: {0}")]
    Transport(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// Server refused the socket handshake
    #[error("socket handshake rejected with status {status}")]
    HandshakeRejected { status: u16 },

    /// Operation needs an authenticated user
    #[error("not authenticated")]
    NotAuthenticated,

    /// Socket could not be opened within the reconnect budget
    #[error("gave up connecting after {attempts} attempts: {last_error}")]
    ReconnectExhausted { attempts: u32, last_error: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("protocol error: {0}")]
    Protocol(#[from] SharedError),
}

impl ClientError {
    /// HTTP status of an `Api` error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::HandshakeRejected { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the session (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
