//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client and the server. All types are designed for serialization and
//! transmission over HTTP or the realtime socket.

/// User identifiers and public user records
pub mod user;

/// Server-to-client socket events
pub mod event;

/// Direct message payloads
pub mod message;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use user::{AuthUser, UserId};
pub use event::{ServerEvent, ONLINE_USERS_EVENT, NEW_MESSAGE_EVENT};
pub use message::{DirectMessage, SendMessageRequest};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
