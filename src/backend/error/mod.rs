//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Error Types
//!
//! - `HandlerError` - Errors that occur in HTTP handlers
//! - `HandshakeError` - Refused realtime socket upgrades
//! - `StateError` - Errors related to server-side state (hashing, signing)
//! - `SharedError` - Errors from the shared module
//! - `SerializationError` - JSON serialization errors

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
