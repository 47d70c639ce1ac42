//! Common test utilities and helpers
//!
//! - Live server spawning on an ephemeral port
//! - WebSocket client helpers
//! - Authentication helpers
//! - Custom assertion macros

#[macro_use]
pub mod assertions;
#[cfg(feature = "ssr")]
pub mod server;

#[cfg(feature = "ssr")]
pub use auth_helpers::*;
#[cfg(feature = "ssr")]
pub use server::*;
