//! Backend Module
//!
//! Server-side code for xfchat: an Axum server with cookie-based
//! authentication, a small messaging API and a WebSocket endpoint that keeps
//! every client informed of which users are online.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state and app creation
//! - **`routes`** - Router assembly, CORS, tracing and static serving
//! - **`realtime`** - Connection registry, presence broadcasts and the socket actor
//! - **`auth`** - Users, session tokens and auth handlers
//! - **`middleware`** - Session authentication for protected routes
//! - **`messaging`** - Sidebar users and direct message push
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs         - Binary entry point
//! ├── server/
//! ├── routes/
//! ├── realtime/
//! ├── auth/
//! ├── middleware/
//! ├── messaging/
//! └── error/
//! ```
//!
//! # Presence
//!
//! A client opens `GET /ws?userId=<id>`. The registry maps each online user to
//! exactly one live connection; every register or unregister is followed by a
//! `getOnlineUsers` broadcast of the full online set to every connection.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Realtime presence
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Sidebar users and direct messages
pub mod messaging;

pub use error::BackendError;
pub use realtime::{ConnectionRegistry, PresenceBroadcaster};
pub use server::{create_app, AppState, ServerConfig};
