//! XFChat - Main Library
//!
//! XFChat is a small real-time chat application. The server exposes
//! authentication and messaging endpoints over HTTP plus a WebSocket channel
//! that tracks which users are online and pushes the online-user list to every
//! connected client.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - User identifiers, public user records, direct messages
//!   - The closed set of server-to-client socket events
//!   - Error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, routes and middleware
//!   - Connection registry and presence broadcasting
//!   - In-memory user directory and JWT sessions
//!
//! - **`client`** - Client session adapter
//!   - HTTP auth calls via `reqwest`
//!   - One WebSocket per authenticated user via `tokio-tungstenite`
//!   - Local online-user state fed by presence broadcasts
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend modules (on by default)
//!
//! # Usage
//!
//! ```rust,no_run
//! use xfchat::backend::server::config::ServerConfig;
//! use xfchat::backend::server::init::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let (app, _state) = create_app(config);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: the registry owns its session map behind `tokio::sync::RwLock`;
//!   every mutation takes the write lock, so broadcasts go out in mutation order
//! - **Client**: session state is shared with the socket reader task through
//!   `Arc<RwLock<>>`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Client session adapter
pub mod client;
