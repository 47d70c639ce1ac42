//! Real-time Presence Module
//!
//! Tracks which users are online and pushes the online-user list to every
//! connected client over WebSocket.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── registry.rs  - Connection registry (user id -> live connection)
//! ├── broadcast.rs - Presence broadcaster and targeted sends
//! └── socket.rs    - `/ws` handshake and per-connection actor
//! ```
//!
//! # Data Flow
//!
//! 1. Client opens `/ws?userId=<id>`; the id is validated before upgrade
//! 2. The connection is registered; every client receives `getOnlineUsers`
//! 3. On close or transport failure the connection is unregistered and every
//!    remaining client receives the updated list
//!
//! # Example
//!
//! ```rust
//! use xfchat::backend::realtime::{ConnectionHandle, ConnectionRegistry};
//! use xfchat::shared::UserId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ConnectionRegistry::new();
//! let (handle, mut rx) = ConnectionHandle::channel();
//! registry.register(UserId::parse("u1")?, handle).await;
//! assert!(rx.try_recv().is_ok());
//! # Ok(())
//! # }
//! ```

/// Connection registry
pub mod registry;

/// Presence broadcasting
pub mod broadcast;

/// WebSocket handshake and connection actor
pub mod socket;

// Re-export commonly used types and functions
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry, Outbound, SendError};
pub use broadcast::{BroadcastReport, PresenceBroadcaster};
pub use socket::ws_upgrade;
