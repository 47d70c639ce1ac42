//! Client Module
//!
//! Session adapter for programs that talk to an xfchat server: HTTP auth
//! calls plus one realtime socket per authenticated user.
//!
//! - **`config`** - Server URL, socket URL and reconnect policy
//! - **`api`** - Cookie-backed HTTP client for `/api`
//! - **`session`** - `ChatSession` state machine and online-user tracking
//! - **`reconnect`** - Bounded exponential backoff
//! - **`error`** - `ClientError`
//!
//! # Example
//!
//! ```rust,no_run
//! use xfchat::client::{ChatSession, ClientConfig, LoginData};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = ChatSession::new(ClientConfig::new("http://localhost:5002")?)?;
//! session
//!     .login(&LoginData {
//!         email: "ada@example.com".to_string(),
//!         password: "secret1".to_string(),
//!     })
//!     .await?;
//! println!("online: {:?}", session.online_users().await);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod reconnect;
pub mod session;

pub use api::{ApiClient, LoginData, SignupData};
pub use config::ClientConfig;
pub use error::ClientError;
pub use reconnect::ReconnectPolicy;
pub use session::{ChatSession, ConnectionState, SessionSnapshot};
