//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - `ServerConfig` from defaults, a TOML file and the environment
//! - **`init`** - `create_app`
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading
//! └── init.rs         - App creation
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
