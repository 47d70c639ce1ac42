//! Route Configuration Module
//!
//! - **`router`** - Main router creation, layers and fallbacks
//! - **`api_routes`** - `/api` endpoints (auth, messages)
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint routes
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use xfchat::backend::routes::create_router;
//! use xfchat::backend::server::{config::ServerConfig, state::AppState};
//!
//! let router = create_router(AppState::new(ServerConfig::default()));
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
