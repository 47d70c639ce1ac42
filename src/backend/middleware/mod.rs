//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Session authentication for protected routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use xfchat::backend::middleware::auth_middleware;
//! use xfchat::backend::server::state::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, extract_token, AuthUser, AuthenticatedUser};
