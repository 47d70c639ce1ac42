//! Authentication Handlers Module
//!
//! HTTP handlers for the `/api/auth` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and the shared session response
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - User registration handler
//! ├── login.rs    - User authentication handler
//! ├── logout.rs   - Session termination handler
//! └── check.rs    - Current user handler
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`check_auth`** - GET /api/auth/check (protected)
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{routing::post, Router};
//! use xfchat::backend::auth::handlers::{login, logout, signup};
//! use xfchat::backend::server::state::AppState;
//!
//! let router: Router<AppState> = Router::new()
//!     .route("/api/auth/signup", post(signup))
//!     .route("/api/auth/login", post(login))
//!     .route("/api/auth/logout", post(logout));
//! ```

use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::AuthUser;

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Current user handler
pub mod check;

pub use types::{LoginRequest, MessageResponse, SignupRequest};

pub use check::check_auth;
pub use login::login;
pub use logout::logout;
pub use signup::signup;

/// Issue a session cookie for `user` and return it as the JSON body
pub(crate) fn session_response(
    app_state: &AppState,
    status: StatusCode,
    user: AuthUser,
) -> Result<Response, BackendError> {
    let token = app_state.tokens.create_token(&user.id).map_err(|e| {
        tracing::error!("[Auth] Failed to sign token: {}", e);
        BackendError::state("Failed to create session")
    })?;

    Ok((
        status,
        [(SET_COOKIE, app_state.tokens.session_cookie(&token))],
        Json(user),
    )
        .into_response())
}
