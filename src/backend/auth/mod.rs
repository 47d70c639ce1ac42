//! Authentication Module
//!
//! User registration, login and session management.
//!
//! # Architecture
//!
//! - **`users`** - In-memory user directory
//! - **`sessions`** - JWT signing, verification and the `jwt` cookie
//! - **`handlers`** - HTTP handlers for the auth endpoints
//!
//! # Authentication Flow
//!
//! 1. **Signup**: name, email and password → user created → session cookie set
//! 2. **Login**: email and password verified → session cookie set
//! 3. **Check**: cookie (or bearer token) verified by middleware → user returned
//! 4. **Logout**: cookie cleared
//!
//! Passwords are hashed with bcrypt and never leave the server.

/// In-memory user directory
pub mod users;

/// Session token management
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{LoginRequest, MessageResponse, SignupRequest};
pub use handlers::{check_auth, login, logout, signup};
pub use sessions::{TokenService, SESSION_COOKIE};
pub use users::{User, UserDirectory};
