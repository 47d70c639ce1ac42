/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * Verifies the email and password against the directory and issues a fresh
 * session cookie. Unknown emails and wrong passwords produce the same
 * `400 Invalid credentials` response.
 */

use axum::{extract::State, http::StatusCode, response::Response, Json};

use crate::backend::auth::handlers::session_response;
use crate::backend::auth::handlers::types::LoginRequest;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login handler
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, BackendError> {
    tracing::info!("[Auth] Login request for {}", request.email.trim());

    let user = app_state
        .users
        .get_user_by_email(&request.email)
        .await
        .ok_or_else(|| {
            tracing::debug!("[Auth] Login for unknown email");
            BackendError::bad_request(INVALID_CREDENTIALS)
        })?;

    let password = request.password;
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::state(format!("Password verification task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("[Auth] Failed to verify password: {}", e);
            BackendError::state("Failed to verify password")
        })?;

    if !valid {
        tracing::warn!(user_id = %user.id, "[Auth] Wrong password");
        return Err(BackendError::bad_request(INVALID_CREDENTIALS));
    }

    tracing::info!(user_id = %user.id, "[Auth] User logged in");

    session_response(&app_state, StatusCode::OK, user.to_public())
}
