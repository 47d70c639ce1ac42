/**
 * Signup Handler
 *
 * POST /api/auth/signup
 *
 * # Registration Process
 *
 * 1. Validate full name, email format and password length
 * 2. Hash the password with bcrypt (on the blocking pool)
 * 3. Create the user in the directory (emails are unique)
 * 4. Issue a session token as the `jwt` cookie
 * 5. Return the public user with 201 Created
 *
 * # Errors
 *
 * - `400 Bad Request` - missing fields, bad email, short password, or email already in use
 * - `500 Internal Server Error` - hashing or token signing failed
 */

use axum::{extract::State, http::StatusCode, response::Response, Json};

use crate::backend::auth::handlers::session_response;
use crate::backend::auth::handlers::types::SignupRequest;
use crate::backend::auth::users::DirectoryError;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Sign up handler
///
/// # Example Request
///
/// ```http
/// POST /api/auth/signup HTTP/1.1
/// Content-Type: application/json
///
/// {"fullName": "Ada Lovelace", "email": "ada@example.com", "password": "secret1"}
/// ```
///
/// # Example Response
///
/// ```json
/// {"_id": "3f2a...", "fullName": "Ada Lovelace", "email": "ada@example.com", "profilePic": "", "createdAt": "..."}
/// ```
pub async fn signup(
    State(app_state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Response, BackendError> {
    tracing::info!("[Auth] Signup request for {}", request.email.trim());

    request.validate().map_err(|message| {
        tracing::debug!("[Auth] Signup rejected: {}", message);
        BackendError::bad_request(message)
    })?;

    if app_state.users.get_user_by_email(&request.email).await.is_some() {
        tracing::warn!("[Auth] Signup for existing email {}", request.email.trim());
        return Err(BackendError::bad_request("Email already exists"));
    }

    let cost = app_state.config.bcrypt_cost;
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::state(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("[Auth] Failed to hash password: {}", e);
            BackendError::state("Failed to hash password")
        })?;

    let user = app_state
        .users
        .create_user(request.full_name.trim().to_string(), &request.email, password_hash)
        .await
        .map_err(|e| match e {
            DirectoryError::EmailTaken => BackendError::bad_request(e.to_string()),
        })?;

    tracing::info!(user_id = %user.id, "[Auth] User created");

    session_response(&app_state, StatusCode::CREATED, user.to_public())
}
