/**
 * Logout Handler
 *
 * POST /api/auth/logout
 *
 * Clears the session cookie. Logging out is always allowed, with or without
 * a valid session. The realtime connection is closed by the client.
 */

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::server::state::AppState;

/// Logout handler
pub async fn logout(State(app_state): State<AppState>) -> Response {
    tracing::debug!("[Auth] Logout");

    (
        StatusCode::OK,
        [(SET_COOKIE, app_state.tokens.cleared_cookie())],
        Json(MessageResponse::new("Logged out successfully")),
    )
        .into_response()
}
