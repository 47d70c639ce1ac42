/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `POST /api/auth/logout` - Clear the session cookie
 * - `GET /api/auth/check` - Current user (protected)
 *
 * ## Messages
 * - `GET /api/messages/users` - Sidebar users (protected)
 * - `POST /api/messages/send/{id}` - Direct message (protected)
 *
 * Any other path under `/api` answers 404 JSON, even when the frontend is
 * served from the same router.
 */

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};

use crate::backend::auth::{check_auth, login, logout, signup};
use crate::backend::error::BackendError;
use crate::backend::messaging::{get_users_for_sidebar, send_message};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Protected routes get the auth middleware as a route layer so it only runs
/// for requests that matched one of them.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/check", get(check_auth))
        .route("/api/messages/users", get(get_users_for_sidebar))
        .route("/api/messages/send/{id}", post(send_message))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .merge(protected)
        .route("/api/{*path}", any(route_not_found))
}

/// JSON 404 for unknown routes
pub async fn route_not_found() -> BackendError {
    BackendError::not_found("Route not found")
}
