/**
 * Check Handler
 *
 * GET /api/auth/check (protected)
 *
 * Returns the user attached by the auth middleware. Clients call this on
 * startup to restore a session from the cookie.
 */

use axum::Json;

use crate::backend::middleware::AuthUser;
use crate::shared::AuthUser as PublicUser;

/// Current user handler
pub async fn check_auth(AuthUser(auth): AuthUser) -> Json<PublicUser> {
    tracing::debug!(user_id = %auth.user_id, "[Auth] Session check");
    Json(auth.user)
}
