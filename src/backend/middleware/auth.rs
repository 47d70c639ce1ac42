/**
 * Authentication Middleware
 *
 * Protects routes that require a logged-in user. The session token is read
 * from the `jwt` cookie, or from an `Authorization: Bearer` header when no
 * cookie is present. The verified user is attached to the request
 * extensions for handlers to pick up through the `AuthUser` extractor.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::token_from_cookie_header;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::AuthUser as PublicUser;
use crate::shared::UserId;

/// Authenticated user data attached by the middleware
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub user: PublicUser,
}

/// Pull the session token out of the request headers
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
        .map(str::to_string);

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Authentication middleware
///
/// 1. Extracts the token from the cookie or Authorization header
/// 2. Verifies the token
/// 3. Loads the user from the directory
/// 4. Attaches the user to request extensions
///
/// Returns 401 if the token is missing or invalid, 404 if the user no longer exists.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = extract_token(request.headers()).ok_or_else(|| {
        tracing::debug!("[Auth] Missing session token");
        BackendError::unauthorized("Unauthorized - No Token Provided")
    })?;

    let user_id = app_state.tokens.user_id_from_token(&token).map_err(|e| {
        tracing::warn!("[Auth] Invalid token: {}", e);
        BackendError::unauthorized("Unauthorized - Invalid Token")
    })?;

    let user = app_state
        .users
        .get_user_by_id(&user_id)
        .await
        .ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "[Auth] Token for unknown user");
            BackendError::not_found("User not found")
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        user: user.to_public(),
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Unauthorized - No Token Provided")
            })
    }
}
