//! Messaging HTTP Handlers
//!
//! Both handlers sit behind the auth middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{AuthUser as PublicUser, DirectMessage, SendMessageRequest, ServerEvent, UserId};

/// Body of a successful send
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    #[serde(flatten)]
    pub message: DirectMessage,
    /// Whether the receiver had a live connection to push to
    pub delivered: bool,
}

/// GET /api/messages/users
///
/// Every registered user except the caller, ordered by name.
pub async fn get_users_for_sidebar(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Json<Vec<PublicUser>> {
    let users = app_state.users.list_users_except(&auth.user_id).await;
    tracing::debug!(user_id = %auth.user_id, count = users.len(), "[Messages] Sidebar users");
    Json(users)
}

/// POST /api/messages/send/{id}
///
/// Validates the text, checks the receiver exists, and pushes a `newMessage`
/// event to the receiver if they are online. Returns 201 with the message.
pub async fn send_message(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(receiver): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), BackendError> {
    let receiver_id = UserId::parse(&receiver)?;
    let text = request.validated_text()?;

    if app_state.users.get_user_by_id(&receiver_id).await.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    let message = DirectMessage::new(auth.user_id.clone(), receiver_id.clone(), text);
    let delivered = app_state
        .registry
        .send_to_user(&receiver_id, ServerEvent::NewMessage(message.clone()))
        .await;

    tracing::info!(
        sender = %auth.user_id,
        receiver = %receiver_id,
        delivered,
        "[Messages] Direct message sent"
    );

    Ok((StatusCode::CREATED, Json(SendMessageResponse { message, delivered })))
}
