/**
 * Direct Message Types
 *
 * A direct message is pushed to its receiver in real time when the receiver
 * is online. Messages are not stored by the server.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::user::UserId;

/// Maximum accepted message length in characters
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Direct message from one user to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    /// Unique message id
    #[serde(rename = "_id")]
    pub id: uuid::Uuid,
    /// Sending user
    pub sender_id: UserId,
    /// Receiving user
    pub receiver_id: UserId,
    /// Message body
    pub text: String,
    /// Time the server accepted the message
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    /// Create a new message stamped with the current time
    pub fn new(sender_id: UserId, receiver_id: UserId, text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            sender_id,
            receiver_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Body of `POST /api/messages/send/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Message body
    pub text: String,
}

impl SendMessageRequest {
    /// Trim and validate the message body
    pub fn validated_text(&self) -> Result<String, SharedError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(SharedError::validation("text", "Message text cannot be empty"));
        }
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(SharedError::validation(
                "text",
                format!("Message text exceeds {} characters", MAX_MESSAGE_LEN),
            ));
        }
        Ok(text.to_string())
    }
}
