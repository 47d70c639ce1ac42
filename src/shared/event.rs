/**
 * Realtime Socket Events
 *
 * This module defines the closed set of events the server pushes to clients
 * over the realtime socket. Each event is a JSON text frame tagged with its
 * name:
 *
 * ```json
 * {"event":"getOnlineUsers","data":["u1","u2"]}
 * {"event":"newMessage","data":{"_id":"...","senderId":"u1",...}}
 * ```
 *
 * New kinds of push are added as new variants; an existing event name is
 * never reused for a different payload.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::message::DirectMessage;
use crate::shared::user::UserId;

/// Wire name of the presence update event
pub const ONLINE_USERS_EVENT: &str = "getOnlineUsers";

/// Wire name of the direct message push event
pub const NEW_MESSAGE_EVENT: &str = "newMessage";

/// Server-to-client socket event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full list of currently online user ids (set semantics)
    #[serde(rename = "getOnlineUsers")]
    OnlineUsers(Vec<UserId>),
    /// A direct message addressed to the receiving user
    #[serde(rename = "newMessage")]
    NewMessage(DirectMessage),
}

impl ServerEvent {
    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            Self::OnlineUsers(_) => ONLINE_USERS_EVENT,
            Self::NewMessage(_) => NEW_MESSAGE_EVENT,
        }
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame
    pub fn from_json(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }
}
