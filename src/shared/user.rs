/**
 * User Identity Types
 *
 * Defines the `UserId` newtype used everywhere a user is referenced, and the
 * public `AuthUser` record returned by the auth API.
 *
 * # Validation
 *
 * A `UserId` is opaque to this crate but must be well-formed. Parsing rejects:
 * - empty or blank values
 * - values longer than 64 bytes
 * - whitespace or control characters
 * - the literal strings `undefined` and `null`, which is what a client
 *   sends when it forgets to fill in the field
 */

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::error::SharedError;

/// Maximum accepted length of a user id in bytes
pub const MAX_USER_ID_LEN: usize = 64;

/// Validated, opaque user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse and validate a raw user id
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, SharedError> {
        let raw = raw.as_ref();

        if raw.trim().is_empty() {
            return Err(SharedError::validation("userId", "user id is required"));
        }
        if raw.len() > MAX_USER_ID_LEN {
            return Err(SharedError::validation(
                "userId",
                format!("user id exceeds {} bytes", MAX_USER_ID_LEN),
            ));
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(SharedError::validation(
                "userId",
                "user id must not contain whitespace or control characters",
            ));
        }
        if raw == "undefined" || raw == "null" {
            return Err(SharedError::validation("userId", "user id is not set"));
        }

        Ok(Self(raw.to_string()))
    }

    /// Generate a fresh random user id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        UserId::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Public view of a user, safe to send to clients
///
/// Field names follow the JSON shape the chat frontend already consumes,
/// including the `_id` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Stable user identifier
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name
    pub full_name: String,
    /// Email address
    pub email: String,
    /// Profile picture URL (empty when unset)
    #[serde(default)]
    pub profile_pic: String,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}
