/**
 * Session Management and JWT Tokens
 *
 * Issues and verifies the HS256 tokens that identify a logged-in user. The
 * token travels in the `jwt` HttpOnly cookie, and is also accepted as an
 * `Authorization: Bearer` header.
 */

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::UserId;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "jwt";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
    secure_cookie: bool,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .field("secure_cookie", &self.secure_cookie)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from a shared secret
    pub fn new(secret: &[u8], ttl_secs: u64, secure_cookie: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
            secure_cookie,
        }
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Create a JWT token for a user
    pub fn create_token(&self, user_id: &UserId) -> Result<String, jsonwebtoken::errors::Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now.saturating_add(self.ttl_secs),
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify and decode a JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// Extract the user id from a token
    pub fn user_id_from_token(&self, token: &str) -> Result<UserId, String> {
        let claims = self
            .verify_token(token)
            .map_err(|e| format!("Token verification failed: {}", e))?;
        UserId::parse(&claims.sub).map_err(|e| format!("Invalid user ID in token: {}", e))
    }

    /// `Set-Cookie` value carrying a fresh session token
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
            SESSION_COOKIE, token, self.ttl_secs
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that clears the session
    pub fn cleared_cookie(&self) -> String {
        format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Strict", SESSION_COOKIE)
    }
}

/// Find the session token in a `Cookie` header value
///
/// A value wrapped in double quotes is unwrapped, as RFC 6265 allows.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
        .filter(|value| !value.is_empty())
}
