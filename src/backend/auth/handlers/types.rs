/**
 * Authentication Handler Types
 *
 * Request and response bodies used by the signup, login, logout and check
 * handlers. Field names follow the camelCase JSON used by the frontend.
 */

use serde::{Deserialize, Serialize};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name
    #[serde(default)]
    pub full_name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Plain password (hashed before storage)
    #[serde(default)]
    pub password: String,
}

impl SignupRequest {
    /// Check required fields, returning the message shown to the user on failure
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.full_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err("All fields are required");
        }
        if !is_plausible_email(&self.email) {
            return Err("Invalid email format");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }
        Ok(())
    }
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Plain `{"message": ...}` acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Basic email shape check: one '@' with text on both sides and a dot in the domain
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
