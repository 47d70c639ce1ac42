/**
 * User Directory
 *
 * In-memory store of registered users. Accounts live for the lifetime of the
 * process; there is no persistence layer.
 *
 * Emails are compared case-insensitively and must be unique.
 */

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::shared::{AuthUser, UserId};

/// User record as held by the server
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID
    pub id: UserId,
    /// Display name
    pub full_name: String,
    /// Normalized (lowercase) email address
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Profile picture URL
    pub profile_pic: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public view without the password hash
    pub fn to_public(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            profile_pic: self.profile_pic.clone(),
            created_at: self.created_at,
        }
    }
}

/// Errors raised by the directory
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Another account already uses this email
    #[error("Email already exists")]
    EmailTaken,
}

#[derive(Default)]
struct DirectoryInner {
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

/// Shared handle to the user directory
#[derive(Clone, Default)]
pub struct UserDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

/// Lowercase and trim an email for lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new user
    pub async fn create_user(
        &self,
        full_name: String,
        email: &str,
        password_hash: String,
    ) -> Result<User, DirectoryError> {
        let email = normalize_email(email);
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&email) {
            return Err(DirectoryError::EmailTaken);
        }

        let user = User {
            id: UserId::generate(),
            full_name,
            email: email.clone(),
            password_hash,
            profile_pic: String::new(),
            created_at: Utc::now(),
        };

        inner.by_email.insert(email, user.id.clone());
        inner.by_id.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        inner
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, id: &UserId) -> Option<User> {
        self.inner.read().await.by_id.get(id).cloned()
    }

    /// All users except `id`, ordered by name
    pub async fn list_users_except(&self, id: &UserId) -> Vec<AuthUser> {
        let inner = self.inner.read().await;
        let mut users: Vec<AuthUser> = inner
            .by_id
            .values()
            .filter(|user| &user.id != id)
            .map(User::to_public)
            .collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name).then_with(|| a.id.cmp(&b.id)));
        users
    }

    /// Number of registered users
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    /// Whether no users are registered
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }
}
