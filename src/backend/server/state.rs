/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is constructed once in `create_app` and cloned into every
 * handler. It holds:
 * - The connection registry (online users and their sockets)
 * - The user directory
 * - The token service used for sessions
 * - The resolved server configuration
 *
 * Every field is a cheap handle around shared state, so cloning `AppState`
 * never copies data.
 *
 * # Example
 *
 * ```rust
 * use xfchat::backend::realtime::ConnectionRegistry;
 * use axum::extract::State;
 *
 * async fn handler(State(registry): State<ConnectionRegistry>) {
 *     let online = registry.online_users().await;
 *     // ...
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenService;
use crate::backend::auth::users::UserDirectory;
use crate::backend::realtime::ConnectionRegistry;
use crate::backend::server::config::ServerConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Online users and their live socket connections
    pub registry: ConnectionRegistry,

    /// Registered users
    pub users: UserDirectory,

    /// Session token signing and verification
    pub tokens: TokenService,

    /// Resolved server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build fresh state from configuration
    pub fn new(config: ServerConfig) -> Self {
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl_secs(),
            config.production,
        );

        Self {
            registry: ConnectionRegistry::new(),
            users: UserDirectory::new(),
            tokens,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for ConnectionRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for UserDirectory {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
