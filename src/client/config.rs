//! Client configuration
//!
//! Wraps the shared `AppConfig` with the URL helpers and reconnect policy used
//! by the session adapter.

use reqwest::Url;

use crate::client::reconnect::ReconnectPolicy;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use crate::shared::UserId;

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5002";

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    app: AppConfig,
    reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Configuration pointing at `server_url`
    pub fn new(server_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_builder(AppConfig::builder().server_url(server_url))
    }

    /// Configuration from `XFCHAT_SERVER_URL`, falling back to the local dev server
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = std::env::var("XFCHAT_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(server_url)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        if app.server_url.is_none() {
            return Err(ConfigError::MissingValue("server_url"));
        }
        Ok(Self {
            app,
            reconnect: ReconnectPolicy::default(),
        })
    }

    /// Replace the reconnect policy
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn reconnect(&self) -> &ReconnectPolicy {
        &self.reconnect
    }

    /// Base server URL without a trailing slash
    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    /// WebSocket URL carrying `user_id` in the handshake query
    pub fn socket_url(&self, user_id: &UserId) -> Result<Url, ConfigError> {
        let invalid = || ConfigError::InvalidUrl(self.server_url().to_string());

        let mut url = Url::parse(self.server_url()).map_err(|_| invalid())?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme).map_err(|_| invalid())?;
        url.set_path("/ws");
        url.query_pairs_mut()
            .clear()
            .append_pair("userId", user_id.as_str());
        Ok(url)
    }
}
