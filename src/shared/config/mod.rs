//! Application configuration module
//!
//! Configuration shared by anything that talks to an XFChat server: where the
//! server lives. The URL must be an `http` or `https` origin with no path,
//! query or fragment; API and socket URLs are both derived from it.

use reqwest::Url;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.server_url {
            Some(url) => validate_http_url(url),
            None => Ok(()),
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url.map(|url| url.trim_end_matches('/').to_string()),
        };
        config.validate()?;
        Ok(config)
    }
}

fn validate_http_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidUrl(raw.to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid());
    }
    Ok(())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
