/**
 * Server Configuration
 *
 * Loads `ServerConfig` from an optional TOML file and environment variables.
 *
 * # Configuration Sources
 *
 * 1. Built-in defaults suitable for local development
 * 2. The TOML file named by `XFCHAT_CONFIG`, if set
 * 3. Environment variables (after `.env` is loaded by the binary)
 *
 * Later sources override earlier ones.
 *
 * # Environment Variables
 *
 * | Variable         | Meaning                                        |
 * |------------------|------------------------------------------------|
 * | `HOST`           | Bind address (default `0.0.0.0`)               |
 * | `PORT`           | Bind port (default `5002`)                     |
 * | `JWT_SECRET`     | Token signing secret (required in production)  |
 * | `CLIENT_ORIGIN`  | Allowed CORS origin (default Vite dev server)  |
 * | `STATIC_DIR`     | Built frontend to serve in production          |
 * | `NODE_ENV`       | `production` enables production mode           |
 * | `APP_ENV`        | Same as `NODE_ENV`, takes precedence           |
 * | `BCRYPT_COST`    | bcrypt work factor (4-31)                      |
 * | `TOKEN_TTL_DAYS` | Session lifetime in days                       |
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::Deserialize;

use crate::shared::ConfigError;

/// Default bind port
pub const DEFAULT_PORT: u16 = 5002;

/// Default CORS origin (frontend dev server)
pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";

/// Default directory of the built frontend in production
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

/// Default session lifetime
pub const DEFAULT_TOKEN_TTL_DAYS: u64 = 7;

/// Longest accepted session lifetime, in days
pub const MAX_TOKEN_TTL_DAYS: u64 = 3650;

const DEV_JWT_SECRET: &str = "xfchat-dev-secret-change-in-production";

/// Runtime configuration of the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: String,
    /// Allowed CORS origin; `None` disables the CORS layer
    pub client_origin: Option<String>,
    /// Serve this directory as the frontend; `None` disables static serving
    pub static_dir: Option<PathBuf>,
    /// Production mode (secure cookies, static serving by default)
    pub production: bool,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Session lifetime in days
    pub token_ttl_days: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            client_origin: Some(DEFAULT_CLIENT_ORIGIN.to_string()),
            static_dir: None,
            production: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
        }
    }
}

/// Optional values read from the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub client_origin: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub production: Option<bool>,
    pub bcrypt_cost: Option<u32>,
    pub token_ttl_days: Option<u64>,
}

impl FileConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

impl ServerConfig {
    /// Load configuration from `XFCHAT_CONFIG` and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match std::env::var("XFCHAT_CONFIG") {
            Ok(path) => {
                tracing::info!("[Config] Loading config file {}", path);
                FileConfig::from_path(&path)?
            }
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge defaults, file values and variables from `lookup`
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let production = match lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            Some(env) => env.eq_ignore_ascii_case("production"),
            None => file.production.unwrap_or(defaults.production),
        };

        let host = match lookup("HOST") {
            Some(raw) => parse_value("HOST", &raw)?,
            None => file.host.unwrap_or(defaults.host),
        };
        let port = match lookup("PORT") {
            Some(raw) => parse_value("PORT", &raw)?,
            None => file.port.unwrap_or(defaults.port),
        };
        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => parse_value("BCRYPT_COST", &raw)?,
            None => file.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is outside 4..=31", bcrypt_cost),
            });
        }
        let token_ttl_days = match lookup("TOKEN_TTL_DAYS") {
            Some(raw) => parse_value("TOKEN_TTL_DAYS", &raw)?,
            None => file.token_ttl_days.unwrap_or(defaults.token_ttl_days),
        };
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&token_ttl_days) {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_DAYS",
                message: format!("{} is outside 1..={}", token_ttl_days, MAX_TOKEN_TTL_DAYS),
            });
        }

        let jwt_secret = match lookup("JWT_SECRET").or(file.jwt_secret) {
            Some(secret) if !secret.is_empty() => secret,
            _ if production => return Err(ConfigError::MissingValue("JWT_SECRET")),
            _ => {
                tracing::warn!("[Config] JWT_SECRET not set, using development secret");
                defaults.jwt_secret
            }
        };

        let client_origin = lookup("CLIENT_ORIGIN")
            .or(file.client_origin)
            .or(defaults.client_origin)
            .filter(|origin| !origin.is_empty());

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .or(file.static_dir)
            .or_else(|| production.then(|| PathBuf::from(DEFAULT_STATIC_DIR)));

        Ok(Self {
            host,
            port,
            jwt_secret,
            client_origin,
            static_dir,
            production,
            bcrypt_cost,
            token_ttl_days,
        })
    }

    /// Address to bind the listener to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Session lifetime in seconds
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_days.saturating_mul(24 * 60 * 60)
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}
