//! HTTP calls to the xfchat API
//!
//! The session lives in the `jwt` cookie, so the underlying `reqwest::Client`
//! keeps a cookie store and every call after login is authenticated.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::shared::{AuthUser, DirectMessage, SendMessageRequest, UserId};

/// Signup form data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Login form data
#[derive(Debug, Clone, Serialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Cookie-backed API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET /api/auth/check
    pub async fn check_auth(&self) -> Result<AuthUser, ClientError> {
        let response = self
            .http
            .get(self.config.api_url("/api/auth/check"))
            .send()
            .await?;
        parse_json(response).await
    }

    /// POST /api/auth/signup
    pub async fn signup(&self, data: &SignupData) -> Result<AuthUser, ClientError> {
        let response = self
            .http
            .post(self.config.api_url("/api/auth/signup"))
            .json(data)
            .send()
            .await?;
        parse_json(response).await
    }

    /// POST /api/auth/login
    pub async fn login(&self, data: &LoginData) -> Result<AuthUser, ClientError> {
        let response = self
            .http
            .post(self.config.api_url("/api/auth/login"))
            .json(data)
            .send()
            .await?;
        parse_json(response).await
    }

    /// POST /api/auth/logout
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.config.api_url("/api/auth/logout"))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// GET /api/messages/users
    pub async fn users(&self) -> Result<Vec<AuthUser>, ClientError> {
        let response = self
            .http
            .get(self.config.api_url("/api/messages/users"))
            .send()
            .await?;
        parse_json(response).await
    }

    /// POST /api/messages/send/{id}
    pub async fn send_message(
        &self,
        receiver: &UserId,
        text: impl Into<String>,
    ) -> Result<DirectMessage, ClientError> {
        let url = self
            .config
            .api_url(&format!("/api/messages/send/{}", receiver));
        let response = self
            .http
            .post(url)
            .json(&SendMessageRequest { text: text.into() })
            .send()
            .await?;
        parse_json(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| status.to_string());

    tracing::debug!(status = status.as_u16(), "[Client] Request failed: {}", message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check_status(response).await?.json().await?)
}
