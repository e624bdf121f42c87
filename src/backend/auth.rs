//! Credential endpoints of the backend (`/auth/v1`).

use super::error_message;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::session::{Session, SessionUser};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Sign-in, refresh and sign-out. The session gate only needs these three.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session>;

    async fn refresh(&self, refresh_token: &str) -> AppResult<Session>;

    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| Utc::now().timestamp() + self.expires_in.unwrap_or(3600));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(cfg: &Config) -> AppResult<Self> {
        let (url, key) = cfg.backend()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: url.to_string(),
            anon_key: key.to_string(),
        })
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> AppResult<Session> {
        debug!(%grant_type, "auth token request");
        let resp = self
            .client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Session(error_message(&text, status.as_u16())));
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.into_session())
    }
}

impl AuthApi for AuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<Session> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let resp = self
            .client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Session(error_message(&text, status.as_u16())));
        }
        Ok(())
    }
}
