//! HTTP transport for the `/auth/*` endpoints.
//!
//! The trait exists so the store can be exercised against a scripted mock;
//! [`HttpTransport`] is the real implementation. The session rides on a
//! cookie, so the client keeps a cookie store and all calls go through the
//! same instance.

use async_trait::async_trait;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{ApiFailure, TransportError};
use crate::types::{AuthUser, LoginRequest, ProfileUpdate, SignupRequest};

/// Async seam over the five auth endpoints. Enables mocking in tests.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// `GET /auth/check` — validate the ambient session cookie.
    async fn check(&self) -> Result<AuthUser, TransportError>;
    /// `POST /auth/signup` — create an account.
    async fn signup(&self, req: &SignupRequest) -> Result<AuthUser, TransportError>;
    /// `POST /auth/login` — authenticate.
    async fn login(&self, req: &LoginRequest) -> Result<AuthUser, TransportError>;
    /// `POST /auth/logout` — end the session.
    async fn logout(&self) -> Result<(), TransportError>;
    /// `PUT /auth/update-profile` — mutate profile fields.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser, TransportError>;
}

/// Reqwest-backed transport with a cookie store for the session cookie.
pub struct HttpTransport {
    client: reqwest::Client,
    config: SessionConfig,
}

impl HttpTransport {
    /// Build a transport for the given config.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if client construction
    /// fails (TLS backend initialization).
    pub fn new(config: SessionConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client, config })
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, TransportError> {
        let url = self.config.api_url(path);
        debug!(target: "chat_session::transport", %method, %url, "auth request");

        let request = self.client.request(method, &url);
        let request = match body {
            Some(json) => request.json(&json),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(TransportError::Rejected(ApiFailure::from_body(status.as_u16(), &text)))
        }
    }

    async fn send_expect_user(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<AuthUser, TransportError> {
        let text = self.send(method, path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl AuthTransport for HttpTransport {
    async fn check(&self) -> Result<AuthUser, TransportError> {
        self.send_expect_user(reqwest::Method::GET, "/auth/check", None)
            .await
    }

    async fn signup(&self, req: &SignupRequest) -> Result<AuthUser, TransportError> {
        let body = serde_json::to_value(req)?;
        self.send_expect_user(reqwest::Method::POST, "/auth/signup", Some(body))
            .await
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthUser, TransportError> {
        let body = serde_json::to_value(req)?;
        self.send_expect_user(reqwest::Method::POST, "/auth/login", Some(body))
            .await
    }

    async fn logout(&self) -> Result<(), TransportError> {
        self.send(reqwest::Method::POST, "/auth/logout", None).await?;
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser, TransportError> {
        let body = serde_json::to_value(update)?;
        self.send_expect_user(reqwest::Method::PUT, "/auth/update-profile", Some(body))
            .await
    }
}
