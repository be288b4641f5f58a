//! Endpoint configuration for the session store.
//!
//! The original client picked `http://localhost:5001` in development mode
//! and a root-relative path in production; a native client always needs an
//! absolute base, so the config carries one explicitly and `from_env` keeps
//! the development address as its default.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::PresenceError;

/// Default base URL, matching the backend's development port.
pub const DEV_BASE_URL: &str = "http://localhost:5001";

/// Base-URL configuration shared by the HTTP transport and the presence
/// connector.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    base_url: String,
}

impl SessionConfig {
    /// Create a config for the given HTTP base URL (scheme + host + port).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Load from `CHAT_BASE_URL`, falling back to the development default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("CHAT_BASE_URL").unwrap_or_else(|_| DEV_BASE_URL.to_owned());
        Self { base_url }
    }

    /// The configured HTTP base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL with an API path, tolerating a trailing slash.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Derive the presence websocket URL for a user.
    ///
    /// `http` maps to `ws` and `https` to `wss`; the user id rides in the
    /// `userId` query field the backend expects.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::InvalidBaseUrl`] if the base URL has neither
    /// an `http://` nor an `https://` scheme.
    pub fn presence_url(&self, user_id: &str) -> Result<String, PresenceError> {
        let base = self.base_url.trim_end_matches('/');
        if let Some(rest) = base.strip_prefix("http://") {
            return Ok(format!("ws://{rest}/ws?userId={user_id}"));
        }
        if let Some(rest) = base.strip_prefix("https://") {
            return Ok(format!("wss://{rest}/ws?userId={user_id}"));
        }
        Err(PresenceError::InvalidBaseUrl(self.base_url.clone()))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEV_BASE_URL)
    }
}
