//! Error taxonomy for transport and presence failures.
//!
//! DESIGN
//! ======
//! Server rejections carry an optional human-readable `message`; callers
//! never read the error body directly. [`TransportError::user_message`] is
//! the single accessor that decides between the server text and the generic
//! fallback, so a rejection without a body cannot fault a notification path.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

/// Fallback notification text when the server provides no message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// A non-2xx response from an auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status code.
    pub status: u16,
    /// Server-provided message, if the body carried one.
    pub message: Option<String>,
}

/// Conventional error body shape: `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiFailure {
    /// Build a failure from a status code and raw response body.
    ///
    /// A missing or malformed body yields `message: None` rather than an
    /// error; the body shape is a convention, not a contract.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);
        Self { status, message }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "server rejected request ({}): {message}", self.status),
            None => write!(f, "server rejected request ({})", self.status),
        }
    }
}

/// Failures from the HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a usable response.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Rejected(ApiFailure),
    /// A 2xx response body failed to decode.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// The text shown to the user for this failure: the server message when
    /// present, otherwise [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(ApiFailure { message: Some(message), .. }) => message,
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Failures from the presence channel.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// The configured base URL cannot be mapped to a websocket URL.
    #[error("invalid base URL for presence channel: {0}")]
    InvalidBaseUrl(String),
    /// The websocket handshake failed.
    #[error("presence connect failed: {0}")]
    Connect(#[from] Box<tokio_tungstenite::tungstenite::Error>),
}
