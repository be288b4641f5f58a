//! Wire types for the `/auth/*` endpoints.
//!
//! Field names mirror the backend's JSON (`_id`, camelCase), so every struct
//! carries serde rename attributes rather than leaking wire spelling into
//! Rust code.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The authenticated user record returned by check/signup/login and
/// update-profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Unique user identifier (`_id` on the wire).
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Account email.
    pub email: String,
    /// Avatar image URL or data URI, if set.
    #[serde(rename = "profilePic", default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    /// Account creation timestamp, if the endpoint includes it.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Registration payload. Validated upstream; the store sends it as-is.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields stay out of the PUT body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "profilePic", skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}
