//! DTOs for the link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/create`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The destination URL (must be absolute). Required; modeled as an
    /// `Option` so that a missing field is reported as a 400 rather than a
    /// deserialization rejection.
    #[validate(url(message = "Invalid URL"))]
    pub url: Option<String>,
}

/// Response for a successfully created link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub hash: String,
    pub short_url: String,
    pub target_url: String,
    pub expires_at: DateTime<Utc>,
    pub is_guest: bool,
}
