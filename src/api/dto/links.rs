//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Response for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkSummary>,
}

/// JSON representation of one owned link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSummary {
    pub hash: String,
    pub short_url: String,
    pub target_url: String,
    pub clicks: i64,
    pub is_active: bool,
    /// True when the expiry time has passed; deactivated-but-unexpired links
    /// keep `expired: false` with `isActive: false`.
    pub expired: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LinkSummary {
    /// Builds the display form of a link, labeling expiry against `now`.
    pub fn from_link(link: Link, short_url: String, now: DateTime<Utc>) -> Self {
        let expired = link.is_expired(now);
        Self {
            hash: link.token,
            short_url,
            target_url: link.target_url,
            clicks: link.click_count,
            is_active: link.is_active,
            expired,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

/// Request body for `PUT /api/links/{hash}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL. Required; `Option` only so a missing field maps
    /// to a 400.
    #[validate(url(message = "Invalid URL"))]
    pub url: Option<String>,
}

/// Response for a successful update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkResponse {
    pub hash: String,
    pub short_url: String,
    pub target_url: String,
}

/// Response for a successful restoration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreLinkResponse {
    pub hash: String,
    pub short_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Response for a successful deletion.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub success: bool,
    pub message: &'static str,
}
