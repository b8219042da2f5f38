//! Link entity representing a short token to target URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A short link with its lifecycle state.
///
/// `token` is the public lookup key. `owner_id` is set only for links created
/// by an authenticated user and never changes afterwards; guest links carry
/// no owner and cannot be managed through the API.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub token: String,
    pub target_url: String,
    pub owner_id: Option<Uuid>,
    pub click_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the link may serve redirects: active and not expired.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }

    /// Returns true if `user` may update, delete, or restore this link.
    ///
    /// Guest links (no owner) fail this check for every user.
    pub fn can_mutate(&self, user: Uuid) -> bool {
        self.owner_id == Some(user)
    }
}

/// Input data for persisting a new link.
///
/// Both timestamps are computed by the caller from a single clock reading so
/// that `expires_at - created_at` is exact.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub token: String,
    pub target_url: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
