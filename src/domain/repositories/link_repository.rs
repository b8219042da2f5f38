//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for managing short links.
///
/// The `token` unique constraint is the only cross-request uniqueness
/// enforcer: two concurrent creations racing on the same token are resolved
/// by the store rejecting the second insert.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL backend
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process backend
///   for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when `token` already exists — callers
    /// use this signal to regenerate and retry. Returns
    /// [`AppError::Internal`] on other storage errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError>;

    /// Lists all links created by `owner_id`, newest-created first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError>;

    /// Replaces the target URL of an existing link. Expiry and active state
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `token`.
    async fn update_target(&self, token: &str, target_url: &str) -> Result<Link, AppError>;

    /// Permanently removes a link.
    ///
    /// Returns `Ok(true)` if the link existed and was removed, `Ok(false)`
    /// otherwise.
    async fn delete(&self, token: &str) -> Result<bool, AppError>;

    /// Re-activates a link and replaces its expiry, regardless of prior state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `token`.
    async fn restore(&self, token: &str, expires_at: DateTime<Utc>) -> Result<Link, AppError>;

    /// Increments the click counter for `token`.
    ///
    /// Best-effort: a missing token is not an error, and callers are expected
    /// to log-and-drop failures rather than propagate them.
    async fn increment_clicks(&self, token: &str) -> Result<(), AppError>;
}
