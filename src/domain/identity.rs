//! Authentication boundary: bearer token in, user identity out.
//!
//! Credential storage, registration, and login all live in an external
//! identity service. The core only ever asks "does this token map to a user".

use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// An authenticated caller, as reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Validates bearer tokens against the external identity service.
///
/// # Implementations
///
/// - [`crate::infrastructure::identity::HttpIdentityProvider`] - forwards the
///   token to the configured identity service over HTTP
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to a user.
    ///
    /// Returns `Ok(None)` when the token is rejected by the provider
    /// (unknown, expired, revoked).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the provider cannot be reached or
    /// answers with something other than a verdict.
    async fn verify_token(&self, token: &str) -> Result<Option<AuthUser>, AppError>;
}
