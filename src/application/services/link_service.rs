//! Link creation and lifecycle service.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::application::quota_guard::QuotaGuard;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::token::generate_token;

/// Token insert attempts before creation is abandoned.
///
/// At ~57 bits of token entropy, repeated collisions indicate a store
/// problem rather than bad luck, so exhaustion is treated as fatal.
const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Service for creating and managing short links.
///
/// Composes the token generator, the link store, and the guest quota guard.
/// Ownership is enforced here: existence failures surface as `NotFound`
/// before the ownership check, which surfaces as `Forbidden`.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    quota: Arc<QuotaGuard>,
    base_url: String,
    link_ttl: Duration,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `base_url` - public base of the redirect service, used to build the
    ///   display form of short links
    /// - `link_ttl` - lifetime granted at creation and on restoration
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        quota: Arc<QuotaGuard>,
        base_url: String,
        link_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            quota,
            base_url,
            link_ttl,
        }
    }

    /// Creates a short link.
    ///
    /// Guests (no `owner`) are subject to the creation cooldown, keyed by
    /// `client_ip`; the cooldown is only consumed when the link is actually
    /// persisted. The new link is active and expires `link_ttl` after
    /// creation.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - `target_url` is not an absolute URL
    /// - [`AppError::QuotaExceeded`] - guest cooldown active, with remaining
    ///   wait in whole minutes
    /// - [`AppError::AllocationExhausted`] - token collision retries exhausted
    pub async fn create_link(
        &self,
        target_url: &str,
        owner: Option<Uuid>,
        client_ip: IpAddr,
    ) -> Result<Link, AppError> {
        validate_target_url(target_url)?;

        let reservation = match owner {
            Some(_) => None,
            None => Some(self.quota.try_reserve(client_ip).map_err(|minutes| {
                AppError::quota_exceeded(
                    "Guests can only create 1 link per hour. Please login for unlimited links.",
                    minutes,
                )
            })?),
        };

        match self.insert_with_fresh_token(target_url, owner).await {
            Ok(link) => Ok(link),
            Err(e) => {
                // the failed create must not burn the guest's quota slot
                if let Some(reservation) = reservation {
                    self.quota.rollback(reservation);
                }
                Err(e)
            }
        }
    }

    /// Lists all links owned by `owner`, newest first.
    pub async fn list_links(&self, owner: Uuid) -> Result<Vec<Link>, AppError> {
        self.repository.list_by_owner(owner).await
    }

    /// Replaces the target URL of a link owned by `user`.
    ///
    /// Expiry and active state are untouched.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - new URL is not absolute
    /// - [`AppError::NotFound`] - unknown token
    /// - [`AppError::Forbidden`] - link exists but is not owned by `user`
    pub async fn update_link(
        &self,
        token: &str,
        target_url: &str,
        user: Uuid,
    ) -> Result<Link, AppError> {
        validate_target_url(target_url)?;
        self.load_owned(token, user).await?;

        self.repository.update_target(token, target_url).await
    }

    /// Permanently deletes a link owned by `user`.
    ///
    /// # Errors
    ///
    /// See [`Self::update_link`] for the existence/ownership cases.
    pub async fn delete_link(&self, token: &str, user: Uuid) -> Result<(), AppError> {
        self.load_owned(token, user).await?;

        let deleted = self.repository.delete(token).await?;
        if !deleted {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "hash": token }),
            ));
        }

        Ok(())
    }

    /// Restores a link owned by `user`: re-activates it and re-arms the full
    /// expiry window from now, regardless of whether it was deactivated,
    /// expired, or still live.
    ///
    /// # Errors
    ///
    /// See [`Self::update_link`] for the existence/ownership cases.
    pub async fn restore_link(&self, token: &str, user: Uuid) -> Result<Link, AppError> {
        self.load_owned(token, user).await?;

        let expires_at = Utc::now() + self.link_ttl;
        self.repository.restore(token, expires_at).await
    }

    /// Constructs the user-facing short URL for a token.
    pub fn short_url(&self, token: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), token)
    }

    /// Loads a link and verifies `user` may mutate it.
    async fn load_owned(&self, token: &str, user: Uuid) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "hash": token })))?;

        if !link.can_mutate(user) {
            return Err(AppError::forbidden(
                "Not authorized to manage this link",
                json!({ "hash": token }),
            ));
        }

        Ok(link)
    }

    /// Allocates a unique token and persists the link.
    ///
    /// Collisions are resolved by regenerating a fresh random token, never by
    /// mutating the colliding one. Retries are sequential and bounded.
    async fn insert_with_fresh_token(
        &self,
        target_url: &str,
        owner: Option<Uuid>,
    ) -> Result<Link, AppError> {
        let now = Utc::now();

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let new_link = NewLink {
                token: generate_token(),
                target_url: target_url.to_string(),
                owner_id: owner,
                created_at: now,
                expires_at: now + self.link_ttl,
            };

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(attempt, "Token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(
            attempts = MAX_ALLOCATION_ATTEMPTS,
            "Token allocation exhausted; store may be misbehaving"
        );
        Err(AppError::allocation_exhausted(
            "Failed to allocate a unique token",
        ))
    }
}

/// Validates that a target URL is absolute: parseable, with a scheme and host.
///
/// The URL is never fetched or followed.
fn validate_target_url(raw: &str) -> Result<(), AppError> {
    let parsed = Url::parse(raw)
        .map_err(|e| AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() })))?;

    if parsed.host_str().is_none() {
        return Err(AppError::bad_request(
            "Invalid URL",
            json!({ "reason": "URL must have a host" }),
        ));
    }

    Ok(())
}
