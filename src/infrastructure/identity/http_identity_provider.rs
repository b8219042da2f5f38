//! HTTP client for the external identity service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::identity::{AuthUser, IdentityProvider};
use crate::error::AppError;

/// Identity provider backed by a remote HTTP service.
///
/// Forwards the caller's bearer token to `GET {base_url}/user` and reads the
/// user id from the JSON response. A 401/403 from the service is a verdict
/// ("not a user"), not an error.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: Uuid,
}

impl HttpIdentityProvider {
    /// Creates a provider for the identity service at `base_url`.
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Option<AuthUser>, AppError> {
        let url = format!("{}/user", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                AppError::internal(
                    "Identity provider unreachable",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::internal(
                "Identity provider error",
                json!({ "status": status.as_u16() }),
            ));
        }

        let user: UserResponse = response.json().await.map_err(|e| {
            AppError::internal(
                "Invalid identity provider response",
                json!({ "reason": e.to_string() }),
            )
        })?;

        Ok(Some(AuthUser { id: user.id }))
    }
}
