//! Handler for the link creation endpoint.

use std::net::SocketAddr;

use axum::{Extension, Json, extract::ConnectInfo, extract::State};
use serde_json::json;
use validator::Validate;

use crate::api::dto::create_link::{CreateLinkRequest, CreateLinkResponse};
use crate::domain::identity::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/create`
///
/// Authentication is optional: with a valid bearer token the link is owned
/// by the caller and exempt from the guest cooldown; without one it is a
/// guest link — create-only, throttled to one per hour per client address.
///
/// # Errors
///
/// - 400 - missing or invalid URL
/// - 429 - guest cooldown active (`retryAfterMinutes` in the error details)
/// - 500 - token allocation or store failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>, AppError> {
    payload.validate()?;

    let url = payload
        .url
        .ok_or_else(|| AppError::bad_request("URL is required", json!({})))?;

    let owner = user.map(|Extension(user)| user.id);

    let link = state
        .link_service
        .create_link(&url, owner, addr.ip())
        .await?;

    Ok(Json(CreateLinkResponse {
        short_url: state.link_service.short_url(&link.token),
        hash: link.token,
        target_url: link.target_url,
        expires_at: link.expires_at,
        is_guest: owner.is_none(),
    }))
}
