//! Handlers for link management endpoints (list, update, delete, restore).
//!
//! All routes here sit behind the required-auth middleware, so the
//! [`AuthUser`] extension is always present. Existence failures are reported
//! as 404 before ownership is checked (403), uniformly across endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{
    DeleteLinkResponse, LinkListResponse, LinkSummary, RestoreLinkResponse, UpdateLinkRequest,
    UpdateLinkResponse,
};
use crate::domain::identity::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(user.id).await?;

    let now = Utc::now();
    let links = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.token);
            LinkSummary::from_link(link, short_url, now)
        })
        .collect();

    Ok(Json(LinkListResponse { links }))
}

/// Replaces the destination URL of one of the caller's links.
///
/// # Endpoint
///
/// `PUT /api/links/{hash}`
///
/// Only the target URL changes; expiry and active state are untouched.
///
/// # Errors
///
/// - 400 - missing or invalid URL
/// - 403 - link exists but belongs to someone else (or to no one)
/// - 404 - unknown hash
pub async fn update_link_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<UpdateLinkResponse>, AppError> {
    payload.validate()?;

    let url = payload
        .url
        .ok_or_else(|| AppError::bad_request("URL is required", json!({})))?;

    let link = state.link_service.update_link(&hash, &url, user.id).await?;

    Ok(Json(UpdateLinkResponse {
        short_url: state.link_service.short_url(&link.token),
        hash: link.token,
        target_url: link.target_url,
    }))
}

/// Permanently deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{hash}`
///
/// The record is removed outright; the hash stops resolving immediately and
/// may later be re-issued to a new link.
pub async fn delete_link_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    state.link_service.delete_link(&hash, user.id).await?;

    Ok(Json(DeleteLinkResponse {
        success: true,
        message: "Link deleted",
    }))
}

/// Restores one of the caller's links.
///
/// # Endpoint
///
/// `POST /api/links/{hash}/restore`
///
/// Re-activates the link and re-arms the full expiry window from now. Works
/// on expired, deactivated, and still-live links alike.
pub async fn restore_link_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RestoreLinkResponse>, AppError> {
    let link = state.link_service.restore_link(&hash, user.id).await?;

    Ok(Json(RestoreLinkResponse {
        short_url: state.link_service.short_url(&link.token),
        hash: link.token,
        expires_at: link.expires_at,
    }))
}
