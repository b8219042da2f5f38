//! Bearer token authentication middleware.
//!
//! Both layers forward the raw token to the identity provider and, on
//! success, insert an [`AuthUser`] request extension for handlers to
//! extract. Token validation is entirely the provider's business — the
//! service never inspects or stores credentials.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;
use tracing::warn;

use crate::domain::identity::AuthUser;
use crate::{error::AppError, state::AppState};

/// Requires a valid bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if:
/// - the Authorization header is missing or malformed
/// - the identity provider rejects the token
/// - the identity provider cannot be reached
pub async fn required(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Authentication required",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = match state.identity.verify_token(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(AppError::unauthorized(
                "Invalid or expired token",
                json!({}),
            ));
        }
        Err(e) => {
            warn!(error = %e, "Identity provider check failed");
            return Err(AppError::unauthorized("Authentication failed", json!({})));
        }
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Attaches an [`AuthUser`] extension when a valid bearer token is present.
///
/// Every failure path — absent header, rejected token, unreachable provider —
/// degrades to an anonymous (guest) request instead of erroring.
pub async fn optional(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let user = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => match state.identity.verify_token(&token).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Identity provider check failed, continuing as guest");
                None
            }
        },
        Err(_) => None,
    };

    let mut req = Request::from_parts(parts, body);
    if let Some(user) = user {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
