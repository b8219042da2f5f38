//! Handler for short link redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::services::Resolution;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Terminal page for unknown tokens.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundPage;

/// Terminal page for expired or deactivated links.
#[derive(Template, WebTemplate)]
#[template(path = "expired.html")]
struct ExpiredPage;

/// Redirects a short token to its target URL.
///
/// # Endpoint
///
/// `GET /{hash}`
///
/// # Outcomes
///
/// - **302 Found** with `Location` when the link is active and unexpired
/// - **404** with a themed HTML page when no such link exists
/// - **410 Gone** with a themed HTML page when the link exists but is
///   expired or deactivated
///
/// # Click Tracking
///
/// On success a click event is pushed onto a bounded channel for the
/// background worker. The send is non-blocking and its failure (queue full,
/// worker gone) never affects the redirect: the response is sent without
/// waiting for the counter update.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.redirect_service.resolve(&hash).await? {
        Resolution::Redirect(target_url) => {
            if state.click_sender.try_send(ClickEvent::new(hash)).is_err() {
                debug!("Click queue unavailable, dropping event");
            }

            Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]).into_response())
        }
        Resolution::NotFound => Ok((StatusCode::NOT_FOUND, NotFoundPage).into_response()),
        Resolution::Expired => Ok((StatusCode::GONE, ExpiredPage).into_response()),
    }
}
