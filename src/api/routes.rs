//! API route configuration.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, restore_link_handler,
    update_link_handler,
};
use crate::api::middleware::{auth, rate_limit};
use crate::state::AppState;

/// All `/api` routes.
///
/// # Endpoints
///
/// - `POST   /create`               - Create a short link (auth optional)
/// - `GET    /links`                - List own links
/// - `PUT    /links/{hash}`         - Replace a link's destination
/// - `DELETE /links/{hash}`         - Permanently delete a link
/// - `POST   /links/{hash}/restore` - Re-activate and re-arm expiry
///
/// Creation runs behind the optional-auth layer and the public rate limit;
/// everything else requires a bearer token and gets the more lenient
/// authenticated rate limit.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/create", post(create_link_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional,
        ))
        .layer(rate_limit::layer());

    let protected = Router::new()
        .route("/links", get(list_links_handler))
        .route(
            "/links/{hash}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route("/links/{hash}/restore", post(restore_link_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::required))
        .layer(rate_limit::authed_layer());

    public.merge(protected)
}
