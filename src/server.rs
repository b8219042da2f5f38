//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, worker spawning, and the Axum server
//! lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::mpsc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use crate::application::quota_guard::QuotaGuard;
use crate::application::services::{LinkService, RedirectService};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::identity::IdentityProvider;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::identity::HttpIdentityProvider;
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the link store (PostgreSQL pool + migrations, or the in-memory fallback)
/// - the identity provider client
/// - the background click worker
/// - the Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migration run, or server
/// bind fails.
pub async fn run(config: Config) -> Result<()> {
    let repository: Arc<dyn LinkRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations").run(&pool).await?;

            Arc::new(PgLinkRepository::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; links will not survive a restart");
            Arc::new(MemoryLinkRepository::new())
        }
    };

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(HttpIdentityProvider::new(config.identity_url.clone())?);

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(click_rx, repository.clone()));
    tracing::info!("Click worker started");

    let quota = Arc::new(QuotaGuard::new(Duration::minutes(
        config.guest_cooldown_minutes,
    )));

    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        quota,
        config.base_url.clone(),
        Duration::days(config.link_ttl_days),
    ));
    let redirect_service = Arc::new(RedirectService::new(repository));

    let state = AppState {
        link_service,
        redirect_service,
        identity,
        click_sender: click_tx,
    };

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
