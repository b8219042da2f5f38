#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::{TestServer, TestServerBuilder};
use chrono::{Duration, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use linkbox_server::application::quota_guard::QuotaGuard;
use linkbox_server::application::services::{LinkService, RedirectService};
use linkbox_server::domain::click_worker::run_click_worker;
use linkbox_server::domain::entities::NewLink;
use linkbox_server::domain::identity::{AuthUser, IdentityProvider};
use linkbox_server::domain::repositories::LinkRepository;
use linkbox_server::error::AppError;
use linkbox_server::infrastructure::persistence::MemoryLinkRepository;
use linkbox_server::routes::app_router;
use linkbox_server::state::AppState;

pub const BASE_URL: &str = "https://links.example.com";

/// Identity provider with a fixed token -> user table, standing in for the
/// external identity service.
#[derive(Default)]
pub struct ScriptedIdentityProvider {
    users: HashMap<String, AuthUser>,
}

impl ScriptedIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: &str, id: Uuid) -> Self {
        self.users.insert(token.to_string(), AuthUser { id });
        self
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Option<AuthUser>, AppError> {
        Ok(self.users.get(token).copied())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<MemoryLinkRepository>,
}

/// Spawns the full router over a memory store with the click worker running.
pub fn spawn_app(identity: ScriptedIdentityProvider) -> TestApp {
    build_app(identity, 100, ClickQueue::Worker)
}

/// Spawns the app with a closed click channel: every `try_send` from the
/// redirect path fails immediately.
pub fn spawn_app_with_dead_click_queue(identity: ScriptedIdentityProvider) -> TestApp {
    build_app(identity, 100, ClickQueue::Closed)
}

/// Spawns the app with a tiny click queue and no consumer, so the queue
/// fills up and stays full.
pub fn spawn_app_with_stuck_click_queue(identity: ScriptedIdentityProvider) -> TestApp {
    build_app(identity, 1, ClickQueue::Stuck)
}

enum ClickQueue {
    Worker,
    Closed,
    Stuck,
}

fn build_app(identity: ScriptedIdentityProvider, capacity: usize, queue: ClickQueue) -> TestApp {
    let repository = Arc::new(MemoryLinkRepository::new());
    let repo: Arc<dyn LinkRepository> = repository.clone();

    let (click_tx, click_rx) = mpsc::channel(capacity);
    match queue {
        ClickQueue::Worker => {
            tokio::spawn(run_click_worker(click_rx, repo.clone()));
        }
        ClickQueue::Closed => drop(click_rx),
        ClickQueue::Stuck => std::mem::forget(click_rx),
    }

    let quota = Arc::new(QuotaGuard::new(Duration::hours(1)));
    let link_service = Arc::new(LinkService::new(
        repo.clone(),
        quota,
        BASE_URL.to_string(),
        Duration::days(31),
    ));
    let redirect_service = Arc::new(RedirectService::new(repo));

    let state = AppState {
        link_service,
        redirect_service,
        identity: Arc::new(identity),
        click_sender: click_tx,
    };

    let config = TestServerBuilder::new().http_transport().into_config();
    let server = TestServer::new_with_config(
        app_router(state).into_make_service_with_connect_info::<SocketAddr>(),
        config,
    )
    .unwrap();

    TestApp { server, repository }
}

pub async fn seed_link(
    repository: &MemoryLinkRepository,
    token: &str,
    url: &str,
    owner_id: Option<Uuid>,
) {
    let now = Utc::now();
    repository
        .insert(NewLink {
            token: token.to_string(),
            target_url: url.to_string(),
            owner_id,
            created_at: now,
            expires_at: now + Duration::days(31),
        })
        .await
        .unwrap();
}

pub async fn seed_expired_link(
    repository: &MemoryLinkRepository,
    token: &str,
    url: &str,
    owner_id: Option<Uuid>,
) {
    let now = Utc::now();
    repository
        .insert(NewLink {
            token: token.to_string(),
            target_url: url.to_string(),
            owner_id,
            created_at: now - Duration::days(40),
            expires_at: now - Duration::days(9),
        })
        .await
        .unwrap();
}
