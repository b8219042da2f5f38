mod common;

use axum::http::StatusCode;

use common::{ScriptedIdentityProvider, spawn_app, spawn_app_with_dead_click_queue};

#[tokio::test]
async fn test_health_reports_healthy() {
    let app = spawn_app(ScriptedIdentityProvider::new());

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let app = spawn_app_with_dead_click_queue(ScriptedIdentityProvider::new());

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["click_queue"]["status"], "error");
}
