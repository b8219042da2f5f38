use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes click events and applies counter increments.
///
/// Runs until the channel closes. Failed increments are logged and dropped —
/// the redirect that produced the event has long since been answered.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = repository.increment_clicks(&event.token).await {
            warn!(token = %event.token, error = %e, "Failed to record click");
        }
    }
}
