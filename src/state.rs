use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{LinkService, RedirectService};
use crate::domain::click_event::ClickEvent;
use crate::domain::identity::IdentityProvider;

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}
