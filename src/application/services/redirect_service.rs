//! Token resolution for the redirect path.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Outcome of resolving a token.
///
/// `NotFound` and `Expired` are distinct terminal states: an expired link
/// still exists and may be restored by its owner, and the two render
/// different pages with different status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect(String),
    Expired,
    NotFound,
}

/// Resolves tokens to redirect targets.
pub struct RedirectService {
    repository: Arc<dyn LinkRepository>,
}

impl RedirectService {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Resolves a token to its redirect outcome.
    ///
    /// Click counting is not handled here — the HTTP layer dispatches the
    /// event without awaiting it, so resolution stays independent of the
    /// counter's fate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, token: &str) -> Result<Resolution, AppError> {
        let Some(link) = self.repository.find_by_token(token).await? else {
            return Ok(Resolution::NotFound);
        };

        if !link.is_usable(Utc::now()) {
            return Ok(Resolution::Expired);
        }

        Ok(Resolution::Redirect(link.target_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;

    fn link(is_active: bool, expires_in: Duration) -> Link {
        let now = Utc::now();
        Link {
            token: "abcDEF1234".to_string(),
            target_url: "https://example.com/page".to_string(),
            owner_id: None,
            click_count: 3,
            is_active,
            created_at: now - Duration::days(1),
            expires_at: now + expires_in,
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));

        let service = RedirectService::new(Arc::new(mock_repo));

        let resolution = service.resolve("missing123").await.unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_active_link() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(Some(link(true, Duration::days(30)))));

        let service = RedirectService::new(Arc::new(mock_repo));

        let resolution = service.resolve("abcDEF1234").await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect("https://example.com/page".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_expired_link() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(Some(link(true, Duration::seconds(-1)))));

        let service = RedirectService::new(Arc::new(mock_repo));

        let resolution = service.resolve("abcDEF1234").await.unwrap();
        assert_eq!(resolution, Resolution::Expired);
    }

    #[tokio::test]
    async fn test_resolve_deactivated_link() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(Some(link(false, Duration::days(30)))));

        let service = RedirectService::new(Arc::new(mock_repo));

        let resolution = service.resolve("abcDEF1234").await.unwrap();
        assert_eq!(resolution, Resolution::Expired);
    }

    #[tokio::test]
    async fn test_resolve_propagates_store_errors() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_token()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", serde_json::json!({}))));

        let service = RedirectService::new(Arc::new(mock_repo));

        assert!(service.resolve("abcDEF1234").await.is_err());
    }
}
