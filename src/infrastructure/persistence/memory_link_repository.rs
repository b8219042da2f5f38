//! In-process implementation of the link repository.
//!
//! Used when no database is configured and by the integration tests. Matches
//! the PostgreSQL backend's observable semantics, including the distinct
//! `Conflict` on a duplicate token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// DashMap-backed link store. Links do not survive restarts.
#[derive(Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, Link>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = Link {
            token: new_link.token,
            target_url: new_link.target_url,
            owner_id: new_link.owner_id,
            click_count: 0,
            is_active: true,
            created_at: new_link.created_at,
            expires_at: new_link.expires_at,
        };

        match self.links.entry(link.token.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "token": link.token }),
            )),
            Entry::Vacant(vacant) => {
                vacant.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(token).map(|entry| entry.value().clone()))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .iter()
            .filter(|entry| entry.owner_id == Some(owner_id))
            .map(|entry| entry.value().clone())
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.token.cmp(&b.token)));

        Ok(links)
    }

    async fn update_target(&self, token: &str, target_url: &str) -> Result<Link, AppError> {
        match self.links.get_mut(token) {
            Some(mut entry) => {
                entry.target_url = target_url.to_string();
                Ok(entry.value().clone())
            }
            None => Err(AppError::not_found(
                "Link not found",
                json!({ "hash": token }),
            )),
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(token).is_some())
    }

    async fn restore(&self, token: &str, expires_at: DateTime<Utc>) -> Result<Link, AppError> {
        match self.links.get_mut(token) {
            Some(mut entry) => {
                entry.is_active = true;
                entry.expires_at = expires_at;
                Ok(entry.value().clone())
            }
            None => Err(AppError::not_found(
                "Link not found",
                json!({ "hash": token }),
            )),
        }
    }

    async fn increment_clicks(&self, token: &str) -> Result<(), AppError> {
        if let Some(mut entry) = self.links.get_mut(token) {
            entry.click_count += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_link(token: &str, owner_id: Option<Uuid>) -> NewLink {
        let now = Utc::now();
        NewLink {
            token: token.to_string(),
            target_url: "https://example.com".to_string(),
            owner_id,
            created_at: now,
            expires_at: now + Duration::days(31),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_roundtrip() {
        let repo = MemoryLinkRepository::new();

        repo.insert(new_link("abcDEF1234", None)).await.unwrap();

        let found = repo.find_by_token("abcDEF1234").await.unwrap().unwrap();
        assert_eq!(found.target_url, "https://example.com");
        assert_eq!(found.click_count, 0);
        assert!(found.is_active);
    }

    #[tokio::test]
    async fn test_insert_duplicate_token_is_conflict() {
        let repo = MemoryLinkRepository::new();

        repo.insert(new_link("abcDEF1234", None)).await.unwrap();
        let duplicate = repo.insert(new_link("abcDEF1234", None)).await;

        assert!(matches!(
            duplicate.unwrap_err(),
            AppError::Conflict { .. }
        ));
    }

    #[tokio::test]
    async fn test_find_missing_token() {
        let repo = MemoryLinkRepository::new();
        assert!(repo.find_by_token("missing123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let repo = MemoryLinkRepository::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        for (i, token) in ["older00001", "newer00001"].iter().enumerate() {
            let mut link = new_link(token, Some(owner));
            link.created_at = now + Duration::seconds(i as i64);
            repo.insert(link).await.unwrap();
        }
        repo.insert(new_link("foreign001", Some(Uuid::new_v4())))
            .await
            .unwrap();
        repo.insert(new_link("guestlink1", None)).await.unwrap();

        let links = repo.list_by_owner(owner).await.unwrap();
        let tokens: Vec<&str> = links.iter().map(|l| l.token.as_str()).collect();
        assert_eq!(tokens, vec!["newer00001", "older00001"]);
    }

    #[tokio::test]
    async fn test_update_target_only_changes_url() {
        let repo = MemoryLinkRepository::new();

        let inserted = repo.insert(new_link("abcDEF1234", None)).await.unwrap();
        let updated = repo
            .update_target("abcDEF1234", "https://example.com/new")
            .await
            .unwrap();

        assert_eq!(updated.target_url, "https://example.com/new");
        assert_eq!(updated.expires_at, inserted.expires_at);
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn test_update_missing_token_is_not_found() {
        let repo = MemoryLinkRepository::new();
        let result = repo.update_target("missing123", "https://example.com").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_link() {
        let repo = MemoryLinkRepository::new();

        repo.insert(new_link("abcDEF1234", None)).await.unwrap();

        assert!(repo.delete("abcDEF1234").await.unwrap());
        assert!(repo.find_by_token("abcDEF1234").await.unwrap().is_none());
        assert!(!repo.delete("abcDEF1234").await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_reactivates_and_extends() {
        let repo = MemoryLinkRepository::new();

        let mut link = new_link("abcDEF1234", None);
        link.expires_at = Utc::now() - Duration::days(1);
        repo.insert(link).await.unwrap();

        let new_expiry = Utc::now() + Duration::days(31);
        let restored = repo.restore("abcDEF1234", new_expiry).await.unwrap();

        assert!(restored.is_active);
        assert_eq!(restored.expires_at, new_expiry);
    }

    #[tokio::test]
    async fn test_increment_clicks_accumulates() {
        let repo = MemoryLinkRepository::new();

        repo.insert(new_link("abcDEF1234", None)).await.unwrap();

        repo.increment_clicks("abcDEF1234").await.unwrap();
        repo.increment_clicks("abcDEF1234").await.unwrap();

        let link = repo.find_by_token("abcDEF1234").await.unwrap().unwrap();
        assert_eq!(link.click_count, 2);
    }

    #[tokio::test]
    async fn test_increment_clicks_on_missing_token_is_ok() {
        let repo = MemoryLinkRepository::new();
        assert!(repo.increment_clicks("missing123").await.is_ok());
    }
}
