//! Process-local implementation of the link repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Link>,
    next_id: i64,
}

/// In-memory link storage for development and tests.
///
/// Rows live in a `BTreeMap` keyed by id, so iteration order is creation
/// order. The same unique constraints and version bumps as the PostgreSQL
/// schema are enforced under a single lock.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    table: Mutex<Table>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.table.lock().await.rows.len() as i64)
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.values().find(|l| l.hash == hash).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.values().find(|l| l.url == url).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn count_by_hash_prefix(&self, prefix: &str) -> Result<i64, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|l| l.hash.starts_with(prefix))
            .count() as i64)
    }

    async fn first_by_hash_prefix(&self, prefix: &str) -> Result<Option<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|l| l.hash.starts_with(prefix))
            .cloned())
    }

    async fn list_by_hash_prefix(&self, prefix: &str) -> Result<Vec<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|l| l.hash.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn list_by_url(&self, url: &str) -> Result<Vec<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|l| l.url == url)
            .cloned()
            .collect())
    }

    async fn list_page(
        &self,
        after_id: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let table = self.table.lock().await;
        let start = after_id.map_or(i64::MIN, |id| id.saturating_add(1));

        Ok(table
            .rows
            .range(start..)
            .map(|(_, link)| link)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut table = self.table.lock().await;

        for existing in table.rows.values() {
            let constraint = if existing.url == new_link.url {
                "links_url_key"
            } else if existing.hash == new_link.hash {
                "links_hash_key"
            } else {
                continue;
            };
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": constraint }),
            ));
        }

        table.next_id += 1;
        let link = Link {
            id: table.next_id,
            url: new_link.url,
            hash: new_link.hash,
            name: new_link.name,
            description: new_link.description,
            last_access: Utc::now(),
            access_count: 0,
            row_version: 0,
        };
        table.rows.insert(link.id, link.clone());

        Ok(link)
    }

    async fn record_access(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError> {
        let mut table = self.table.lock().await;

        let Some(link) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if link.row_version != expected_version {
            return Ok(None);
        }

        link.last_access = link.last_access.max(at);
        link.access_count += 1;
        link.row_version += 1;

        Ok(Some(link.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(url: &str, hash: &str) -> NewLink {
        NewLink {
            url: url.to_string(),
            hash: hash.to_string(),
            name: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = MemoryLinkRepository::new();

        let a = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();
        let b = repo.create(new_link("http://b.com", "bbbbb1")).await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(a.access_count, 0);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_enforces_unique_url_and_hash() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

        let dup_url = repo.create(new_link("http://a.com", "other")).await;
        let dup_hash = repo.create(new_link("http://b.com", "aaaaa1")).await;

        assert!(matches!(dup_url, Err(AppError::Conflict { .. })));
        assert!(matches!(dup_hash, Err(AppError::Conflict { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_prefix_queries() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("http://a.com", "abcde111")).await.unwrap();
        repo.create(new_link("http://b.com", "abcde222")).await.unwrap();
        repo.create(new_link("http://c.com", "zzzzz333")).await.unwrap();

        assert_eq!(repo.count_by_hash_prefix("abcde").await.unwrap(), 2);
        assert_eq!(repo.list_by_hash_prefix("abcde").await.unwrap().len(), 2);
        assert_eq!(
            repo.first_by_hash_prefix("abcde").await.unwrap().unwrap().url,
            "http://a.com"
        );
        assert_eq!(repo.count_by_hash_prefix("nomatch").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_access_requires_current_version() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

        let updated = repo
            .record_access(link.id, link.row_version, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.access_count, 1);
        assert_eq!(updated.row_version, link.row_version + 1);

        let stale = repo
            .record_access(link.id, link.row_version, Utc::now())
            .await
            .unwrap();
        assert!(stale.is_none());
    }

    #[tokio::test]
    async fn test_record_access_never_moves_last_access_back() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

        let past = link.last_access - chrono::Duration::hours(1);
        let updated = repo
            .record_access(link.id, link.row_version, past)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.last_access, link.last_access);
    }

    #[tokio::test]
    async fn test_list_page_keyset() {
        let repo = MemoryLinkRepository::new();
        for i in 0..5 {
            repo.create(new_link(&format!("http://{i}.com"), &format!("hash{i}")))
                .await
                .unwrap();
        }

        let first = repo.list_page(None, 1, 2).await.unwrap();
        assert_eq!(
            first.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let next = repo.list_page(Some(3), 0, 10).await.unwrap();
        assert_eq!(next.iter().map(|l| l.id).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("http://a.com", "aaaaa1")).await.unwrap();

        assert!(repo.delete(link.id).await.unwrap());
        assert!(!repo.delete(link.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
