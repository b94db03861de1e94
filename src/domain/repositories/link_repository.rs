//! Repository trait for link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage contract for links.
///
/// The store owns two unique constraints (on `url` and on `hash`) and a
/// per-row version token that changes on every write.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Counts all stored links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Finds a link by its exact full hash.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its exact (already normalized) URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its surrogate id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Counts links whose full hash starts with `prefix`.
    async fn count_by_hash_prefix(&self, prefix: &str) -> Result<i64, AppError>;

    /// Returns the lowest-id link whose full hash starts with `prefix`.
    async fn first_by_hash_prefix(&self, prefix: &str) -> Result<Option<Link>, AppError>;

    /// Returns every link whose full hash starts with `prefix`, ordered by id.
    async fn list_by_hash_prefix(&self, prefix: &str) -> Result<Vec<Link>, AppError>;

    /// Returns every link with exactly this URL, ordered by id.
    async fn list_by_url(&self, url: &str) -> Result<Vec<Link>, AppError>;

    /// Returns one page of links ordered by id ascending.
    ///
    /// With `after_id` set, only rows with a greater id are considered; `offset`
    /// rows are then dropped and at most `limit` rows returned.
    async fn list_page(
        &self,
        after_id: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Inserts a new link with zero accesses.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the URL or hash already exists.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Records one access to the link, conditional on its version.
    ///
    /// Sets `last_access` to `at` (never moving it backwards), increments
    /// `access_count` and bumps `row_version`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` with the updated row on success
    /// - `Ok(None)` if the row is gone or `expected_version` is stale
    async fn record_access(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError>;

    /// Deletes a link by id. Returns `Ok(false)` if it no longer exists.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
