//! Link creation, resolution, listing and deletion.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{Value, json};
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

use crate::application::options::LinkManagerOptions;
use crate::domain::entities::link::short_prefix;
use crate::domain::entities::{Link, LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_hasher::hash_url;
use crate::utils::url_normalizer::normalize_url;

/// Rows fetched per store round-trip while streaming [`LinkManager::get_all`].
const LIST_PAGE_SIZE: i64 = 100;

/// Sole authority over stored links.
///
/// Normalizes and hashes URLs, deduplicates on the full content hash, resolves
/// hash prefixes with a strict not-found / ambiguous / unique policy and
/// records accesses with optimistic concurrency. No rows are cached between
/// calls; every operation reads the store afresh.
///
/// The repository parameter defaults to a trait object so the service can be
/// shared through [`crate::state::AppState`] regardless of the backend.
pub struct LinkManager<R: ?Sized = dyn LinkRepository> {
    repository: Arc<R>,
    options: LinkManagerOptions,
}

impl<R: LinkRepository + ?Sized + 'static> LinkManager<R> {
    /// Creates a new link manager with already validated options.
    pub fn new(repository: Arc<R>, options: LinkManagerOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// Truncates a full hash to the configured display length.
    pub fn short_hash<'a>(&self, hash: &'a str) -> &'a str {
        short_prefix(hash, self.options.hash_string_length)
    }

    /// Computes the full hash of a URL after normalizing it.
    pub fn compute_hash(&self, url: &str) -> String {
        hash_url(
            &normalize_url(url),
            self.options.hash_algorithm,
            self.options.encoding,
        )
    }

    /// Returns the total number of stored links.
    pub async fn get_count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Stores a URL (or reuses the existing entry) and returns its short hash.
    ///
    /// # Deduplication
    ///
    /// The normalized URL is hashed and looked up by exact full hash. When a
    /// link already exists its short hash is returned and the supplied `name`
    /// and `description` are discarded.
    ///
    /// # Concurrent inserts
    ///
    /// If another caller inserts the same URL between the lookup and the
    /// insert, the unique violation is resolved by re-reading the winner's row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty URL.
    /// Returns [`AppError::Conflict`] if the insert conflicts with a row that
    /// cannot be re-read, or if the digest collides with a different URL.
    pub async fn add(
        &self,
        url: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<String, AppError> {
        if url.trim().is_empty() {
            return Err(AppError::bad_request("URL must not be empty", json!({})));
        }

        let url = normalize_url(url);
        let hash = hash_url(&url, self.options.hash_algorithm, self.options.encoding);

        if let Some(existing) = self.repository.find_by_hash(&hash).await? {
            return self.reuse_existing(existing, &url);
        }

        let new_link = NewLink {
            url: url.clone(),
            hash: hash.clone(),
            name,
            description,
        };

        match self.repository.create(new_link).await {
            Ok(link) => {
                tracing::info!(url = %link.url, hash = %link.hash, "Link added");
                Ok(self.short_hash(&link.hash).to_string())
            }
            Err(AppError::Conflict { message, details }) => {
                tracing::debug!(url = %url, "Insert lost a race, re-reading by hash");
                match self.repository.find_by_hash(&hash).await? {
                    Some(existing) => self.reuse_existing(existing, &url),
                    None => Err(AppError::Conflict { message, details }),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn reuse_existing(&self, existing: Link, url: &str) -> Result<String, AppError> {
        if existing.url != url {
            tracing::warn!(
                url,
                existing_url = %existing.url,
                hash = %existing.hash,
                "Hash collision between different URLs"
            );
            return Err(AppError::conflict(
                "Hash collides with a different stored URL",
                json!({ "hash": existing.hash }),
            ));
        }

        tracing::info!(url, hash = %existing.hash, "Link already exists");
        Ok(self.short_hash(&existing.hash).to_string())
    }

    /// Finds the first link (lowest id) whose hash starts with `prefix`.
    ///
    /// Unlike [`Self::get`] this does not reject ambiguous prefixes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the prefix is shorter than
    /// `min_hash_length`.
    pub async fn find_by_hash(&self, prefix: &str) -> Result<Option<LinkRecord>, AppError> {
        self.check_prefix(prefix)?;

        Ok(self
            .repository
            .first_by_hash_prefix(prefix)
            .await?
            .map(LinkRecord::from))
    }

    /// Finds a link by URL, normalizing it first.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<LinkRecord>, AppError> {
        let url = normalize_url(url);

        Ok(self
            .repository
            .find_by_url(&url)
            .await?
            .map(LinkRecord::from))
    }

    /// Resolves a hash prefix and records one access to the matching link.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` when nothing matches
    /// - `Ok(Some(record))` after the access was recorded
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Ambiguous`] (with `count` in details) when more than
    /// one link matches, and [`AppError::Incomplete`] when every optimistic
    /// update attempt lost against concurrent writers.
    pub async fn get(&self, prefix: &str) -> Result<Option<LinkRecord>, AppError> {
        self.check_prefix(prefix)?;

        match self.repository.count_by_hash_prefix(prefix).await? {
            0 => return Ok(None),
            1 => {}
            count => {
                return Err(AppError::ambiguous(
                    format!("Ambiguous hash {prefix}: {count} links match"),
                    json!({ "hash": prefix, "count": count }),
                ));
            }
        }

        let Some(link) = self.repository.first_by_hash_prefix(prefix).await? else {
            return Ok(None);
        };

        self.record_access(link.id, prefix).await
    }

    /// Bumps access statistics with compare-and-swap on the row version.
    ///
    /// Each attempt re-reads the row; a lost race waits `concurrent_db_timeout`
    /// and tries again, up to `concurrent_db_try_count` attempts in total.
    async fn record_access(
        &self,
        id: i64,
        prefix: &str,
    ) -> Result<Option<LinkRecord>, AppError> {
        let try_count = self.options.concurrent_db_try_count;
        let mut attempt = 0u32;
        let strategy = FixedInterval::new(self.options.concurrent_db_timeout)
            .take(try_count.saturating_sub(1) as usize);

        let result = RetryIf::spawn(
            strategy,
            || {
                attempt += 1;
                self.try_record_access(id, prefix, attempt)
            },
            |e: &AppError| matches!(e, AppError::ConcurrencyConflict { .. }),
        )
        .await;

        match result {
            Err(AppError::ConcurrencyConflict { .. }) => {
                tracing::error!(
                    hash = prefix,
                    attempts = try_count,
                    "Giving up on recording access after repeated conflicts"
                );
                Err(AppError::incomplete(
                    "Operation could not complete due to concurrent updates",
                    json!({ "hash": prefix, "attempts": try_count }),
                ))
            }
            other => other,
        }
    }

    async fn try_record_access(
        &self,
        id: i64,
        prefix: &str,
        attempt: u32,
    ) -> Result<Option<LinkRecord>, AppError> {
        let Some(link) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        match self
            .repository
            .record_access(link.id, link.row_version, Utc::now())
            .await?
        {
            Some(updated) => Ok(Some(updated.into())),
            None => {
                tracing::warn!(
                    attempt,
                    hash = prefix,
                    "Concurrent write conflict while recording access"
                );
                Err(AppError::concurrency_conflict(
                    "Link was modified concurrently",
                    json!({ "hash": prefix, "attempt": attempt }),
                ))
            }
        }
    }

    /// Streams links in creation order.
    ///
    /// - `skip <= 0` skips nothing
    /// - `take == 0` yields nothing and never touches the store
    /// - `take < 0` is unbounded
    ///
    /// Rows are fetched lazily in pages; dropping the stream stops fetching.
    /// A store error is yielded once and ends the stream.
    pub fn get_all(
        &self,
        skip: i64,
        take: i64,
    ) -> BoxStream<'static, Result<LinkRecord, AppError>> {
        if take == 0 {
            return stream::empty().boxed();
        }

        let cursor = PageCursor {
            repository: Arc::clone(&self.repository),
            after_id: None,
            offset: skip.max(0),
            remaining: (take > 0).then_some(take),
            buffer: VecDeque::new(),
            exhausted: false,
        };

        stream::unfold(cursor, |mut cursor| async move {
            cursor.next().await.map(|item| (item, cursor))
        })
        .boxed()
    }

    /// Deletes the single link whose hash starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Ambiguous`] naming the match count when more than
    /// one link matches.
    pub async fn delete_by_hash(&self, prefix: &str) -> Result<Option<LinkRecord>, AppError> {
        self.check_prefix(prefix)?;

        let matches = self.repository.list_by_hash_prefix(prefix).await?;
        let count = matches.len();

        self.delete_single(
            matches,
            format!("Found {count} links for hash {prefix}"),
            json!({ "hash": prefix, "count": count }),
        )
        .await
    }

    /// Deletes the link stored for `url`, normalizing it first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Ambiguous`] naming the match count when more than
    /// one link matches.
    pub async fn delete_by_url(&self, url: &str) -> Result<Option<LinkRecord>, AppError> {
        let url = normalize_url(url);

        let matches = self.repository.list_by_url(&url).await?;
        let count = matches.len();

        self.delete_single(
            matches,
            format!("Found {count} links for url {url}"),
            json!({ "url": url, "count": count }),
        )
        .await
    }

    async fn delete_single(
        &self,
        mut matches: Vec<Link>,
        ambiguous_message: String,
        ambiguous_details: Value,
    ) -> Result<Option<LinkRecord>, AppError> {
        if matches.len() > 1 {
            return Err(AppError::ambiguous(ambiguous_message, ambiguous_details));
        }

        let Some(link) = matches.pop() else {
            return Ok(None);
        };

        if !self.repository.delete(link.id).await? {
            return Ok(None);
        }

        tracing::info!(url = %link.url, hash = %link.hash, "Link deleted");
        Ok(Some(link.into()))
    }

    fn check_prefix(&self, prefix: &str) -> Result<(), AppError> {
        let min_length = self.options.min_hash_length;

        if prefix.chars().count() < min_length {
            return Err(AppError::bad_request(
                format!("Hash must be at least {min_length} characters"),
                json!({ "hash": prefix, "min_length": min_length }),
            ));
        }

        Ok(())
    }
}

/// Keyset pagination state behind [`LinkManager::get_all`].
struct PageCursor<R: ?Sized> {
    repository: Arc<R>,
    after_id: Option<i64>,
    /// Rows still to skip; only applied to the first page.
    offset: i64,
    /// Rows still allowed to be fetched, `None` for unbounded.
    remaining: Option<i64>,
    buffer: VecDeque<Link>,
    exhausted: bool,
}

impl<R: LinkRepository + ?Sized> PageCursor<R> {
    async fn next(&mut self) -> Option<Result<LinkRecord, AppError>> {
        if let Some(link) = self.buffer.pop_front() {
            return Some(Ok(link.into()));
        }

        if self.exhausted {
            return None;
        }

        let limit = match self.remaining {
            Some(remaining) if remaining <= 0 => return None,
            Some(remaining) => remaining.min(LIST_PAGE_SIZE),
            None => LIST_PAGE_SIZE,
        };

        let page = match self
            .repository
            .list_page(self.after_id, self.offset, limit)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.exhausted = true;
                return Some(Err(e));
            }
        };

        let fetched = page.len() as i64;
        self.offset = 0;
        self.exhausted = fetched < limit;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= fetched;
        }
        if let Some(last) = page.last() {
            self.after_id = Some(last.id);
        }

        self.buffer.extend(page);
        self.buffer.pop_front().map(|link| Ok(link.into()))
    }
}
