//! Settings consumed by [`crate::application::services::LinkManager`].

use std::time::Duration;

use anyhow::{Result, bail};

use crate::utils::url_hasher::{HashAlgorithm, TextEncoding};

/// Hashing and concurrency settings for the link manager.
///
/// Built once at startup (see [`crate::config::Config`]) and validated there;
/// the manager never re-checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkManagerOptions {
    /// Number of hash characters shown to callers.
    pub hash_string_length: usize,
    /// Shortest hash prefix accepted by lookups.
    pub min_hash_length: usize,
    pub hash_algorithm: HashAlgorithm,
    pub encoding: TextEncoding,
    /// Backoff between optimistic update attempts.
    pub concurrent_db_timeout: Duration,
    /// Maximum optimistic update attempts per access.
    pub concurrent_db_try_count: u32,
}

impl Default for LinkManagerOptions {
    fn default() -> Self {
        Self {
            hash_string_length: 5,
            min_hash_length: 5,
            hash_algorithm: HashAlgorithm::Md5,
            encoding: TextEncoding::Utf32,
            concurrent_db_timeout: Duration::from_millis(100),
            concurrent_db_try_count: 10,
        }
    }
}

impl LinkManagerOptions {
    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any length, timeout or attempt count is zero, if
    /// short hashes would be shorter than the accepted prefix length, or if
    /// the accepted prefix length exceeds the full hash.
    pub fn validate(&self) -> Result<()> {
        if self.hash_string_length == 0 {
            bail!("HASH_STRING_LENGTH must be greater than 0");
        }

        if self.min_hash_length == 0 {
            bail!("MIN_HASH_LENGTH must be greater than 0");
        }

        if self.hash_string_length < self.min_hash_length {
            bail!(
                "HASH_STRING_LENGTH ({}) must be at least MIN_HASH_LENGTH ({})",
                self.hash_string_length,
                self.min_hash_length
            );
        }

        let full_length = self.hash_algorithm.encoded_len();
        if self.min_hash_length > full_length {
            bail!(
                "MIN_HASH_LENGTH ({}) exceeds the {} hash length ({})",
                self.min_hash_length,
                self.hash_algorithm,
                full_length
            );
        }

        if self.concurrent_db_timeout.is_zero() {
            bail!("CONCURRENT_DB_TIMEOUT must be greater than 0");
        }

        if self.concurrent_db_try_count == 0 {
            bail!("CONCURRENT_DB_TRY_COUNT must be greater than 0");
        }

        Ok(())
    }
}
