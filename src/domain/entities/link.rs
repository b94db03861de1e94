//! Link entity representing a hashed URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored link with its access statistics.
///
/// `hash` is the full digest of `url`; callers usually only see a prefix of it.
/// `row_version` changes on every write and guards optimistic updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub hash: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub last_access: DateTime<Utc>,
    pub access_count: i64,
    pub row_version: i64,
}

impl From<Link> for LinkRecord {
    fn from(link: Link) -> Self {
        LinkRecord {
            url: link.url,
            hash: link.hash,
            name: link.name,
            description: link.description,
        }
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub hash: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Read-only projection of a [`Link`] returned by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub url: String,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Truncates `hash` to at most `len` characters.
///
/// Digests are base64, so byte and character boundaries coincide.
pub fn short_prefix(hash: &str, len: usize) -> &str {
    &hash[..hash.len().min(len)]
}
