//! DTOs for link endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::LinkRecord;

/// Request to store a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct AddLinkRequest {
    /// Target URL. A missing scheme is filled in with `http://`.
    #[validate(length(min = 3, max = 2048, message = "URL must be 3 to 2048 characters"))]
    pub url: String,

    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Link as returned by the API.
///
/// `hash` is the short hash; `full_hash` is the complete digest stored for
/// the URL.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub hash: String,
    pub full_hash: String,
    pub short_url: String,
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LinkResponse {
    /// Builds the response from a record, a short hash and its public URL.
    pub fn new(record: LinkRecord, hash: String, short_url: String) -> Self {
        Self {
            hash,
            full_hash: record.hash,
            short_url,
            url: record.url,
            name: record.name,
            description: record.description,
        }
    }
}
