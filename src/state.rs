//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkManager;

/// Application state cloned into each request.
///
/// The manager is the only way handlers reach the link store.
#[derive(Clone)]
pub struct AppState {
    pub link_manager: Arc<LinkManager>,
    /// Public base URL, without trailing slash, used to build short links.
    pub base_url: String,
}

impl AppState {
    pub fn new(link_manager: Arc<LinkManager>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            link_manager,
            base_url,
        }
    }

    /// Builds the public redirect URL for a short hash.
    pub fn short_url(&self, hash: &str) -> String {
        format!("{}/l/{}", self.base_url, hash)
    }
}
