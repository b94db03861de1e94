//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a hash prefix to its URL and records the access.
///
/// # Endpoints
///
/// `GET /l/{hash}`, `GET /link/{hash}`, `GET /url/{hash}`
///
/// # Errors
///
/// Returns 404 Not Found if no link matches.
/// Returns 400 Bad Request if the prefix is too short or ambiguous.
/// Returns 500 if the access could not be recorded under contention.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .link_manager
        .get(&hash)
        .await?
        .ok_or_else(|| AppError::not_found("Link not found", json!({ "hash": hash })))?;

    tracing::debug!(hash = %hash, url = %record.url, "Redirecting");

    Ok(Redirect::temporary(&record.url))
}
