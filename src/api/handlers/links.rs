//! Handlers for link management endpoints (add, lookup, list, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{AddLinkRequest, LinkResponse};
use crate::api::dto::pagination::ListParams;
use crate::domain::entities::LinkRecord;
use crate::error::AppError;
use crate::state::AppState;

fn link_response(state: &AppState, record: LinkRecord) -> LinkResponse {
    let hash = state.link_manager.short_hash(&record.hash).to_string();
    let short_url = state.short_url(&hash);
    LinkResponse::new(record, hash, short_url)
}

/// Stores a URL and returns its short hash.
///
/// # Endpoint
///
/// `POST /api/link`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "example.com",
///   "name": "Example",          // optional
///   "description": "Homepage"   // optional
/// }
/// ```
///
/// # Response
///
/// **201 Created** with `Location: /api/link/hash/{hash}`. Adding a URL that
/// is already stored returns the existing link unchanged.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict on an unresolvable hash collision.
pub async fn add_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<AddLinkRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let hash = state
        .link_manager
        .add(&payload.url, payload.name, payload.description)
        .await?;

    let record = state
        .link_manager
        .find_by_url(&payload.url)
        .await?
        .ok_or_else(|| {
            AppError::internal(
                "Link vanished right after it was added",
                json!({ "hash": hash }),
            )
        })?;

    let location = format!("/api/link/hash/{hash}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(link_response(&state, record)),
    )
        .into_response())
}

/// Looks up a link by hash prefix without recording an access.
///
/// # Endpoint
///
/// `GET /api/link/hash/{hash}`
///
/// # Errors
///
/// Returns 400 Bad Request if the prefix is too short.
/// Returns 404 Not Found if no link matches.
pub async fn get_by_hash_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    match state.link_manager.find_by_hash(&hash).await? {
        Some(record) => Ok(Json(link_response(&state, record))),
        None => Err(AppError::not_found("Link not found", json!({ "hash": hash }))),
    }
}

/// Looks up a link by its URL.
///
/// # Endpoint
///
/// `GET /api/link/url/{url}`
///
/// The URL must be percent-encoded into a single path segment.
pub async fn get_by_url_handler(
    Path(url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    match state.link_manager.find_by_url(&url).await? {
        Some(record) => Ok(Json(link_response(&state, record))),
        None => Err(AppError::not_found("Link not found", json!({ "url": url }))),
    }
}

/// Returns the number of stored links.
///
/// # Endpoint
///
/// `GET /api/link/count`
pub async fn count_handler(State(state): State<AppState>) -> Result<Json<i64>, AppError> {
    Ok(Json(state.link_manager.get_count().await?))
}

/// Lists links in creation order.
///
/// # Endpoint
///
/// `GET /api/link?skip=0&take=-1`
///
/// A negative `take` lists everything after `skip`.
///
/// # Response
///
/// - **200 OK** with a JSON array
/// - **204 No Content** when `take` is 0
pub async fn list_links_handler(
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let (skip, take) = params
        .skip_take()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    if take == 0 {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let links: Vec<LinkResponse> = state
        .link_manager
        .get_all(skip, take)
        .map_ok(|record| link_response(&state, record))
        .try_collect()
        .await?;

    Ok(Json(links).into_response())
}

/// Deletes the link matching a hash prefix and returns it.
///
/// # Endpoints
///
/// - `DELETE /api/link/hash/{hash}`
/// - `POST /api/link/delete/hash/{hash}`
///
/// # Errors
///
/// Returns 400 Bad Request if the prefix is too short or ambiguous.
/// Returns 404 Not Found if no link matches.
pub async fn delete_by_hash_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    match state.link_manager.delete_by_hash(&hash).await? {
        Some(record) => Ok(Json(link_response(&state, record))),
        None => Err(AppError::not_found("Link not found", json!({ "hash": hash }))),
    }
}

/// Deletes the link stored for a URL and returns it.
///
/// # Endpoints
///
/// - `DELETE /api/link/url/{url}`
/// - `POST /api/link/delete/url/{url}`
/// - `DELETE /api/link/{url}`
/// - `POST /api/link/delete/{url}`
pub async fn delete_by_url_handler(
    Path(url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    match state.link_manager.delete_by_url(&url).await? {
        Some(record) => Ok(Json(link_response(&state, record))),
        None => Err(AppError::not_found("Link not found", json!({ "url": url }))),
    }
}
