//! API route configuration.

use crate::api::handlers::{
    add_link_handler, count_handler, delete_by_hash_handler, delete_by_url_handler,
    get_by_hash_handler, get_by_url_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET    /link`                    - List links (`skip`, `take`)
/// - `POST   /link`                    - Add a link
/// - `GET    /link/count`              - Number of stored links
/// - `GET    /link/hash/{hash}`        - Look up by hash prefix
/// - `DELETE /link/hash/{hash}`        - Delete by hash prefix
/// - `GET    /link/url/{url}`          - Look up by URL
/// - `DELETE /link/url/{url}`          - Delete by URL
/// - `POST   /link/delete/hash/{hash}` - Delete by hash prefix
/// - `POST   /link/delete/url/{url}`   - Delete by URL
/// - `DELETE /link/{url}`              - Delete by URL
/// - `POST   /link/delete/{url}`       - Delete by URL
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/link", get(list_links_handler).post(add_link_handler))
        .route("/link/count", get(count_handler))
        .route(
            "/link/hash/{hash}",
            get(get_by_hash_handler).delete(delete_by_hash_handler),
        )
        .route(
            "/link/url/{url}",
            get(get_by_url_handler).delete(delete_by_url_handler),
        )
        .route("/link/delete/hash/{hash}", post(delete_by_hash_handler))
        .route("/link/delete/url/{url}", post(delete_by_url_handler))
        .route("/link/{url}", delete(delete_by_url_handler))
        .route("/link/delete/{url}", post(delete_by_url_handler))
}
