//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod redirect;

pub use health::health_handler;
pub use links::{
    add_link_handler, count_handler, delete_by_hash_handler, delete_by_url_handler,
    get_by_hash_handler, get_by_url_handler, list_links_handler,
};
pub use redirect::redirect_handler;
