//! Helper functions used across the application.
//!
//! - [`url_normalizer`] - Default-scheme URL normalization
//! - [`url_hasher`] - URL content hashing (digest + encoding settings)

pub mod url_hasher;
pub mod url_normalizer;
