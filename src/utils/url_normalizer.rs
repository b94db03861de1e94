//! URL normalization applied before hashing, lookup and deletion.
//!
//! The only rewrite is adding a default scheme, so `example.com` and
//! `http://example.com` resolve to the same stored link.

use regex::Regex;
use std::sync::LazyLock;

/// Matches a leading `scheme://`.
static SCHEME_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+://").expect("valid scheme regex"));

/// Scheme prepended to URLs that have none.
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Returns `true` if `input` starts with `scheme://`.
pub fn has_scheme(input: &str) -> bool {
    SCHEME_PREFIX_REGEX.is_match(input)
}

/// Normalizes a URL to the form used as the storage key.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Input without a `scheme://` prefix gets `http://` prepended
/// 3. Everything else is preserved byte for byte
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com"), "http://example.com");
/// assert_eq!(normalize_url("https://example.com"), "https://example.com");
/// ```
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();

    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    }
}
