//! Listing query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// Query parameters for `GET /api/link`.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub skip: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub take: Option<i64>,
}

impl ListParams {
    /// Returns `(skip, take)` with defaults applied.
    ///
    /// # Defaults
    ///
    /// - `skip`: 0
    /// - `take`: -1 (no limit)
    ///
    /// A negative `skip` is an error; any negative `take` means "no limit".
    pub fn skip_take(&self) -> Result<(i64, i64), String> {
        let skip = self.skip.unwrap_or(0);
        let take = self.take.unwrap_or(-1);

        if skip < 0 {
            return Err("skip must not be negative".to_string());
        }

        Ok((skip, take))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(skip: Option<i64>, take: Option<i64>) -> ListParams {
        ListParams { skip, take }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(params(None, None).skip_take().unwrap(), (0, -1));
    }

    #[test]
    fn test_explicit_values() {
        assert_eq!(params(Some(2), Some(3)).skip_take().unwrap(), (2, 3));
    }

    #[test]
    fn test_negative_skip_is_error() {
        assert!(params(Some(-1), None).skip_take().is_err());
    }

    #[test]
    fn test_parse_from_query_string() {
        let p: ListParams = serde_json::from_str(r#"{"skip": "4", "take": "0"}"#).unwrap();
        assert_eq!(p.skip, Some(4));
        assert_eq!(p.take, Some(0));
    }

    #[test]
    fn test_non_numeric_is_error() {
        assert!(serde_json::from_str::<ListParams>(r#"{"take": "all"}"#).is_err());
    }
}
