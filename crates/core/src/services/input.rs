//! Shared input checks for service entry points.

use serde::Deserialize;
use vidshare_common::config::PaginationConfig;
use vidshare_common::{AppError, AppResult};
use vidshare_db::repositories::PageRequest;

/// Raw `page` / `limit` query parameters.
///
/// Kept as text so that garbage falls back to the defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Resolve against the configured defaults.
    #[must_use]
    pub fn resolve(&self, config: &PaginationConfig) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref(), config)
    }
}

/// Trim a required text field. Absent or blank is `"<field> is required"`.
pub fn required_text(value: Option<&str>, field: &str) -> AppResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| AppError::MissingField(field.to_string()))
}

/// Trim an optional text field; blank counts as absent.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text(Some("  hi "), "Content").unwrap(), "hi");
    }

    #[test]
    fn test_required_text_blank_or_missing() {
        for value in [None, Some(""), Some("   \n")] {
            let err = required_text(value, "Content").unwrap_err();
            assert_eq!(err.to_string(), "Content is required");
        }
    }

    #[test]
    fn test_page_query_resolve() {
        let query = PageQuery {
            page: Some("2".into()),
            limit: Some("oops".into()),
        };
        let page = query.resolve(&PaginationConfig::default());
        assert_eq!((page.page, page.limit), (2, 10));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
    }
}
