//! Page requests and count + window execution shared by listing queries.

use sea_orm::{
    DatabaseConnection, EntityTrait, FromQueryResult, Order, PaginatorTrait, QuerySelect, Select,
};
use serde::Serialize;
use vidshare_common::config::PaginationConfig;
use vidshare_common::{AppError, AppResult};

/// A validated `page` / `limit` pair. Both are 1-based and never zero, and the
/// window offset always fits in a signed 64-bit SQL `OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

impl PageRequest {
    /// Build a page request from raw query-string values.
    ///
    /// Anything that is not a positive integer falls back to the default,
    /// and `limit` is capped at `config.max_limit`. Pages past the last
    /// addressable one are clamped to it and come back empty.
    #[must_use]
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit)
            .unwrap_or(config.default_limit)
            .min(config.max_limit.max(1));

        Self::new(page, limit)
    }

    /// Build a page request from already-numeric values.
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        let limit = limit.clamp(1, MAX_OFFSET);
        Self {
            page: page.clamp(1, MAX_OFFSET / limit),
            limit,
        }
    }

    /// Rows to skip before the window starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Largest row offset a window may start at.
const MAX_OFFSET: u64 = i64::MAX as u64;

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| u64::try_from(n).ok())
}

/// Sort direction accepted by listing endpoints (`asc` / `desc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc`, case-insensitively. Anything else is descending.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    /// The matching sea-orm order.
    #[must_use]
    pub const fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// One page of a listing, in the paginate-plugin shape clients expect.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Paginated<T> {
    /// Wrap a fetched window together with the total match count.
    #[must_use]
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let PageRequest { page, limit } = request;
        let total_pages = total_docs.div_ceil(limit).max(1);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            paging_counter: (page - 1) * limit + 1,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    /// Transform every document, keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// Run the counting query and the windowed query for `select`.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    request: PageRequest,
) -> AppResult<Paginated<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
{
    let total = select
        .clone()
        .count(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let docs = select
        .offset(request.offset())
        .limit(request.limit)
        .all(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Paginated::new(docs, total, request))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_limit: 10,
            max_limit: 100,
        }
    }

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::from_raw(None, None, &config());
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_garbage_falls_back() {
        for raw in ["abc", "0", "-3", "", "1.5"] {
            let req = PageRequest::from_raw(Some(raw), Some(raw), &config());
            assert_eq!(req, PageRequest { page: 1, limit: 10 }, "{raw}");
        }
    }

    #[test]
    fn test_page_request_caps_limit() {
        let req = PageRequest::from_raw(Some("3"), Some("5000"), &config());
        assert_eq!(req.page, 3);
        assert_eq!(req.limit, 100);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_page_request_huge_page() {
        let req = PageRequest::from_raw(Some("9223372036854775807"), Some("100"), &config());
        assert_eq!(req.limit, 100);
        assert_eq!(req.page, 92_233_720_368_547_758);
        assert!(i64::try_from(req.offset() + req.limit).is_ok());

        let req = PageRequest::new(u64::MAX, u64::MAX);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);

        let page = Paginated::<u8>::new(vec![], 5, PageRequest::new(u64::MAX, 10));
        assert_eq!(page.prev_page, Some(page.page - 1));
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn test_paginated_metadata() {
        let page = Paginated::new(vec![1, 2, 3], 23, PageRequest::new(2, 10));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.paging_counter, 11);
        assert!(page.has_prev_page);
        assert!(page.has_next_page);
        assert_eq!(page.prev_page, Some(1));
        assert_eq!(page.next_page, Some(3));
    }

    #[test]
    fn test_paginated_empty_listing() {
        let page = Paginated::<u8>::new(vec![], 0, PageRequest::default());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev_page);
        assert!(!page.has_next_page);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_paginated_map_keeps_metadata() {
        let page = Paginated::new(vec![1, 2], 12, PageRequest::new(1, 2)).map(|n| n * 10);
        assert_eq!(page.docs, vec![10, 20]);
        assert_eq!(page.total_docs, 12);
        assert_eq!(page.total_pages, 6);
    }

    #[test]
    fn test_paginated_serializes_camel_case() {
        let json = serde_json::to_value(Paginated::new(vec!["a"], 1, PageRequest::default())).unwrap();
        assert_eq!(json["totalDocs"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert!(json["prevPage"].is_null());
    }
}
