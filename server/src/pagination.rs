//! Pagination
//!
//! Shared skip/take pagination contract for list endpoints. Pagination
//! metadata travels in a `Pagination` response header so list bodies stay
//! plain arrays.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Upper bound on requested page size.
const MAX_PAGE_SIZE: i64 = 50;

const fn default_page_number() -> i64 {
    1
}

const fn default_page_size() -> i64 {
    10
}

/// Client-supplied pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// Effective page number (1-based).
    #[must_use]
    pub fn number(&self) -> i64 {
        self.page_number.max(1)
    }

    /// Effective page size, clamped to `1..=50`.
    #[must_use]
    pub fn size(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of rows to skip for the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.number() - 1) * self.size()
    }
}

/// A bounded slice of a larger result set plus its metadata.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Wire shape of the `Pagination` header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaginationHeader {
    current_page: i64,
    page_size: i64,
    total_count: i64,
    total_pages: i64,
}

impl<T> Page<T> {
    /// Build a page from one page of items plus the total matching count.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: i64, params: &PaginationParams) -> Self {
        let page_size = params.size();
        // Ceiling division; zero matches means zero pages.
        let total_pages = (total_count + page_size - 1) / page_size;
        Self {
            items,
            current_page: params.number(),
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Response headers carrying the pagination metadata.
    ///
    /// `Access-Control-Expose-Headers` is included so browser clients can
    /// read the metadata cross-origin.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let meta = PaginationHeader {
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        };

        let value = serde_json::to_string(&meta)
            .ok()
            .and_then(|s| HeaderValue::from_str(&s).ok());
        if let Some(value) = value {
            headers.insert(HeaderName::from_static("pagination"), value);
            headers.insert(
                HeaderName::from_static("access-control-expose-headers"),
                HeaderValue::from_static("Pagination"),
            );
        }

        headers
    }
}
