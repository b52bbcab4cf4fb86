//! Pagination types for query responses
//!
//! Request pages are 1-based. The `currentPage` reported back is 0-based and
//! clamped to the last page; API clients depend on that asymmetry.

use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::result::QueryResult;

/// Pagination parameters of a query, already clamped by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryPagination {
    rows: i64,
    page: i64,
}

impl QueryPagination {
    /// Clamp requested rows and page against the configuration.
    ///
    /// Rows fall back to `default_rows` when not positive and are capped at
    /// `max_rows`; a page below 1 falls back to `default_page`.
    pub fn new(rows: i64, page: i64, config: &QueryConfig) -> Self {
        let rows = if rows <= 0 {
            config.default_rows
        } else {
            rows.min(config.max_rows)
        };
        let page = if page < 1 { config.default_page } else { page };
        Self { rows, page }
    }

    /// Configured default page and page size
    pub fn defaults(config: &QueryConfig) -> Self {
        Self::new(0, 0, config)
    }

    pub fn rows(&self) -> i64 {
        self.rows
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    /// Window of rows to return out of `total_count` filtered rows.
    ///
    /// A page past the end yields the last page.
    pub fn window(&self, total_count: usize) -> PageWindow {
        let rows = self.rows.max(1) as usize;
        let total_pages = total_count.div_ceil(rows);
        if total_pages == 0 {
            return PageWindow { offset: 0, limit: rows };
        }
        let page = (self.page.max(1) as usize).min(total_pages);
        PageWindow {
            offset: (page - 1) * rows,
            limit: rows,
        }
    }
}

/// Offset/limit slice of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    /// Range of indices this window covers in a result of `len` rows
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = self.offset.saturating_add(self.limit).min(len);
        start..end
    }
}

/// Pagination metadata of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    /// Compute page metadata for `total_count` rows split into pages of
    /// `page_size`, for the 1-based `requested_page`.
    pub fn calculate(total_count: i64, page_size: i64, requested_page: i64) -> QueryResult<Self> {
        if total_count < 0 {
            return Err(QueryError::argument("totalCount", "must not be negative"));
        }
        if page_size < 0 {
            return Err(QueryError::argument("pageSize", "must not be negative"));
        }
        if page_size == 0 {
            return Err(QueryError::argument("pageSize", "must be greater than zero"));
        }

        let total_pages = total_count / page_size + i64::from(total_count % page_size != 0);
        let current_page = if requested_page >= total_pages {
            (total_pages - 1).max(0)
        } else {
            requested_page
        };

        Ok(Self {
            current_page,
            page_size,
            total_count,
            total_pages,
        })
    }
}

/// Paged query response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedResponse<T> {
    pub pagination: PaginationInfo,
    pub data: Vec<T>,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationInfo) -> Self {
        Self { pagination, data }
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
