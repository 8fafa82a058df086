//! Page arithmetic shared by every post listing.

use serde::{Deserialize, Serialize};

/// A validated page request. Both values are at least 1; bounds on `limit` are
/// enforced by the input validator, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 50;

    pub fn new(page: u64, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Number of records to skip: `(page - 1) * limit`, capped at `i64::MAX` so it
    /// always fits a SQL `OFFSET`.
    pub fn skip(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(u64::from(self.limit))
            .min(i64::MAX as u64)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// Pagination block returned alongside every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_posts: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            current_page: request.page,
            total_pages: total.div_ceil(limit),
            total_posts: total,
            has_next: request.page.saturating_mul(limit) < total,
            has_prev: request.page > 1,
        }
    }
}

/// One page of results plus its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
