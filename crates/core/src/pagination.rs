//! Page/limit arithmetic for list endpoints.
//!
//! Pure functions: query values in, offsets and response envelopes out.

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_PAGE: usize = 1;
pub const MAX_LIMIT: usize = 100;

/// Error type for pagination operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid page: {0}")]
    InvalidPage(String),
}

/// A validated page request (1-indexed page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate raw `page` and `limit` query values.
    ///
    /// Missing or empty values fall back to the defaults. `limit` must be in
    /// `1..=MAX_LIMIT` and `page` at least 1.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let mut request = Self::default();

        if let Some(raw) = limit.filter(|raw| !raw.is_empty()) {
            request.limit = raw
                .parse::<usize>()
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .ok_or_else(|| PaginationError::InvalidLimit(raw.to_string()))?;
        }

        if let Some(raw) = page.filter(|raw| !raw.is_empty()) {
            request.page = raw
                .parse::<usize>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| PaginationError::InvalidPage(raw.to_string()))?;
        }

        Ok(request)
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: usize, request: PageRequest) -> Self {
        let PageRequest { page, limit } = request;

        let previous = if page > 1 { Some(page - 1) } else { None };
        let next = if page * limit < total {
            Some(page + 1)
        } else {
            None
        };

        Self {
            data,
            total,
            limit,
            previous,
            next,
        }
    }

    /// Convert every item, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            previous: self.previous,
            next: self.next,
        }
    }
}
