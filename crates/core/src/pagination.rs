//! Pagination arithmetic for result listings
//!
//! Pure functions that compute offsets, neighbouring pages, and the window of
//! page numbers linked from the navigation bar. Page numbers are 1-indexed;
//! a page number of `0` in the output means "no such page".

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;

/// Page and page size requested by a client, already normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: usize,
    pub limit: usize,
}

impl PaginationParams {
    /// Normalise raw query values
    ///
    /// A page below 1 becomes [`DEFAULT_PAGE`]. A missing or non-positive
    /// limit becomes `default_limit`, and a limit above `max_limit` is
    /// clamped to it. Fails when the page lies so far out that its offset
    /// cannot be represented.
    pub fn new(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: usize,
        max_limit: usize,
    ) -> Result<Self, CoreError> {
        let page = match page {
            Some(p) if p >= 1 => p as usize,
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 => (l as usize).min(max_limit),
            _ => default_limit,
        };
        checked_offset(page, limit)?;
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> usize {
        checked_offset(self.page, self.limit).unwrap_or(usize::MAX)
    }
}

/// Offset of the first result on `page`, bounded by `i64::MAX`
fn checked_offset(page: usize, limit: usize) -> Result<usize, CoreError> {
    page.saturating_sub(1)
        .checked_mul(limit)
        .filter(|offset| *offset <= i64::MAX as usize)
        .ok_or_else(|| CoreError::InvalidArgument(format!("page {page} is out of range")))
}

/// Pagination state handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub offset: usize,
    pub total_count: usize,
    pub result_count: usize,
    pub total_pages: usize,
    pub previous_page: usize,
    pub next_page: usize,
    pub pages: Vec<usize>,
    pub approximate: bool,
}

impl Pagination {
    /// Compute pagination for `page` of a listing with `total_count` results
    ///
    /// `result_count` is the number of results actually present on this
    /// page. `link_count` bounds the number of page links displayed.
    /// Fails with [`CoreError::InvalidArgument`] when `page_size` or
    /// `link_count` is below 1, or when the offset of `page` overflows.
    pub fn compute(
        page: i64,
        page_size: i64,
        total_count: usize,
        result_count: usize,
        link_count: usize,
    ) -> Result<Self, CoreError> {
        if page_size < 1 {
            return Err(CoreError::InvalidArgument(format!(
                "page size must be at least 1, got {page_size}"
            )));
        }
        if link_count < 1 {
            return Err(CoreError::InvalidArgument(format!(
                "link count must be at least 1, got {link_count}"
            )));
        }

        let limit = page_size as usize;
        let page = if page < 1 { DEFAULT_PAGE } else { page as usize };
        let total_pages = total_count.div_ceil(limit);

        let offset = checked_offset(page, limit)?;
        let previous_page = if page <= 1 { 0 } else { page - 1 };
        let next_page = if page >= total_pages { 0 } else { page + 1 };

        Ok(Self {
            page,
            limit,
            offset,
            total_count,
            result_count,
            total_pages,
            previous_page,
            next_page,
            pages: pages_to_link(page, total_pages, link_count),
            approximate: false,
        })
    }

    /// Same as [`Pagination::compute`], taking already normalised parameters
    pub fn from_params(
        params: PaginationParams,
        total_count: usize,
        result_count: usize,
        link_count: usize,
    ) -> Result<Self, CoreError> {
        Self::compute(
            params.page as i64,
            params.limit as i64,
            total_count,
            result_count,
            link_count,
        )
    }

    /// Mark the total count as an estimate
    pub fn with_approximate(mut self, approximate: bool) -> Self {
        self.approximate = approximate;
        self
    }

    /// Whether there is more than one page to navigate between
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }
}

/// Window of at most `link_count` page numbers around `page`
///
/// The window is as centred on `page` as the bounds `[1, total_pages]` allow,
/// and stays full-width whenever enough pages exist.
pub fn pages_to_link(page: usize, total_pages: usize, link_count: usize) -> Vec<usize> {
    let page = page as i64;
    let total = total_pages as i64;
    let count = link_count as i64;

    let mut start = page - count / 2;
    if total - start < count {
        start = total - count + 1;
    }
    if start < 1 {
        start = 1;
    }
    let end = (start + count - 1).min(total);

    (start..=end).map(|p| p as usize).collect()
}

/// Build a URL from a path and query parameters, percent-encoding values
pub fn build_url(path: &str, params: &[(&str, String)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

/// `base_url` with its `page` query parameter set to `page`
///
/// Every other query parameter of `base_url` is kept in place.
pub fn page_url(base_url: &str, page: usize) -> String {
    let (path, query) = base_url.split_once('?').unwrap_or((base_url, ""));
    let page_param = format!("page={page}");

    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty() && *p != "page" && !p.starts_with("page="))
        .collect();
    params.push(&page_param);

    format!("{path}?{}", params.join("&"))
}
