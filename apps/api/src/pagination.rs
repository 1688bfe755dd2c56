//! List pagination.
//!
//! Every list endpoint takes `?page=N&page_size=M` (1-based pages) and
//! responds with the `Page` envelope:
//!
//! ```json
//! { "count": 42, "page": 1, "page_size": 20, "results": [ ... ] }
//! ```
//!
//! The default and maximum page sizes come from [`ApiConfig`]; a client
//! asking for more than the maximum is clamped, not rejected.

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;

/// Raw pagination query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Pagination resolved against the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    /// Resolves raw parameters: page defaults to 1 (0 is treated as 1),
    /// page_size defaults to the configured value and is clamped to the
    /// configured maximum (0 is treated as the default).
    pub fn resolve(params: PageParams, config: &ApiConfig) -> Self {
        let page = params.page.unwrap_or(1).max(1);

        let page_size = match params.page_size {
            None | Some(0) => config.default_page_size,
            Some(requested) => requested.min(config.max_page_size),
        };

        PageWindow { page, page_size }
    }

    /// SQL LIMIT for this window.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL OFFSET for this window.
    pub fn offset(&self) -> i64 {
        i64::from(self.page_size) * i64::from(self.page - 1)
    }
}

/// Response envelope for list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total matching records (across all pages).
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Builds the envelope for a fetched window.
    pub fn new(count: i64, window: PageWindow, results: Vec<T>) -> Self {
        Page {
            count,
            page: window.page,
            page_size: window.page_size,
            results,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
