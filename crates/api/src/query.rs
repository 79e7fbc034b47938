//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Page-based pagination parameters (`?page=&per_page=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Resolve `(page, per_page, offset)`: page is at least 1, `per_page`
    /// falls back to `default_per_page` and is clamped to `1..=MAX_PER_PAGE`.
    pub fn resolve(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page, (page - 1) * per_page)
    }
}
