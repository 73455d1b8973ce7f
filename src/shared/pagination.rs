/// Fixed page size of the product search.
pub const SEARCH_PAGE_SIZE: u64 = 10;

/// A resolved 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Build a page window from a client-supplied page number.
    ///
    /// Absent or non-positive page numbers resolve to the first page. Pages
    /// past [`max_page`](Self::max_page) are clamped to it; that page is
    /// far beyond any real table and reads as empty.
    pub fn new(page: Option<i64>, limit: u64) -> Self {
        let limit = limit.max(1);
        let page = match page {
            Some(p) if p >= 1 => (p as u64).min(Self::max_page(limit)),
            _ => 1,
        };
        Self { page, limit }
    }

    /// Largest page whose offset still fits the store's signed 64-bit
    /// OFFSET parameter.
    pub fn max_page(limit: u64) -> u64 {
        i64::MAX as u64 / limit.max(1)
    }

    /// Parse a raw `page` query value. Anything that is not an integer is
    /// treated as absent.
    pub fn from_query(raw: Option<&str>, limit: u64) -> Self {
        let page = raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(page, limit)
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}
