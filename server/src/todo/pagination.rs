use std::collections::HashMap;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page selection for the list endpoint. Malformed or out-of-range query
/// values fall back to defaults instead of failing the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self::new(
            query.get("page").map(String::as_str),
            query.get("page_size").map(String::as_str),
        )
    }

    pub fn new(page: Option<&str>, page_size: Option<&str>) -> Self {
        // Unparsable or negative values are treated like out-of-range ones.
        let parse = |raw: Option<&str>, default: u64| {
            raw.map_or(Some(default), |raw| raw.parse::<u64>().ok())
        };

        let page = parse(page, DEFAULT_PAGE)
            .filter(|&page| page >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let page_size = parse(page_size, DEFAULT_PAGE_SIZE)
            .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self { page, page_size }
    }

    /// Rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }
}
