//! Pagination utilities for the service layer.
//!
//! `Pagination` normalizes client input; `PageMeta` is the envelope metadata
//! returned alongside every paginated listing.

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}

/// Listing metadata in the wire shape the API exposes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(opts: Pagination, total: u64) -> Self {
        let page = if opts.page == 0 { 1 } else { opts.page };
        let limit = opts.per_page.clamp(1, 100);
        Self { page, limit, total, total_pages: total.div_ceil(limit as u64) }
    }
}

/// One page of results plus its metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, opts: Pagination, total: u64) -> Self {
        Self { items, meta: PageMeta::new(opts, total) }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), meta: self.meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
    }

    #[test]
    fn meta_rounds_total_pages_up() {
        let meta = PageMeta::new(Pagination { page: 1, per_page: 10 }, 21);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.limit, 10);
    }

    #[test]
    fn meta_for_empty_listing() {
        let meta = PageMeta::new(Pagination::default(), 0);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PageMeta::new(Pagination { page: 2, per_page: 5 }, 11);
        let json = serde_json::to_value(meta).expect("serialize");
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["page"], 2);
        assert_eq!(json["limit"], 5);
    }
}
