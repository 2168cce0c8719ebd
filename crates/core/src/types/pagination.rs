//! Offset pagination shared by list endpoints.

use serde::Serialize;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One page of a filtered listing.
///
/// `page` is 1-based and derived from `skip / page_size`, so a caller that
/// skips into the middle of a page still gets a sensible number back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    /// Slice `all` into a page.
    ///
    /// `limit` is clamped to `1..=MAX_PAGE_SIZE`; `None` uses
    /// [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn from_vec(all: Vec<T>, skip: usize, limit: Option<usize>) -> Self {
        let page_size = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let total = all.len();
        let items = all.into_iter().skip(skip).take(page_size).collect();

        Self {
            items,
            total,
            page: skip / page_size + 1,
            page_size,
            pages: total.div_ceil(page_size),
        }
    }

    /// Transform the items while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}
