//! Page slicing and compact page-index strips.
//!
//! # Invariants
//! - `paginate` trusts its page number and never clamps; out-of-range pages
//!   produce an empty slice instead of panicking.
//! - `page_index_sequence` is dense up to `DENSE_PAGE_LIMIT` pages and
//!   bounded in width beyond that.

use serde::Serialize;

/// Largest page count rendered without ellipsis markers.
pub const DENSE_PAGE_LIMIT: usize = 7;

/// One entry of a page-index strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageIndex {
    /// 1-based page number.
    Page(usize),
    /// Pages elided between the first page and the window.
    EllipsisStart,
    /// Pages elided between the window and the last page.
    EllipsisEnd,
}

/// Returns the items of 1-based `page_number`.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items; an empty list still has one page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Clamps a requested page number into `[1, total_pages]`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Builds the page-index strip for `current_page` of `total_pages`.
pub fn page_index_sequence(current_page: usize, total_pages: usize) -> Vec<PageIndex> {
    if total_pages <= DENSE_PAGE_LIMIT {
        return (1..=total_pages).map(PageIndex::Page).collect();
    }

    let mut sequence = vec![PageIndex::Page(1)];
    if current_page > 3 {
        sequence.push(PageIndex::EllipsisStart);
    }

    let window_start = current_page.saturating_sub(1).max(2);
    let window_end = current_page.saturating_add(1).min(total_pages - 1);
    sequence.extend((window_start..=window_end).map(PageIndex::Page));

    if current_page < total_pages - 2 {
        sequence.push(PageIndex::EllipsisEnd);
    }
    sequence.push(PageIndex::Page(total_pages));
    sequence
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, total_pages};

    #[test]
    fn total_pages_rounds_up_and_never_returns_zero() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 1);
    }

    #[test]
    fn clamp_page_keeps_requests_in_range() {
        assert_eq!(clamp_page(0, 4), 1);
        assert_eq!(clamp_page(9, 4), 4);
        assert_eq!(clamp_page(3, 0), 1);
    }
}
