//! Pagination over in-memory lists.

use serde::{Deserialize, Serialize};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total number of items.
    pub total: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Get start item number (1-indexed), or 0 when the page is empty.
    pub fn start_item(&self) -> usize {
        if self.offset() >= self.total || self.page == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        if self.start_item() == 0 {
            0
        } else {
            self.offset().saturating_add(self.per_page).min(self.total)
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 20, 0)
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// The items on this page.
    pub items: &'a [T],
    /// Pagination info.
    pub pagination: Pagination,
}

impl<T> Page<'_, T> {
    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Slice out a 1-based page; page 0 or a page past the end is empty.
pub fn paginate<T>(list: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let pagination = Pagination::new(page, page_size, list.len());
    let items = if pagination.start_item() == 0 || page_size == 0 {
        &list[..0]
    } else {
        &list[pagination.offset()..pagination.end_item()]
    };
    Page { items, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_basic() {
        let p = Pagination::new(1, 10, 95);
        assert_eq!(p.total_pages, 10);
        assert!(p.has_next);
        assert!(!p.has_prev);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(10, 10, 95);
        assert!(!p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.start_item(), 91);
        assert_eq!(p.end_item(), 95);
    }

    #[test]
    fn test_paginate_slices() {
        let list: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&list, 1, 10).items, &list[0..10]);
        assert_eq!(paginate(&list, 3, 10).items, &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let list: Vec<u32> = (1..=25).collect();
        assert!(paginate(&list, 4, 10).is_empty());
        assert!(paginate(&list, 0, 10).is_empty());
        assert!(paginate(&list, 1, 0).is_empty());
        assert!(paginate::<u32>(&[], 1, 10).is_empty());
    }
}
