// ── Client-side pagination ──
//
// Pure slicing over whatever list the view currently holds. Pages are
// 1-based to match what operators see.

use std::ops::Range;

/// Page size on the registrations screen.
pub const REGISTRATION_PAGE_SIZE: usize = 5;
/// Page size on user and vehicle lists.
pub const DIRECTORY_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    page: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`; zero for an empty list.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Index range of the current page, clipped to `len`.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.range(items.len())).unwrap_or(&[])
    }

    /// 1-based page holding `index`.
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size + 1
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn first(&mut self) {
        self.page = 1;
    }

    pub fn last(&mut self, len: usize) {
        self.page = self.page_count(len).max(1);
    }

    /// Advance one page; returns `false` when already on the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.page < self.page_count(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Keep the page index valid after the list shrinks.
    pub fn clamp(&mut self, len: usize) {
        let max = self.page_count(len).max(1);
        if self.page > max {
            self.page = max;
        }
    }

    /// Jump to the page showing `index`.
    pub fn show_index(&mut self, index: usize) {
        self.page = self.page_of(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_length_matches_formula() {
        for page_size in [REGISTRATION_PAGE_SIZE, DIRECTORY_PAGE_SIZE] {
            for n in 0..40usize {
                let items: Vec<usize> = (0..n).collect();
                let mut pager = Pager::new(page_size);
                assert_eq!(pager.page_count(n), n.div_ceil(page_size));
                for k in 1..=10usize {
                    pager.set_page(k);
                    let expected = page_size.min(n.saturating_sub((k - 1) * page_size));
                    assert_eq!(pager.slice(&items).len(), expected, "n={n} P={page_size} k={k}");
                }
            }
        }
    }

    #[test]
    fn slice_returns_the_right_items() {
        let items: Vec<u32> = (1..=13).collect();
        let mut pager = Pager::new(5);
        pager.set_page(3);
        assert_eq!(pager.slice(&items), &[11, 12, 13]);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut pager = Pager::new(6);
        assert!(!pager.prev());
        assert!(pager.next(7));
        assert!(!pager.next(7));
        assert_eq!(pager.page(), 2);

        pager.clamp(3);
        assert_eq!(pager.page(), 1);

        pager.last(0);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn show_index_selects_containing_page() {
        let mut pager = Pager::new(5);
        pager.show_index(10);
        assert_eq!(pager.page(), 3);
        pager.show_index(4);
        assert_eq!(pager.page(), 1);
    }
}
