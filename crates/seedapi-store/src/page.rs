use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Pagination window over a collection.
///
/// Pages are 1-based. The window for page `k` of size `p` is
/// `[(k-1)*p, k*p)`, clamped to the collection length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
}

impl Page {
    pub const DEFAULT_PAGE: usize = 1;
    pub const DEFAULT_PER_PAGE: usize = 10;

    /// Build a window from optional query parameters, filling in defaults.
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(Self::DEFAULT_PAGE),
            per_page: per_page.unwrap_or(Self::DEFAULT_PER_PAGE),
        }
    }

    /// Index range this window covers in a collection of `len` items.
    ///
    /// Page 0, a zero page size, and pages past the end all yield an empty
    /// range.
    pub fn range(&self, len: usize) -> Range<usize> {
        if self.page == 0 || self.per_page == 0 {
            return 0..0;
        }
        let start = (self.page - 1).saturating_mul(self.per_page).min(len);
        let end = self.page.saturating_mul(self.per_page).min(len);
        start..end
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults() {
        let page = Page::default();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.range(25), 0..10);
        assert_eq!(page.range(4), 0..4);
    }

    #[test]
    fn partial_defaults() {
        assert_eq!(Page::new(Some(2), None).range(25), 10..20);
        assert_eq!(Page::new(None, Some(3)).range(25), 0..3);
    }

    #[test]
    fn eleven_items_five_per_page() {
        let len = 11;
        assert_eq!(Page::new(Some(1), Some(5)).range(len), 0..5);
        assert_eq!(Page::new(Some(2), Some(5)).range(len), 5..10);
        assert_eq!(Page::new(Some(3), Some(5)).range(len), 10..11);
        assert!(Page::new(Some(4), Some(5)).range(len).is_empty());
    }

    #[test]
    fn zero_values_are_empty() {
        assert!(Page::new(Some(0), Some(5)).range(11).is_empty());
        assert!(Page::new(Some(1), Some(0)).range(11).is_empty());
    }

    #[test]
    fn huge_values_do_not_overflow() {
        assert!(Page::new(Some(usize::MAX), Some(usize::MAX)).range(11).is_empty());
    }

    proptest! {
        #[test]
        fn window_matches_slice_bounds(len in 0usize..200, page in 1usize..30, per_page in 1usize..30) {
            let range = Page::new(Some(page), Some(per_page)).range(len);
            let start = ((page - 1) * per_page).min(len);
            let end = (page * per_page).min(len);
            prop_assert_eq!(range.clone(), start..end);
            prop_assert!(range.len() <= per_page);
        }
    }
}
