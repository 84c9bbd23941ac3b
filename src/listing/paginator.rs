/// Items revealed per page.
pub const PAGE_SIZE: usize = 10;

/// Prefix-growing pagination cursor.
///
/// The visible range is always `list[0 .. page * page_size]`, clamped to the
/// list length. It never windows: loading more only extends the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of items visible out of `total`.
    pub fn visible_len(&self, total: usize) -> usize {
        self.page.saturating_mul(self.page_size).min(total)
    }

    /// The visible prefix of `list`.
    pub fn visible<'a, T>(&self, list: &'a [T]) -> &'a [T] {
        &list[..self.visible_len(list.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_len(total) < total
    }

    /// Reveal the next page. No-op once everything is visible.
    ///
    /// Returns whether the page advanced.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_twenty_five_items() {
        let list: Vec<u32> = (0..25).collect();
        let mut pager = Paginator::default();

        assert_eq!(pager.visible(&list).len(), 10);
        assert!(pager.has_more(list.len()));

        assert!(pager.load_more(list.len()));
        assert_eq!(pager.visible(&list).len(), 20);
        assert!(pager.has_more(list.len()));

        assert!(pager.load_more(list.len()));
        assert_eq!(pager.visible(&list).len(), 25);
        assert!(!pager.has_more(list.len()));
    }

    #[test]
    fn test_load_more_when_exhausted_is_noop() {
        let list: Vec<u32> = (0..7).collect();
        let mut pager = Paginator::default();
        assert!(!pager.has_more(list.len()));
        assert!(!pager.load_more(list.len()));
        assert!(!pager.load_more(list.len()));
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.visible(&list), &list[..]);
    }

    #[test]
    fn test_exact_multiple_has_no_more() {
        let list: Vec<u32> = (0..10).collect();
        let pager = Paginator::default();
        assert_eq!(pager.visible(&list).len(), 10);
        assert!(!pager.has_more(list.len()));
    }

    #[test]
    fn test_empty_list() {
        let list: Vec<u32> = Vec::new();
        let mut pager = Paginator::default();
        assert!(pager.visible(&list).is_empty());
        assert!(!pager.load_more(0));
    }

    #[test]
    fn test_reset() {
        let mut pager = Paginator::default();
        pager.load_more(100);
        pager.load_more(100);
        assert_eq!(pager.page(), 3);
        pager.reset();
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        assert_eq!(Paginator::new(0).page_size(), 1);
    }

    proptest! {
        #[test]
        fn prop_visible_is_prefix_and_exhaustion_is_stable(total in 0usize..200, calls in 0usize..30) {
            let list: Vec<usize> = (0..total).collect();
            let mut pager = Paginator::default();
            for _ in 0..calls {
                let before = pager.visible(&list).len();
                let advanced = pager.load_more(total);
                let after = pager.visible(&list).len();
                if advanced {
                    prop_assert!(after > before);
                } else {
                    prop_assert_eq!(after, before);
                }
            }
            let visible = pager.visible(&list);
            prop_assert_eq!(visible, &list[..visible.len()]);
            prop_assert_eq!(pager.has_more(total), visible.len() < total);
        }
    }
}
