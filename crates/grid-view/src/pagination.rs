//! Page windowing and the page-number strip.

use grid_model::PaginationState;

/// One window over a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    /// Current page after clamping (1-indexed).
    pub current_page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// Index of the first row in the full result set.
    pub start: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Slice `items` to the requested page, clamped into `[1, total_pages]`.
pub fn paginate<'a, T>(items: &'a [T], pagination: &PaginationState) -> Page<'a, T> {
    let total_rows = items.len();
    let page_size = pagination.effective_page_size();
    let total_pages = pagination.total_pages(total_rows);
    let current_page = pagination.clamped_page(total_rows);

    let start = ((current_page - 1) * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);

    Page {
        rows: &items[start..end],
        current_page,
        total_pages,
        total_rows,
        start,
    }
}

/// Page numbers to display around `current`, at most `cap` of them.
///
/// The window is centred on the current page and shifted when it would run
/// past either end, so its length is always `min(cap, total)`.
pub fn page_strip(current: usize, total: usize, cap: usize) -> Vec<usize> {
    let total = total.max(1);
    let current = current.clamp(1, total);
    let len = cap.max(1).min(total);
    let half = cap.max(1) / 2;

    let start = current.saturating_sub(half).max(1).min(total - len + 1);
    (start..start + len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_centres_on_current() {
        assert_eq!(page_strip(5, 10, 7), vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn strip_rebalances_at_edges() {
        assert_eq!(page_strip(1, 10, 7), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(page_strip(10, 10, 7), vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn strip_shorter_than_cap() {
        assert_eq!(page_strip(2, 3, 7), vec![1, 2, 3]);
        assert_eq!(page_strip(1, 0, 7), vec![1]);
    }

    #[test]
    fn strip_even_cap_keeps_length() {
        assert_eq!(page_strip(5, 10, 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn empty_result_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, &PaginationState::default());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.rows.is_empty());
        assert!(!page.has_next());
    }
}
