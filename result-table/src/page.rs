use crate::ColumnDef;

/// One rendered page of a result table
#[derive(Debug)]
pub struct TablePage<'a, T> {
    pub columns: Vec<&'static ColumnDef>,
    pub rows: Vec<&'a T>,
    /// Current page, 1-based and clamped to `page_count`
    pub page: usize,
    pub page_count: usize,
    pub per_page: usize,
    /// Rows left after filtering
    pub matched: usize,
    /// Rows returned by the search before filtering
    pub total: usize,
}

impl<'a, T> TablePage<'a, T> {
    pub(crate) fn new(
        columns: Vec<&'static ColumnDef>,
        matched: Vec<&'a T>,
        total: usize,
        page: usize,
        per_page: usize,
    ) -> Self {
        let matched_len = matched.len();
        let page_count = matched_len.div_ceil(per_page).max(1);
        let page = page.clamp(1, page_count);
        let rows = matched
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        Self {
            columns,
            rows,
            page,
            page_count,
            per_page,
            matched: matched_len,
            total,
        }
    }

    /// Page numbers worth linking to: the first, the last and everything within
    /// `radius` of the current page.
    pub fn page_window(&self, radius: usize) -> Vec<usize> {
        (1..=self.page_count)
            .filter(|page| {
                *page == 1
                    || *page == self.page_count
                    || (*page >= self.page.saturating_sub(radius)
                        && *page <= self.page.saturating_add(radius))
            })
            .collect()
    }

    /// 1-based index of the first row on this page, for "showing 51-100 of 240"
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }

    pub fn last_row(&self) -> usize {
        self.first_row() + self.rows.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod test {
    use crate::test_rows::{listing, Listing};
    use crate::TableView;

    fn many(count: usize) -> Vec<Listing> {
        (0..count)
            .map(|i| listing(&format!("Item {i}"), i as f64, i as i32, None))
            .collect()
    }

    #[test]
    fn paginates_and_clamps() {
        let rows = many(120);
        let view = TableView {
            page: Some(3),
            per_page: Some(50),
            ..Default::default()
        };
        let page = view.apply(&rows);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows.len(), 20);
        assert_eq!(page.first_row(), 101);
        assert_eq!(page.last_row(), 120);
        let beyond = view.with_page(9).apply(&rows);
        assert_eq!(beyond.page, 3);
    }

    #[test]
    fn empty_result_has_one_page() {
        let rows: Vec<Listing> = Vec::new();
        let page = TableView::default().apply(&rows);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.first_row(), 0);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn window_keeps_ends_and_neighbours() {
        let rows = many(1000);
        let view = TableView {
            page: Some(10),
            per_page: Some(10),
            ..Default::default()
        };
        let page = view.apply(&rows);
        assert_eq!(page.page_window(2), [1, 8, 9, 10, 11, 12, 100]);
    }

    #[test]
    fn filter_counts_are_reported() {
        let rows = many(30);
        let view = TableView {
            q: Some("Item 2".into()),
            ..Default::default()
        };
        let page = view.apply(&rows);
        assert_eq!(page.total, 30);
        assert!(page.matched < 30);
        assert!(page.rows.iter().all(|r| r.name.contains('2')));
    }
}
