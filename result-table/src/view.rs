use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_with::{formats::CommaSeparator, serde_as, StringWithSeparator};

use crate::{filter::filter_rows, Cell, ColumnDef, ColumnKind, TablePage, TableError, TableRow};

pub const DEFAULT_PER_PAGE: usize = 50;
pub const MAX_PER_PAGE: usize = 500;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Table state that is carried in the query string next to the search form, so a
/// sorted and filtered result can be bookmarked or shared.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub desc: bool,
    /// Fuzzy filter text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cols: Vec<String>,
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

impl TableView {
    /// Reads the table keys out of a full query string. Keys that belong to the search
    /// form are ignored, and a malformed table value resets the table to its defaults
    /// instead of failing the whole page.
    pub fn from_query_str(query: &str) -> Self {
        serde_qs::Config::new(5, false)
            .deserialize_str(query)
            .unwrap_or_default()
    }

    pub fn to_query_string(&self) -> Result<String, TableError> {
        Ok(serde_qs::to_string(self)?)
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn filter(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Every column in display order, hidden ones included
    fn ordered_columns<T: TableRow>(&self) -> Vec<&'static ColumnDef> {
        let mut ordered: Vec<&'static ColumnDef> = Vec::with_capacity(T::COLUMNS.len());
        for column in self.cols.iter().filter_map(|key| T::column(key)) {
            if !ordered.iter().any(|c| c.key == column.key) {
                ordered.push(column);
            }
        }
        for column in T::COLUMNS {
            if !ordered.iter().any(|c| c.key == column.key) {
                ordered.push(column);
            }
        }
        ordered
    }

    fn is_hidden(&self, key: &str) -> bool {
        self.hide.iter().any(|hidden| hidden == key)
    }

    /// Visible columns in display order. Hiding every column is treated as hiding none.
    pub fn columns<T: TableRow>(&self) -> Vec<&'static ColumnDef> {
        let ordered = self.ordered_columns::<T>();
        let visible: Vec<_> = ordered
            .iter()
            .copied()
            .filter(|column| !self.is_hidden(column.key))
            .collect();
        if visible.is_empty() {
            ordered
        } else {
            visible
        }
    }

    /// Columns that are currently hidden, so they can be offered to be shown again
    pub fn hidden_columns<T: TableRow>(&self) -> Vec<&'static ColumnDef> {
        let visible = self.columns::<T>();
        self.ordered_columns::<T>()
            .into_iter()
            .filter(|column| !visible.iter().any(|v| v.key == column.key))
            .collect()
    }

    /// Sort state for a column: `None` when the table is not sorted by it,
    /// `Some(true)` when descending.
    pub fn sorted_by(&self, key: &str) -> Option<bool> {
        (self.sort.as_deref() == Some(key)).then_some(self.desc)
    }

    /// The view after clicking a column header
    pub fn toggle_sort(&self, key: &str, kind: ColumnKind) -> Self {
        let mut view = self.clone();
        if self.sort.as_deref() == Some(key) {
            view.desc = !self.desc;
        } else {
            view.sort = Some(key.to_string());
            view.desc = kind == ColumnKind::Number;
        }
        view.page = None;
        view
    }

    /// Moves `key` past `offset.abs()` visible neighbours, negative offsets moving left.
    /// Hidden columns keep their relative spot and are skipped over.
    pub fn move_column<T: TableRow>(&self, key: &str, offset: isize) -> Self {
        let mut order: Vec<&'static str> = self
            .ordered_columns::<T>()
            .iter()
            .map(|column| column.key)
            .collect();
        if let Some(mut position) = order.iter().position(|k| *k == key) {
            for _ in 0..offset.unsigned_abs() {
                let neighbour = if offset < 0 {
                    order[..position]
                        .iter()
                        .rposition(|k| !self.is_hidden(k))
                } else {
                    order[position + 1..]
                        .iter()
                        .position(|k| !self.is_hidden(k))
                        .map(|p| p + position + 1)
                };
                let Some(neighbour) = neighbour else {
                    break;
                };
                let moving = order.remove(position);
                order.insert(neighbour, moving);
                position = neighbour;
            }
        }
        let mut view = self.clone();
        view.cols = order.into_iter().map(str::to_string).collect();
        view
    }

    pub fn toggle_hidden(&self, key: &str) -> Self {
        let mut view = self.clone();
        if self.is_hidden(key) {
            view.hide.retain(|hidden| hidden != key);
        } else {
            view.hide.push(key.to_string());
        }
        view
    }

    pub fn with_page(&self, page: usize) -> Self {
        let mut view = self.clone();
        view.page = (page > 1).then_some(page);
        view
    }

    /// Clears column order, hidden columns and sorting while keeping the filter
    pub fn reset_layout(&self) -> Self {
        Self {
            q: self.q.clone(),
            per_page: self.per_page,
            ..Self::default()
        }
    }

    fn sort_rows<T: TableRow>(&self, rows: &mut Vec<&T>) {
        let Some(key) = self.sort.as_deref() else {
            return;
        };
        if T::column(key).is_none() {
            return;
        }
        let mut keyed: Vec<(Cell, &T)> = rows
            .drain(..)
            .map(|row| (row.cell(key).unwrap_or(Cell::Empty), row))
            .collect();
        let desc = self.desc;
        keyed.sort_by(|(a, _), (b, _)| match (a.is_empty(), b.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if desc => b.compare(a),
            (false, false) => a.compare(b),
        });
        rows.extend(keyed.into_iter().map(|(_, row)| row));
    }

    /// Filtered and sorted rows without pagination, used for exports
    pub fn rows<'a, T: TableRow>(&self, rows: &'a [T]) -> Vec<&'a T> {
        let mut matched = filter_rows(rows, self.filter());
        self.sort_rows(&mut matched);
        matched
    }

    pub fn apply<'a, T: TableRow>(&self, rows: &'a [T]) -> TablePage<'a, T> {
        let matched = self.rows(rows);
        TablePage::new(
            self.columns::<T>(),
            matched,
            rows.len(),
            self.page(),
            self.per_page(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::TableView;
    use crate::test_rows::{sample, Listing};
    use crate::{ColumnKind, TableRow};

    fn names<'a>(rows: &[&'a Listing]) -> Vec<&'a str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    fn keys(view: &TableView) -> Vec<&'static str> {
        view.columns::<Listing>().iter().map(|c| c.key).collect()
    }

    #[test]
    fn sorts_numbers_with_nan_last() {
        let rows = sample();
        let view = TableView {
            sort: Some("price".into()),
            desc: true,
            ..Default::default()
        };
        assert_eq!(
            names(&view.rows(&rows)),
            [
                "Cunning Craftsman's Draught",
                "Grade 8 Tincture of Strength",
                "Rroneek Chuck",
                "Dark Matter",
                "Rroneek Serloin",
            ]
        );
        let ascending = TableView {
            desc: false,
            ..view
        };
        assert_eq!(names(&ascending.rows(&rows))[0], "Dark Matter");
        assert_eq!(names(&ascending.rows(&rows))[4], "Rroneek Serloin");
    }

    #[test]
    fn empty_cells_sort_last_in_both_directions() {
        let rows = sample();
        for desc in [true, false] {
            let view = TableView {
                sort: Some("world".into()),
                desc,
                ..Default::default()
            };
            let sorted = view.rows(&rows);
            assert_eq!(sorted.last().unwrap().world, None);
        }
    }

    #[test]
    fn unknown_sort_key_keeps_input_order() {
        let rows = sample();
        let view = TableView {
            sort: Some("url".into()),
            ..Default::default()
        };
        let expected: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names(&view.rows(&rows)), expected);
    }

    #[test]
    fn toggle_sort_picks_direction_by_kind() {
        let view = TableView {
            page: Some(3),
            ..Default::default()
        };
        let by_price = view.toggle_sort("price", ColumnKind::Number);
        assert_eq!(by_price.sort.as_deref(), Some("price"));
        assert!(by_price.desc);
        assert_eq!(by_price.page, None);
        let flipped = by_price.toggle_sort("price", ColumnKind::Number);
        assert!(!flipped.desc);
        let by_name = flipped.toggle_sort("name", ColumnKind::Text);
        assert!(!by_name.desc);
        assert_eq!(by_name.sorted_by("name"), Some(false));
        assert_eq!(by_name.sorted_by("price"), None);
    }

    #[test]
    fn column_order_drops_unknown_and_appends_missing() {
        let view = TableView {
            cols: vec!["hq".into(), "bogus".into(), "price".into(), "hq".into()],
            ..Default::default()
        };
        assert_eq!(keys(&view), ["hq", "price", "name", "quantity", "world"]);
    }

    #[test]
    fn hiding_every_column_shows_them_all() {
        let view = TableView {
            hide: Listing::COLUMNS.iter().map(|c| c.key.to_string()).collect(),
            ..Default::default()
        };
        assert_eq!(keys(&view).len(), Listing::COLUMNS.len());
        let partly = TableView::default().toggle_hidden("world");
        assert_eq!(keys(&partly), ["name", "price", "quantity", "hq"]);
        assert_eq!(
            partly.hidden_columns::<Listing>()
                .iter()
                .map(|c| c.key)
                .collect::<Vec<_>>(),
            ["world"]
        );
        assert!(partly.toggle_hidden("world").hide.is_empty());
    }

    #[test]
    fn move_column_skips_hidden_and_clamps() {
        let view = TableView::default().toggle_hidden("quantity");
        let moved = view.move_column::<Listing>("price", 1);
        assert_eq!(keys(&moved), ["name", "world", "price", "hq"]);
        let to_front = moved.move_column::<Listing>("hq", -10);
        assert_eq!(keys(&to_front), ["hq", "name", "world", "price"]);
        let unchanged = to_front.move_column::<Listing>("hq", -1);
        assert_eq!(keys(&unchanged), keys(&to_front));
    }

    #[test]
    fn query_string_round_trip_skips_defaults() {
        assert_eq!(TableView::default().to_query_string().unwrap(), "");
        let view = TableView {
            sort: Some("price".into()),
            desc: true,
            q: Some("dark matter".into()),
            cols: vec!["price".into(), "name".into()],
            page: Some(2),
            ..Default::default()
        };
        let encoded = view.to_query_string().unwrap();
        assert!(!encoded.contains("hide"));
        assert_eq!(TableView::from_query_str(&encoded), view);
    }

    #[test]
    fn form_keys_are_ignored_and_bad_values_reset() {
        let view = TableView::from_query_str("server=Balmung&filters=0,1&sort=price&page=2");
        assert_eq!(view.sort.as_deref(), Some("price"));
        assert_eq!(view.page(), 2);
        assert_eq!(TableView::from_query_str("page=two"), TableView::default());
    }

    #[test]
    fn per_page_and_page_are_clamped() {
        let view = TableView {
            page: Some(0),
            per_page: Some(100_000),
            ..Default::default()
        };
        assert_eq!(view.page(), 1);
        assert_eq!(view.per_page(), super::MAX_PER_PAGE);
        assert_eq!(view.with_page(1).page, None);
        assert_eq!(view.with_page(4).page, Some(4));
    }

    #[test]
    fn reset_layout_keeps_filter() {
        let view = TableView {
            sort: Some("price".into()),
            q: Some("chuck".into()),
            hide: vec!["hq".into()],
            ..Default::default()
        };
        let reset = view.reset_layout();
        assert_eq!(reset.q.as_deref(), Some("chuck"));
        assert!(reset.sort.is_none() && reset.hide.is_empty());
    }
}
