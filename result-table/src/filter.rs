use sublime_fuzzy::{FuzzySearch, Scoring};

use crate::{ColumnDef, TableRow};

fn fuzzy_matches(term: &str, target: &str, scoring: &Scoring) -> bool {
    FuzzySearch::new(term, target)
        .case_insensitive()
        .score_with(scoring)
        .best_match()
        .is_some()
}

/// The filter text with surrounding whitespace removed, `None` when nothing is left
pub(crate) fn filter_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

/// The whole query has to be a fuzzy subsequence of a single searchable column, so
/// `"tinc str"` finds "Grade 8 Tincture of Strength" but `"strength tinc"` does not.
pub(crate) fn row_matches<T: TableRow>(
    row: &T,
    query: Option<&str>,
    columns: &[&'static ColumnDef],
    scoring: &Scoring,
) -> bool {
    let Some(query) = query else {
        return true;
    };
    columns
        .iter()
        .filter_map(|column| row.cell(column.key))
        .filter(|cell| !cell.is_empty())
        .any(|cell| fuzzy_matches(query, &cell.raw_text(), scoring))
}

pub(crate) fn filter_rows<'a, T: TableRow>(rows: &'a [T], query: Option<&str>) -> Vec<&'a T> {
    let query = filter_query(query);
    let columns = T::search_columns();
    let scoring = Scoring::default();
    rows.iter()
        .filter(|row| row_matches(*row, query, &columns, &scoring))
        .collect()
}
