//! Column metadata, sorting, fuzzy filtering and pagination for the large result tables
//! the dashboard renders. Rows describe themselves with `#[derive(TableRow)]`, the
//! per-request table state lives in [`TableView`] so that it can round trip through a
//! shareable URL.

extern crate self as result_table;

mod cell;
mod export;
mod filter;
mod page;
mod view;

pub use cell::{Cell, CellFormat, ColumnKind, ToCell};
pub use export::write_csv;
pub use page::TablePage;
pub use result_table_macros::TableRow;
pub use view::TableView;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to encode table state {0}")]
    Query(#[from] serde_qs::Error),
}

/// Static description of a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Stable identifier used in URLs (`sort=market_value`)
    pub key: &'static str,
    pub header: &'static str,
    pub kind: ColumnKind,
    pub format: CellFormat,
    /// Whether the fuzzy filter looks at this column
    pub searchable: bool,
}

pub trait TableRow {
    const COLUMNS: &'static [ColumnDef];

    fn cell(&self, key: &str) -> Option<Cell>;

    fn column(key: &str) -> Option<&'static ColumnDef> {
        Self::COLUMNS.iter().find(|column| column.key == key)
    }

    /// Columns consulted by the fuzzy filter. Falls back to every text column when
    /// nothing was explicitly marked searchable.
    fn search_columns() -> Vec<&'static ColumnDef> {
        let marked: Vec<_> = Self::COLUMNS.iter().filter(|c| c.searchable).collect();
        if marked.is_empty() {
            Self::COLUMNS
                .iter()
                .filter(|c| c.kind == ColumnKind::Text)
                .collect()
        } else {
            marked
        }
    }
}


#[cfg(test)]
mod test {
    use super::test_rows::Listing;
    use super::{Cell, CellFormat, ColumnKind, TableRow};

    #[test]
    fn derive_builds_columns_in_declaration_order() {
        let keys: Vec<_> = Listing::COLUMNS.iter().map(|c| c.key).collect();
        assert_eq!(keys, ["name", "price", "quantity", "world", "hq"]);
        let price = Listing::column("price").unwrap();
        assert_eq!(price.header, "Price");
        assert_eq!(price.kind, ColumnKind::Number);
        assert_eq!(price.format, CellFormat::Currency);
        assert_eq!(Listing::column("hq").unwrap().kind, ColumnKind::Flag);
        assert!(Listing::column("url").is_none());
    }

    #[test]
    fn derive_exposes_cells() {
        let row = super::test_rows::listing("Dark Matter", 15.0, 999, None);
        assert_eq!(row.cell("name"), Some(Cell::Text("Dark Matter".into())));
        assert_eq!(row.cell("quantity"), Some(Cell::Int(999)));
        assert_eq!(row.cell("world"), Some(Cell::Empty));
        assert_eq!(row.cell("url"), None);
    }

    #[test]
    fn marked_columns_limit_search() {
        let keys: Vec<_> = Listing::search_columns().iter().map(|c| c.key).collect();
        assert_eq!(keys, ["name"]);
    }
}
