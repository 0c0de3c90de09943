use std::io::Write;

use crate::{ColumnDef, TableError, TableRow};

/// Writes rows as CSV using the column headers as the header record. Values are left
/// unformatted so spreadsheets can treat them as numbers.
pub fn write_csv<T, W>(rows: &[&T], columns: &[&ColumnDef], writer: W) -> Result<(), TableError>
where
    T: TableRow,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns.iter().map(|column| column.header))?;
    for row in rows {
        csv_writer.write_record(columns.iter().map(|column| {
            row.cell(column.key)
                .map(|cell| cell.raw_text())
                .unwrap_or_default()
        }))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::write_csv;
    use crate::test_rows::{sample, Listing};
    use crate::TableView;

    #[test]
    fn exports_visible_columns_of_all_matching_rows() {
        let rows = sample();
        let view = TableView {
            sort: Some("quantity".into()),
            hide: vec!["hq".into(), "world".into()],
            ..Default::default()
        };
        let mut out = Vec::new();
        write_csv(&view.rows(&rows), &view.columns::<Listing>(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Item,Price,Quantity");
        assert_eq!(lines[1], "Cunning Craftsman's Draught,4500,3");
        assert_eq!(lines[3], "Rroneek Serloin,,40");
        assert_eq!(lines[5], "Dark Matter,15,999");
        assert_eq!(lines.len(), 6);
    }
}
