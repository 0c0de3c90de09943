use itertools::Itertools;
use maud::{html, Markup, Render};
use result_table::{Cell, CellFormat, ColumnDef, ColumnKind, TableRow, TableView};

use super::currency::Currency;
use super::paginate::Paginate;

/// Link to `action` carrying the search form, the table state and an optional extra pair
pub(crate) fn table_href(
    action: &str,
    form_query: &str,
    view: &TableView,
    extra: Option<&str>,
) -> String {
    let view_query = view.to_query_string().unwrap_or_default();
    let query = [form_query, view_query.as_str(), extra.unwrap_or_default()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .join("&");
    if query.is_empty() {
        action.to_string()
    } else {
        format!("{action}?{query}")
    }
}

fn sort_marker(sorted: Option<bool>) -> &'static str {
    match sorted {
        Some(true) => " ▼",
        Some(false) => " ▲",
        None => "",
    }
}

fn column_class(column: &ColumnDef) -> &'static str {
    match column.kind {
        ColumnKind::Number => "num",
        ColumnKind::Flag => "flag",
        ColumnKind::Text => "text",
    }
}

/// Sortable, filterable and paginated table of search results. Every control is a plain
/// link or GET form, so the current layout is always in the address bar.
pub(crate) struct ResultTable<'a, T: TableRow> {
    pub(crate) rows: &'a [T],
    pub(crate) view: &'a TableView,
    /// The submitted search, encoded as a query string
    pub(crate) form_query: &'a str,
    pub(crate) action: &'a str,
    pub(crate) currency: Currency,
}

impl<T: TableRow> ResultTable<'_, T> {
    fn href(&self, view: &TableView) -> String {
        table_href(self.action, self.form_query, view, None)
    }

    /// Everything but the filter text, so filtering keeps the search and the layout
    fn filter_inputs(&self) -> Vec<(String, String)> {
        let view = TableView {
            q: None,
            page: None,
            ..self.view.clone()
        };
        let view_query = view.to_query_string().unwrap_or_default();
        url::form_urlencoded::parse(self.form_query.as_bytes())
            .chain(url::form_urlencoded::parse(view_query.as_bytes()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    fn draw_cell(&self, row: &T, column: &ColumnDef) -> Markup {
        let cell = row.cell(column.key).unwrap_or(Cell::Empty);
        match column.format {
            CellFormat::Currency => self.currency.amount(&cell),
            CellFormat::Percent => {
                let negative = matches!(cell, Cell::Float(f) if f < 0.0)
                    || matches!(cell, Cell::Int(i) if i < 0);
                html! {
                    span class={ "percent" @if negative { " negative" } } { (cell.display(column.format)) }
                }
            }
            format => html! { (cell.display(format)) },
        }
    }
}

impl<T: TableRow> Render for ResultTable<'_, T> {
    fn render(&self) -> Markup {
        let page = self.view.apply(self.rows);
        let hidden = self.view.hidden_columns::<T>();
        let csv_href = table_href(self.action, self.form_query, self.view, Some("format=csv"));
        html! {
          div class="result-table" {
            div class="table-toolbar flex-row" {
              form method="get" action=(self.action) class="table-filter" {
                @for (key, value) in self.filter_inputs() {
                  input type="hidden" name=(key) value=(value);
                }
                input type="search" name="q" value=(self.view.q.as_deref().unwrap_or_default()) placeholder="Filter results";
                button type="submit" class="btn" { "Filter" }
              }
              a class="btn" href=(csv_href) { "Download CSV" }
              a class="btn" href=(self.href(&self.view.reset_layout())) { "Reset layout" }
            }
            p class="table-summary" {
              "Showing " (page.first_row()) "-" (page.last_row()) " of " (page.matched)
              @if page.matched != page.total {
                " (filtered from " (page.total) ")"
              }
            }
            table {
              thead {
                tr {
                  @for column in &page.columns {
                    th class=(column_class(column)) {
                      a href=(self.href(&self.view.toggle_sort(column.key, column.kind))) {
                        (column.header) (sort_marker(self.view.sorted_by(column.key)))
                      }
                      span class="column-controls" {
                        a href=(self.href(&self.view.move_column::<T>(column.key, -1))) title="Move left" { "←" }
                        a href=(self.href(&self.view.move_column::<T>(column.key, 1))) title="Move right" { "→" }
                        a href=(self.href(&self.view.toggle_hidden(column.key))) title="Hide column" { "×" }
                      }
                    }
                  }
                }
              }
              tbody {
                @for row in &page.rows {
                  tr {
                    @for column in &page.columns {
                      td class=(column_class(column)) { (self.draw_cell(row, column)) }
                    }
                  }
                }
              }
            }
            @if page.rows.is_empty() {
              div class="card" { "No rows match the filter." }
            }
            @if !hidden.is_empty() {
              div class="hidden-columns flex-row" {
                span { "Hidden columns:" }
                @for column in &hidden {
                  a class="btn" href=(self.href(&self.view.toggle_hidden(column.key))) { "+ " (column.header) }
                }
              }
            }
            (Paginate {
              pages: page.page_window(2),
              current_page: page.page,
              href: |number: usize| self.href(&self.view.with_page(number)),
            })
          }
        }
    }
}
