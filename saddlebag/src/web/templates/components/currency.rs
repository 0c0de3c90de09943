use maud::{html, Markup};
use result_table::{Cell, CellFormat};

/// Which in-game currency a result table prices things in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Currency {
    Gil,
    Gold,
}

impl Currency {
    pub(crate) fn class(&self) -> &'static str {
        match self {
            Currency::Gil => "gil",
            Currency::Gold => "gold",
        }
    }

    /// A comma separated amount. The currency suffix comes from css.
    pub(crate) fn amount(&self, cell: &Cell) -> Markup {
        if cell.is_empty() {
            return html! { "-" };
        }
        html! {
            span class=(self.class()) {
                (cell.display(CellFormat::Currency))
            }
        }
    }
}
