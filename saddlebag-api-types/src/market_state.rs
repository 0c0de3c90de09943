use result_table::{Cell, ColumnKind, ToCell};
use serde::{Deserialize, Serialize};

/// Trend label the backend attaches to marketshare rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketState {
    Crashing,
    Decreasing,
    Stable,
    Increasing,
    Spiking,
    #[serde(rename = "out of stock")]
    OutOfStock,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MarketState {
    pub fn label(&self) -> &'static str {
        match self {
            MarketState::Crashing => "Crashing",
            MarketState::Decreasing => "Decreasing",
            MarketState::Stable => "Stable",
            MarketState::Increasing => "Increasing",
            MarketState::Spiking => "Spiking",
            MarketState::OutOfStock => "Out of Stock",
            MarketState::Unknown => "Unknown",
        }
    }
}

impl ToCell for MarketState {
    const KIND: ColumnKind = ColumnKind::Text;

    fn to_cell(&self) -> Cell {
        Cell::Text(self.label().to_string())
    }
}
