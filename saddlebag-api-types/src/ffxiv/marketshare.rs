use result_table::TableRow;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::form::{CommaList, HomeDefaults, SearchForm, ValidationErrors};
use crate::{form_choice, MarketState};

/// Longest window the backend keeps sale history for, 90 days
pub const MAX_TIME_PERIOD_HOURS: u32 = 2160;

form_choice! {
    pub enum MarketshareSort {
        #[default]
        MarketValue => ("marketValue", "Market Value"),
        PercentChange => ("percentChange", "Percent Change"),
        QuantitySold => ("quantitySold", "Quantity Sold"),
        Average => ("avg", "Average Price"),
        Median => ("median", "Median Price"),
        PurchaseAmount => ("purchaseAmount", "Purchase Amount"),
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketshareForm {
    /// Home world, left blank to use the saved preference
    pub server: String,
    pub time_period: u32,
    /// Minimum number of sales within the time period
    pub sales_amount: u32,
    pub average_price: u64,
    /// Item category filters, `0` is every marketable item
    #[serde_as(as = "CommaList")]
    pub filters: Vec<i32>,
    pub sort_by: MarketshareSort,
}

impl Default for MarketshareForm {
    fn default() -> Self {
        Self {
            server: String::new(),
            time_period: 168,
            sales_amount: 3,
            average_price: 10_000,
            filters: vec![0],
            sort_by: MarketshareSort::MarketValue,
        }
    }
}

impl SearchForm for MarketshareForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(!self.server.trim().is_empty(), "server", "Pick a home world");
        errors.check(
            (1..=MAX_TIME_PERIOD_HOURS).contains(&self.time_period),
            "time_period",
            format!("Time period must be between 1 and {MAX_TIME_PERIOD_HOURS} hours"),
        );
        errors.check(
            !self.filters.is_empty(),
            "filters",
            "Choose at least one item category",
        );
        errors.into_result()
    }

    fn apply_preferences(&mut self, home: &HomeDefaults) {
        if self.server.trim().is_empty() {
            self.server = home.ffxiv_world.clone();
        }
    }

    fn normalize(&mut self) {
        self.server = self.server.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketshareRequest {
    pub server: String,
    pub time_period: u32,
    pub sales_amount: u32,
    pub average_price: u64,
    pub filters: Vec<i32>,
    pub sort_by: MarketshareSort,
}

impl From<&MarketshareForm> for MarketshareRequest {
    fn from(form: &MarketshareForm) -> Self {
        Self {
            server: form.server.clone(),
            time_period: form.time_period,
            sales_amount: form.sales_amount,
            average_price: form.average_price,
            filters: form.filters.clone(),
            sort_by: form.sort_by,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TableRow)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketshareItem {
    #[serde(rename = "itemID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[table(header = "Item ID")]
    pub item_id: i32,
    #[table(header = "Item Name", search)]
    pub name: String,
    #[table(header = "Market Value", format = "currency")]
    pub market_value: f64,
    #[table(header = "% Change", format = "percent")]
    pub percent_change: f64,
    #[table(header = "Market State")]
    pub state: MarketState,
    #[table(header = "Average Price", format = "currency")]
    pub avg: f64,
    #[table(header = "Median Price", format = "currency")]
    pub median: f64,
    #[table(header = "Min Price", format = "currency")]
    pub min_price: f64,
    #[table(header = "Quantity Sold", format = "integer")]
    pub quantity_sold: f64,
    #[table(header = "Purchase Amount", format = "integer")]
    pub purchase_amount: f64,
    #[serde(rename = "npc_vendor_info")]
    #[table(header = "NPC Vendor")]
    pub npc_vendor_info: Option<String>,
    #[table(skip)]
    pub url: Option<String>,
}
