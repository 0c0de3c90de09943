use result_table::TableRow;
use serde::{Deserialize, Serialize};

use super::gold_at_least;
use crate::form::{HomeDefaults, SearchForm, ValidationErrors};
use crate::{form_choice, WowRegion};

form_choice! {
    pub enum ExportSort {
        #[default]
        MinPrice => ("minPrice", "Lowest Price"),
        Quantity => ("quantity", "Quantity"),
        Population => ("population", "Population"),
    }
}

form_choice! {
    /// Realm population buckets, `0` disables the filter
    pub enum Population {
        #[default]
        All => ("0", "All realms"),
        Low => ("1", "Low"),
        Medium => ("2", "Medium"),
        High => ("3", "High"),
        Full => ("4", "Full"),
    }
}

impl Population {
    /// Numeric bucket the backend filters on
    pub fn id(&self) -> i32 {
        match self {
            Population::All => 0,
            Population::Low => 1,
            Population::Medium => 2,
            Population::High => 3,
            Population::Full => 4,
        }
    }
}

/// Looks up which realms in a region sell an item cheapest, for cross realm trading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSearchForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<WowRegion>,
    pub item_id: i32,
    /// Ignore realms whose cheapest listing is below this, in gold
    pub min_price: f64,
    pub max_quantity: u32,
    pub population: Population,
    pub sort_by: ExportSort,
}

impl Default for ExportSearchForm {
    fn default() -> Self {
        Self {
            region: None,
            item_id: 0,
            min_price: 0.0,
            max_quantity: 1000,
            population: Population::All,
            sort_by: ExportSort::default(),
        }
    }
}

impl SearchForm for ExportSearchForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.region.is_some(), "region", "Pick a region");
        errors.check(self.item_id > 0, "item_id", "Enter the id of the item to look up");
        errors.check(
            gold_at_least(self.min_price, 0.0),
            "min_price",
            "Minimum price can't be negative",
        );
        errors.check(
            self.max_quantity > 0,
            "max_quantity",
            "Maximum quantity must be above zero",
        );
        errors.into_result()
    }

    fn apply_preferences(&mut self, home: &HomeDefaults) {
        self.region.get_or_insert(home.wow_region);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSearchRequest {
    pub region: WowRegion,
    #[serde(rename = "itemID")]
    pub item_id: i32,
    pub min_price: f64,
    pub max_quantity: u32,
    pub population_wow: i32,
    pub sort_by: ExportSort,
}

impl From<&ExportSearchForm> for ExportSearchRequest {
    fn from(form: &ExportSearchForm) -> Self {
        Self {
            region: form.region.unwrap_or_default(),
            item_id: form.item_id,
            min_price: form.min_price,
            max_quantity: form.max_quantity,
            population_wow: form.population.id(),
            sort_by: form.sort_by,
        }
    }
}

/// Cheapest listing of the searched item on one connected realm
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TableRow)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportRealm {
    #[table(header = "Realms", search)]
    pub realm_names: String,
    #[table(header = "Connected Realm ID")]
    pub connected_realm_id: i32,
    #[table(header = "Lowest Price", format = "currency")]
    pub min_price: f64,
    #[table(header = "Quantity", format = "integer")]
    pub quantity: i64,
    #[table(header = "Population")]
    pub realm_population_type: Option<String>,
    #[table(header = "Item Name", search)]
    pub item_name: Option<String>,
}
