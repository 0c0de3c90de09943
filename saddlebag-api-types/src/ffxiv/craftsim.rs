use result_table::TableRow;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::form::{CommaList, HomeDefaults, SearchForm, ValidationErrors};
use crate::form_choice;

form_choice! {
    /// How ingredient costs are estimated
    pub enum CostMetric {
        #[default]
        MaterialMedian => ("material_median_cost", "Median material price"),
        MaterialAverage => ("material_avg_cost", "Average material price"),
        MaterialMinListing => ("material_min_listing_cost", "Cheapest material listing"),
    }
}

form_choice! {
    /// How the crafted item's sale price is estimated
    pub enum RevenueMetric {
        #[default]
        HomeMinListing => ("revenue_home_min_listing", "Cheapest listing on home world"),
        RegionMinListing => ("revenue_region_min_listing", "Cheapest listing in region"),
        Average => ("revenue_avg", "Average sale price"),
        Median => ("revenue_median", "Median sale price"),
    }
}

/// Filter value meaning "no restriction" for stars, level and yield
pub const ANY: i32 = -1;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftsimForm {
    pub home_server: String,
    pub cost_metric: CostMetric,
    pub revenue_metric: RevenueMetric,
    pub sales_per_week: u32,
    pub median_sale_price: u64,
    pub max_material_cost: u64,
    /// Crafting job ids, `0` is every job
    #[serde_as(as = "CommaList")]
    pub jobs: Vec<i32>,
    #[serde_as(as = "CommaList")]
    pub filters: Vec<i32>,
    pub stars: i32,
    pub lvl: i32,
    pub yields: i32,
    pub hide_expert_recipes: bool,
}

impl Default for CraftsimForm {
    fn default() -> Self {
        Self {
            home_server: String::new(),
            cost_metric: CostMetric::default(),
            revenue_metric: RevenueMetric::default(),
            sales_per_week: 400,
            median_sale_price: 50_000,
            max_material_cost: 1_000_000,
            jobs: vec![0],
            filters: vec![0],
            stars: ANY,
            lvl: ANY,
            yields: ANY,
            hide_expert_recipes: true,
        }
    }
}

fn any_or_within(value: i32, min: i32, max: i32) -> bool {
    value == ANY || (min..=max).contains(&value)
}

impl SearchForm for CraftsimForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            !self.home_server.trim().is_empty(),
            "home_server",
            "Pick a home world",
        );
        errors.check(
            self.max_material_cost > 0,
            "max_material_cost",
            "Material cost limit must be above zero",
        );
        errors.check(!self.jobs.is_empty(), "jobs", "Choose at least one job");
        errors.check(
            !self.filters.is_empty(),
            "filters",
            "Choose at least one item category",
        );
        errors.check(
            any_or_within(self.stars, 0, 5),
            "stars",
            "Stars must be between 0 and 5, or -1 for any",
        );
        errors.check(
            any_or_within(self.lvl, 1, 100),
            "lvl",
            "Level must be between 1 and 100, or -1 for any",
        );
        errors.check(
            any_or_within(self.yields, 1, 99),
            "yields",
            "Yield must be between 1 and 99, or -1 for any",
        );
        errors.into_result()
    }

    fn apply_preferences(&mut self, home: &HomeDefaults) {
        if self.home_server.trim().is_empty() {
            self.home_server = home.ffxiv_world.clone();
        }
    }

    fn normalize(&mut self) {
        self.home_server = self.home_server.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraftsimRequest {
    pub home_server: String,
    pub cost_metric: CostMetric,
    pub revenue_metric: RevenueMetric,
    pub sales_per_week: u32,
    pub median_sale_price: u64,
    pub max_material_cost: u64,
    pub jobs: Vec<i32>,
    pub filters: Vec<i32>,
    pub stars: i32,
    pub lvl: i32,
    pub yields: i32,
    pub hide_expert_recipes: bool,
}

impl From<&CraftsimForm> for CraftsimRequest {
    fn from(form: &CraftsimForm) -> Self {
        Self {
            home_server: form.home_server.clone(),
            cost_metric: form.cost_metric,
            revenue_metric: form.revenue_metric,
            sales_per_week: form.sales_per_week,
            median_sale_price: form.median_sale_price,
            max_material_cost: form.max_material_cost,
            jobs: form.jobs.clone(),
            filters: form.filters.clone(),
            stars: form.stars,
            lvl: form.lvl,
            yields: form.yields,
            hide_expert_recipes: form.hide_expert_recipes,
        }
    }
}

/// One craftable item with the backend's profit estimate
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TableRow)]
#[serde(default, rename_all = "camelCase")]
pub struct CraftItem {
    #[serde(rename = "itemID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[table(header = "Item ID")]
    pub item_id: i32,
    #[table(header = "Item Name", search)]
    pub item_name: String,
    #[table(header = "Profit", format = "currency")]
    pub profit: f64,
    #[table(header = "Profit %", format = "percent")]
    pub profit_pct: f64,
    #[table(header = "Revenue", format = "currency")]
    pub revenue: f64,
    #[table(header = "Crafting Cost", format = "currency")]
    pub crafting_cost: f64,
    #[table(header = "Sold / Week", format = "integer")]
    pub sold_per_week: f64,
    #[table(header = "Yield")]
    pub yields_per_craft: i32,
    #[table(header = "Job", search)]
    pub job: String,
    #[table(header = "HQ")]
    pub hq: bool,
}

#[cfg(test)]
mod test {
    use result_table::{Cell, TableRow, TableView};

    use super::{CostMetric, CraftItem, CraftsimForm, CraftsimRequest};
    use crate::form::{parse_form, SearchForm};

    #[test]
    fn defaults_match_backend_expectations() {
        let form = CraftsimForm {
            home_server: "Balmung".into(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
        let json = serde_json::to_value(CraftsimRequest::from(&form)).unwrap();
        assert_eq!(json["cost_metric"], "material_median_cost");
        assert_eq!(json["revenue_metric"], "revenue_home_min_listing");
        assert_eq!(json["stars"], -1);
        assert_eq!(json["hide_expert_recipes"], true);
    }

    #[test]
    fn out_of_range_filters_are_rejected() {
        let form: CraftsimForm =
            parse_form("home_server=Balmung&stars=6&lvl=0&yields=-1&cost_metric=material_avg_cost")
                .unwrap();
        assert_eq!(form.cost_metric, CostMetric::MaterialAverage);
        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.0.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["stars", "lvl"]);
    }

    #[test]
    fn expert_recipes_can_be_shown() {
        let form: CraftsimForm = parse_form("hide_expert_recipes=false").unwrap();
        assert!(!form.hide_expert_recipes);
    }

    #[test]
    fn rows_sort_by_profit() {
        let rows: Vec<CraftItem> = serde_json::from_str(
            r#"[
                {"itemID": 1, "itemName": "Rroneek Chuck", "profit": 500, "job": "Culinarian"},
                {"itemID": "2", "itemName": "Tincture", "profit": 9000, "hq": true, "job": "Alchemist"}
            ]"#,
        )
        .unwrap();
        let view = TableView {
            sort: Some("profit".into()),
            desc: true,
            ..Default::default()
        };
        let sorted = view.rows(&rows);
        assert_eq!(sorted[0].item_name, "Tincture");
        assert_eq!(sorted[0].cell("hq"), Some(Cell::Bool(true)));
        let search: Vec<_> = CraftItem::search_columns().iter().map(|c| c.key).collect();
        assert_eq!(search, ["item_name", "job"]);
    }
}
