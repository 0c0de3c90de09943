use result_table::TableRow;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use super::shortage::ALL;
use super::{check_realm, fill_realm, gold_at_least};
use crate::form::{HomeDefaults, SearchForm, ValidationErrors};
use crate::{form_choice, MarketState, WowRegion};

form_choice! {
    pub enum WowMarketshareSort {
        #[default]
        CurrentMarketValue => ("currentMarketValue", "Current Market Value"),
        HistoricMarketValue => ("historicMarketValue", "Historic Market Value"),
        PercentChange => ("percentChange", "Percent Change"),
        SalesPerDay => ("salesPerDay", "Sales per Day"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketshareForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<WowRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<i32>,
    /// Region wide commodities instead of realm auctions
    pub commodity: bool,
    pub desired_avg_price: f64,
    pub desired_sales_per_day: f64,
    pub item_class: i32,
    pub item_subclass: i32,
    pub sort_by: WowMarketshareSort,
}

impl Default for MarketshareForm {
    fn default() -> Self {
        Self {
            region: None,
            realm: None,
            commodity: false,
            desired_avg_price: 1000.0,
            desired_sales_per_day: 1.0,
            item_class: ALL,
            item_subclass: ALL,
            sort_by: WowMarketshareSort::default(),
        }
    }
}

impl SearchForm for MarketshareForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_realm(&mut errors, self.region, self.realm);
        errors.check(
            gold_at_least(self.desired_avg_price, 0.0),
            "desired_avg_price",
            "Average price can't be negative",
        );
        errors.check(
            gold_at_least(self.desired_sales_per_day, 0.0),
            "desired_sales_per_day",
            "Sales per day can't be negative",
        );
        errors.check(
            self.item_subclass == ALL || self.item_class != ALL,
            "item_subclass",
            "Pick an item class before a subclass",
        );
        errors.into_result()
    }

    fn apply_preferences(&mut self, home: &HomeDefaults) {
        fill_realm(&mut self.region, &mut self.realm, home);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketshareRequest {
    pub region: WowRegion,
    pub home_realm_id: i32,
    pub commodity: bool,
    pub desired_avg_price: f64,
    pub desired_sales_per_day: f64,
    pub item_class: i32,
    #[serde(rename = "itemSubClass")]
    pub item_subclass: i32,
    pub sort_by: WowMarketshareSort,
}

impl From<&MarketshareForm> for MarketshareRequest {
    fn from(form: &MarketshareForm) -> Self {
        Self {
            region: form.region.unwrap_or_default(),
            home_realm_id: form.realm.unwrap_or_default(),
            commodity: form.commodity,
            desired_avg_price: form.desired_avg_price,
            desired_sales_per_day: form.desired_sales_per_day,
            item_class: form.item_class,
            item_subclass: form.item_subclass,
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
    #[serde(rename = "itemName")]
    #[table(header = "Item Name", search)]
    pub item_name: String,
    #[table(header = "Current Market Value", format = "currency")]
    pub current_market_value: f64,
    #[table(header = "Historic Market Value", format = "currency")]
    pub historic_market_value: f64,
    #[table(header = "% Change", format = "percent")]
    pub percent_change: f64,
    #[table(header = "Market State")]
    pub state: MarketState,
    #[table(header = "Current Price", format = "currency")]
    pub current_price: f64,
    #[table(header = "Historic Price", format = "currency")]
    pub historic_price: f64,
    #[table(header = "Sales / Day", format = "decimal")]
    pub sales_per_day: f64,
    #[table(header = "Listed", format = "integer")]
    pub current_quantity: i64,
}

#[cfg(test)]
mod test {
    use result_table::{TableRow, TableView};

    use super::{MarketshareForm, MarketshareItem, MarketshareRequest, WowMarketshareSort};
    use crate::form::{parse_form, to_query_string, SearchForm};
    use crate::{MarketState, WowRegion};

    #[test]
    fn commodity_search_round_trips() {
        let form = MarketshareForm {
            region: Some(WowRegion::Europe),
            realm: Some(1403),
            commodity: true,
            sort_by: WowMarketshareSort::PercentChange,
            ..Default::default()
        };
        assert!(form.validate().is_ok());
        let encoded = to_query_string(&form).unwrap();
        assert_eq!(parse_form::<MarketshareForm>(&encoded).unwrap(), form);
        let json = serde_json::to_value(MarketshareRequest::from(&form)).unwrap();
        assert_eq!(json["sortBy"], "percentChange");
        assert_eq!(json["homeRealmId"], 1403);
        assert_eq!(json["commodity"], true);
    }

    #[test]
    fn missing_realm_is_reported() {
        let form: MarketshareForm = parse_form("region=NA&desired_avg_price=-5").unwrap();
        let fields: Vec<_> = form.validate().unwrap_err().0.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["realm", "desired_avg_price"]);
    }

    #[test]
    fn rows_filter_by_item_name() {
        let rows: Vec<MarketshareItem> = serde_json::from_str(
            r#"[
                {"itemID": 1, "itemName": "Awakened Order", "currentMarketValue": 90000, "state": "spiking"},
                {"itemID": 2, "itemName": "Draconic Vial", "currentMarketValue": 1500, "state": "out of stock"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows[1].state, MarketState::OutOfStock);
        let view = TableView {
            q: Some("drvial".into()),
            ..Default::default()
        };
        let page = view.apply(&rows);
        assert_eq!(page.matched, 1);
        assert_eq!(page.rows[0].item_id, 2);
        assert_eq!(MarketshareItem::COLUMNS.len(), 10);
    }
}
