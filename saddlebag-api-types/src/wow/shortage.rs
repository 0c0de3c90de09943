use result_table::TableRow;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use super::{check_realm, fill_realm, gold_at_least};
use crate::form::{HomeDefaults, SearchForm, ValidationErrors};
use crate::WowRegion;

/// Class, subclass and quality filter meaning "everything"
pub const ALL: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortageForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<WowRegion>,
    /// Connected realm id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<i32>,
    /// Minimum average price in gold
    pub desired_avg_price: f64,
    pub desired_sales_per_day: f64,
    /// Minimum price increase in percent
    pub desired_price_increase: f64,
    /// Upper bound on the backend's flip risk score
    pub flip_risk_limit: f64,
    pub item_quality: i32,
    pub item_class: i32,
    pub item_subclass: i32,
}

impl Default for ShortageForm {
    fn default() -> Self {
        Self {
            region: None,
            realm: None,
            desired_avg_price: 40.0,
            desired_sales_per_day: 200.0,
            desired_price_increase: 40.0,
            flip_risk_limit: 15.0,
            item_quality: ALL,
            item_class: ALL,
            item_subclass: ALL,
        }
    }
}

impl SearchForm for ShortageForm {
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
            gold_at_least(self.desired_price_increase, 0.0),
            "desired_price_increase",
            "Price increase can't be negative",
        );
        errors.check(
            self.flip_risk_limit.is_finite() && self.flip_risk_limit > 0.0,
            "flip_risk_limit",
            "Flip risk limit must be above zero",
        );
        errors.check(
            (ALL..=7).contains(&self.item_quality),
            "item_quality",
            "Unknown item quality",
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
pub struct ShortageRequest {
    pub region: WowRegion,
    pub home_realm_id: i32,
    pub desired_avg_price: f64,
    pub desired_sales_per_day: f64,
    pub desired_price_increase: f64,
    pub flip_risk_limit: f64,
    pub item_quality: i32,
    pub item_class: i32,
    #[serde(rename = "itemSubClass")]
    pub item_subclass: i32,
}

impl From<&ShortageForm> for ShortageRequest {
    fn from(form: &ShortageForm) -> Self {
        Self {
            region: form.region.unwrap_or_default(),
            home_realm_id: form.realm.unwrap_or_default(),
            desired_avg_price: form.desired_avg_price,
            desired_sales_per_day: form.desired_sales_per_day,
            desired_price_increase: form.desired_price_increase,
            flip_risk_limit: form.flip_risk_limit,
            item_quality: form.item_quality,
            item_class: form.item_class,
            item_subclass: form.item_subclass,
        }
    }
}

/// An item the backend expects to run short on the chosen realm
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TableRow)]
#[serde(default, rename_all = "camelCase")]
pub struct ShortageItem {
    #[serde(rename = "itemID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[table(header = "Item ID")]
    pub item_id: i32,
    #[table(header = "Item Name", search)]
    pub name: String,
    #[table(header = "Current Price", format = "currency")]
    pub current_price: f64,
    #[table(header = "Average Price", format = "currency")]
    pub avg_price: f64,
    #[table(header = "Suggested Price", format = "currency")]
    pub suggested_price: f64,
    #[table(header = "Price Increase", format = "percent")]
    pub price_increase: f64,
    #[table(header = "Sales / Day", format = "decimal")]
    pub sales_per_day: f64,
    #[table(header = "Listed", format = "integer")]
    pub quantity: i64,
    #[table(header = "Flip Risk", format = "decimal")]
    pub flip_risk: f64,
    #[table(header = "Item Class", search)]
    pub item_class_name: Option<String>,
}

#[cfg(test)]
mod test {
    use result_table::{Cell, TableRow};

    use super::{ShortageForm, ShortageItem, ShortageRequest};
    use crate::form::{parse_form, SearchForm};
    use crate::{HomeDefaults, WowRegion};

    #[test]
    fn preferences_fill_region_and_realm() {
        let mut form: ShortageForm = parse_form("desired_avg_price=100").unwrap();
        form.apply_preferences(&HomeDefaults {
            ffxiv_world: "Balmung".into(),
            ffxiv_region: Default::default(),
            wow_region: WowRegion::NorthAmerica,
            wow_realm_id: 3678,
            wow_realm_name: "Thrall".into(),
        });
        assert!(form.validate().is_ok());
        let json = serde_json::to_value(ShortageRequest::from(&form)).unwrap();
        assert_eq!(json["homeRealmId"], 3678);
        assert_eq!(json["region"], "NA");
        assert_eq!(json["desiredAvgPrice"], 100.0);
        assert_eq!(json["itemSubClass"], -1);
    }

    #[test]
    fn subclass_needs_class() {
        let form: ShortageForm =
            parse_form("region=EU&realm=1403&item_subclass=3&flip_risk_limit=0").unwrap();
        let fields: Vec<_> = form.validate().unwrap_err().0.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["flip_risk_limit", "item_subclass"]);
    }

    #[test]
    fn rows_decode_backend_names() {
        let rows: Vec<ShortageItem> = serde_json::from_str(
            r#"[{"itemID": "190320", "name": "Draconium Ore", "avgPrice": 52.1, "salesPerDay": 310.4, "priceIncrease": 61.0}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].item_id, 190320);
        assert_eq!(rows[0].cell("sales_per_day"), Some(Cell::Float(310.4)));
        assert_eq!(rows[0].cell("item_class_name"), Some(Cell::Empty));
    }
}
