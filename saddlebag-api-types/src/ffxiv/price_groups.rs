use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Utc};
use result_table::TableRow;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::form::{CommaList, HomeDefaults, SearchForm, ValidationErrors};
use crate::{form_choice, FfxivRegion};

pub const MAX_PRICE_GROUPS: usize = 10;
pub const MAX_RANGE_DAYS: i64 = 365;

form_choice! {
    pub enum PriceSetting {
        #[default]
        Average => ("average", "Average price"),
        Median => ("median", "Median price"),
    }
}

form_choice! {
    pub enum QuantitySetting {
        #[default]
        Quantity => ("quantity", "Units sold"),
        Sales => ("sales", "Number of sales"),
    }
}

/// Items and categories whose prices are tracked together
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceGroup {
    pub name: String,
    #[serde_as(as = "CommaList")]
    pub item_ids: Vec<i32>,
    #[serde_as(as = "CommaList")]
    pub categories: Vec<i32>,
}

impl PriceGroup {
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.item_ids.is_empty() && self.categories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceGroupForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<FfxivRegion>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_setting: PriceSetting,
    pub quantity_setting: QuantitySetting,
    pub hq_only: bool,
    pub groups: Vec<PriceGroup>,
}

impl Default for PriceGroupForm {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self {
            region: None,
            start_date: today - Duration::weeks(4),
            end_date: today,
            price_setting: PriceSetting::default(),
            quantity_setting: QuantitySetting::default(),
            hq_only: false,
            groups: Vec::new(),
        }
    }
}

impl SearchForm for PriceGroupForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.start_date < self.end_date,
            "start_date",
            "Start date must be before the end date",
        );
        errors.check(
            (self.end_date - self.start_date).num_days() <= MAX_RANGE_DAYS,
            "end_date",
            format!("Date range can be at most {MAX_RANGE_DAYS} days"),
        );
        errors.check(
            !self.groups.is_empty(),
            "groups",
            "Add at least one price group",
        );
        errors.check(
            self.groups.len() <= MAX_PRICE_GROUPS,
            "groups",
            format!("At most {MAX_PRICE_GROUPS} price groups can be compared"),
        );
        let mut seen = HashSet::new();
        for (index, group) in self.groups.iter().enumerate() {
            let label = if group.name.is_empty() {
                format!("Group {}", index + 1)
            } else {
                group.name.clone()
            };
            errors.check(
                !group.name.is_empty(),
                "groups",
                format!("{label} needs a name"),
            );
            errors.check(
                group.name.is_empty() || seen.insert(group.name.to_lowercase()),
                "groups",
                format!("{label} is used more than once"),
            );
            errors.check(
                !group.item_ids.is_empty() || !group.categories.is_empty(),
                "groups",
                format!("{label} needs at least one item id or category"),
            );
        }
        errors.into_result()
    }

    fn apply_preferences(&mut self, home: &HomeDefaults) {
        self.region.get_or_insert(home.ffxiv_region);
    }

    fn normalize(&mut self) {
        self.groups.retain(|group| !group.is_blank());
        for group in &mut self.groups {
            group.name = group.name.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceGroupRequest {
    pub region: &'static str,
    pub start_year: i32,
    pub start_month: u32,
    pub start_day: u32,
    pub end_year: i32,
    pub end_month: u32,
    pub end_day: u32,
    pub price_setting: PriceSetting,
    pub quantity_setting: QuantitySetting,
    pub hq_only: bool,
    pub price_groups: Vec<PriceGroupBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceGroupBody {
    pub name: String,
    pub item_ids: Vec<i32>,
    pub categories: Vec<i32>,
}

impl From<&PriceGroupForm> for PriceGroupRequest {
    fn from(form: &PriceGroupForm) -> Self {
        Self {
            region: form.region.unwrap_or_default().api_name(),
            start_year: form.start_date.year(),
            start_month: form.start_date.month(),
            start_day: form.start_date.day(),
            end_year: form.end_date.year(),
            end_month: form.end_date.month(),
            end_day: form.end_date.day(),
            price_setting: form.price_setting,
            quantity_setting: form.quantity_setting,
            hq_only: form.hq_only,
            price_groups: form
                .groups
                .iter()
                .map(|group| PriceGroupBody {
                    name: group.name.clone(),
                    item_ids: group.item_ids.clone(),
                    categories: group.categories.clone(),
                })
                .collect(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDelta {
    #[serde(rename = "itemID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub item_id: i32,
    #[serde(rename = "itemName")]
    pub item_name: String,
    /// Percent change keyed by week start date
    pub deltas: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDelta {
    pub deltas: BTreeMap<String, f64>,
    pub item_data: BTreeMap<String, ItemDelta>,
}

/// Backend reply: one entry per price group name
pub type PriceGroupDeltas = BTreeMap<String, GroupDelta>;

#[derive(Debug, Clone, PartialEq, TableRow)]
pub struct PriceGroupItemRow {
    #[table(header = "Group", search)]
    pub group: String,
    #[table(header = "Item ID")]
    pub item_id: i32,
    #[table(header = "Item Name", search)]
    pub item_name: String,
    #[table(header = "Latest Change", format = "percent")]
    pub latest_delta: Option<f64>,
    #[table(header = "Average Change", format = "percent")]
    pub average_delta: Option<f64>,
    #[table(header = "Largest Drop", format = "percent")]
    pub largest_drop: Option<f64>,
    #[table(header = "Largest Rise", format = "percent")]
    pub largest_rise: Option<f64>,
    #[table(header = "Weeks")]
    pub weeks: usize,
}

impl PriceGroupItemRow {
    fn new(group: &str, item: &ItemDelta) -> Self {
        let values: Vec<f64> = item.deltas.values().copied().collect();
        let average = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);
        Self {
            group: group.to_string(),
            item_id: item.item_id,
            item_name: item.item_name.clone(),
            latest_delta: item.deltas.values().next_back().copied(),
            average_delta: average,
            largest_drop: values.iter().copied().reduce(f64::min),
            largest_rise: values.iter().copied().reduce(f64::max),
            weeks: values.len(),
        }
    }
}

/// Flattens every group's per-item data into table rows
pub fn item_rows(deltas: &PriceGroupDeltas) -> Vec<PriceGroupItemRow> {
    deltas
        .iter()
        .flat_map(|(group, delta)| {
            delta
                .item_data
                .values()
                .map(move |item| PriceGroupItemRow::new(group, item))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeries {
    pub name: String,
    /// One value per entry of [`WeeklySummary::dates`], `None` when the group had no data
    pub values: Vec<Option<f64>>,
}

/// Week by week comparison of the group level deltas
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub dates: Vec<String>,
    pub groups: Vec<GroupSeries>,
}

impl WeeklySummary {
    pub fn new(deltas: &PriceGroupDeltas) -> Self {
        let dates: Vec<String> = deltas
            .values()
            .flat_map(|group| group.deltas.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let groups = deltas
            .iter()
            .map(|(name, group)| GroupSeries {
                name: name.clone(),
                values: dates
                    .iter()
                    .map(|date| group.deltas.get(date).copied())
                    .collect(),
            })
            .collect();
        Self { dates, groups }
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::{
        item_rows, PriceGroup, PriceGroupDeltas, PriceGroupForm, PriceGroupRequest, WeeklySummary,
    };
    use crate::form::{parse_form, to_query_string, SearchForm};
    use crate::FfxivRegion;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form() -> PriceGroupForm {
        PriceGroupForm {
            region: Some(FfxivRegion::Europe),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 3, 1),
            groups: vec![
                PriceGroup {
                    name: "Potions".into(),
                    item_ids: vec![36109, 36110],
                    categories: vec![],
                },
                PriceGroup {
                    name: "Food".into(),
                    item_ids: vec![],
                    categories: vec![46],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn nested_groups_round_trip_through_the_url() {
        let form = form();
        let encoded = to_query_string(&form).unwrap();
        assert!(encoded.contains("groups"));
        assert_eq!(parse_form::<PriceGroupForm>(&encoded).unwrap(), form);
    }

    #[test]
    fn blank_groups_are_dropped() {
        let parsed: PriceGroupForm = parse_form(
            "start_date=2024-01-01&end_date=2024-02-01\
             &groups[0][name]=Potions&groups[0][item_ids]=1,2\
             &groups[1][name]=&groups[1][item_ids]=&groups[1][categories]=",
        )
        .unwrap();
        assert_eq!(parsed.groups.len(), 1);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn group_rules_are_enforced() {
        let mut form = form();
        form.groups.push(PriceGroup {
            name: "potions".into(),
            item_ids: vec![],
            categories: vec![],
        });
        let errors = form.validate().unwrap_err();
        let messages: Vec<_> = errors.for_field("groups").map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "potions is used more than once",
                "potions needs at least one item id or category"
            ]
        );

        let mut empty = self::form();
        empty.groups.clear();
        empty.end_date = empty.start_date;
        let errors = empty.validate().unwrap_err();
        assert_eq!(errors.for_field("start_date").count(), 1);
        assert_eq!(errors.for_field("groups").count(), 1);
    }

    #[test]
    fn long_ranges_are_rejected() {
        let mut form = form();
        form.end_date = date(2025, 6, 1);
        assert_eq!(form.validate().unwrap_err().for_field("end_date").count(), 1);
    }

    #[test]
    fn request_splits_dates() {
        let json = serde_json::to_value(PriceGroupRequest::from(&form())).unwrap();
        assert_eq!(json["region"], "Europe");
        assert_eq!(json["start_month"], 1);
        assert_eq!(json["end_month"], 3);
        assert_eq!(json["price_groups"][0]["item_ids"], serde_json::json!([36109, 36110]));
        assert_eq!(json["price_setting"], "average");
    }

    #[test]
    fn deltas_flatten_into_rows_and_summary() {
        let deltas: PriceGroupDeltas = serde_json::from_str(
            r#"{
                "Potions": {
                    "deltas": {"2024-01-01": 0.0, "2024-01-08": -5.5},
                    "item_data": {
                        "36109": {"itemID": 36109, "itemName": "Grade 8 Tincture", "deltas": {"2024-01-01": 2.0, "2024-01-08": -8.0}}
                    }
                },
                "Food": {"deltas": {"2024-01-08": 3.0}}
            }"#,
        )
        .unwrap();
        let rows = item_rows(&deltas);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latest_delta, Some(-8.0));
        assert_eq!(rows[0].average_delta, Some(-3.0));
        assert_eq!(rows[0].largest_drop, Some(-8.0));
        assert_eq!(rows[0].largest_rise, Some(2.0));

        let summary = WeeklySummary::new(&deltas);
        assert_eq!(summary.dates, ["2024-01-01", "2024-01-08"]);
        assert_eq!(summary.groups[0].name, "Food");
        assert_eq!(summary.groups[0].values, [None, Some(3.0)]);
    }
}
