use maud::{html, Markup, Render};
use result_table::TableView;
use saddlebag_api_types::ffxiv::price_groups::{
    item_rows, PriceGroup, PriceGroupDeltas, PriceGroupForm, WeeklySummary, MAX_PRICE_GROUPS,
};
use saddlebag_api_types::{FfxivRegion, ValidationErrors};

use crate::web::templates::components::currency::Currency;
use crate::web::templates::components::fields::{
    bool_input, date_input, id_list_input, select_input, text_input, Field,
};
use crate::web::templates::components::result_table::ResultTable;

/// Blank rows offered below the submitted groups
const BLANK_GROUPS: usize = 2;

pub(crate) struct PriceGroupFields<'a> {
    pub(crate) form: &'a PriceGroupForm,
    pub(crate) errors: &'a ValidationErrors,
}

impl Render for PriceGroupFields<'_> {
    fn render(&self) -> Markup {
        let form = self.form;
        let errors = self.errors;
        let blank = PriceGroup::default();
        let shown = (form.groups.len() + BLANK_GROUPS).min(MAX_PRICE_GROUPS.max(form.groups.len()));
        let groups = form.groups.iter().chain(std::iter::repeat(&blank)).take(shown);
        html! {
            (Field::new("region", "Region", errors, select_input("region", form.region.unwrap_or(FfxivRegion::NorthAmerica))))
            (Field::new("start_date", "Start date", errors, date_input("start_date", form.start_date)))
            (Field::new("end_date", "End date", errors, date_input("end_date", form.end_date)))
            (Field::new("price_setting", "Price", errors, select_input("price_setting", form.price_setting)))
            (Field::new("quantity_setting", "Quantity", errors, select_input("quantity_setting", form.quantity_setting)))
            (Field::new("hq_only", "HQ only", errors, bool_input("hq_only", form.hq_only)))
            fieldset class="price-groups" {
                legend { "Price groups" }
                @for (index, group) in groups.enumerate() {
                    div class="price-group flex-row" {
                        (text_input(&format!("groups[{index}][name]"), &group.name, "Group name"))
                        (id_list_input(&format!("groups[{index}][item_ids]"), &group.item_ids, "Item ids, comma separated"))
                        (id_list_input(&format!("groups[{index}][categories]"), &group.categories, "Category ids, comma separated"))
                    }
                }
                @for error in errors.for_field("groups") {
                    span class="field-error" { (error.message) }
                }
            }
        }
    }
}

fn delta(value: Option<f64>) -> Markup {
    match value {
        Some(value) => html! {
            span class={ "percent" @if value < 0.0 { " negative" } } { (format!("{value:+.2}%")) }
        },
        None => html! { "-" },
    }
}

pub(crate) struct PriceGroupResults<'a> {
    pub(crate) deltas: &'a PriceGroupDeltas,
    pub(crate) view: &'a TableView,
    pub(crate) form_query: &'a str,
}

impl Render for PriceGroupResults<'_> {
    fn render(&self) -> Markup {
        let summary = WeeklySummary::new(self.deltas);
        let rows = item_rows(self.deltas);
        html! {
            section class="content-well" {
                h3 { "Weekly price change by group" }
                div class="table-scroll" {
                    table class="weekly-summary" {
                        thead {
                            tr {
                                th { "Group" }
                                @for date in &summary.dates {
                                    th class="num" { (date) }
                                }
                            }
                        }
                        tbody {
                            @for group in &summary.groups {
                                tr {
                                    td { (group.name) }
                                    @for value in &group.values {
                                        td class="num" { (delta(*value)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            section class="content-well" {
                h3 { "Items" }
                (ResultTable {
                    rows: &rows,
                    view: self.view,
                    form_query: self.form_query,
                    action: "/ffxiv/price-groups",
                    currency: Currency::Gil,
                })
            }
        }
    }
}
