use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use maud::{html, Markup};
use saddlebag_api_types::ffxiv::craftsim::{CraftItem, CraftsimForm, CraftsimRequest};
use saddlebag_api_types::ffxiv::marketshare::{
    MarketshareForm, MarketshareItem, MarketshareRequest,
};
use saddlebag_api_types::ffxiv::price_groups::{item_rows, PriceGroupForm, PriceGroupRequest};
use saddlebag_api_types::ffxiv::undercut::{UndercutAlertForm, UndercutConfig};
use saddlebag_api_types::{parse_form, SearchForm, ValidationErrors};
use saddlebag_client::SaddlebagClient;
use tracing::info;

use crate::catalog::Catalog;
use crate::web::error::WebError;
use crate::web::preferences::Preferences;
use crate::web::search::{check_world, csv_response, run_search, ResponseFormat, SearchOutcome};
use crate::web::templates::components::currency::Currency;
use crate::web::templates::components::fields::{
    bool_input, id_list_input, number_input, select_input, text_input, Field, FormErrors,
    NO_ERRORS,
};
use crate::web::templates::components::result_table::ResultTable;
use crate::web::templates::components::world_select::WorldSelect;
use crate::web::templates::page::RenderPage;
use crate::web::templates::pages::price_group_page::{PriceGroupFields, PriceGroupResults};
use crate::web::templates::pages::search_page::SearchPage;

fn world_field(
    name: &'static str,
    label: &'static str,
    selected: &str,
    catalog: &Catalog,
    errors: &ValidationErrors,
) -> Markup {
    html! {
        (Field::new(name, label, errors, html! {
            (WorldSelect { name, selected, catalog })
        }))
    }
}

pub(crate) async fn marketshare(
    State(client): State<SaddlebagClient>,
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let submission = run_search(
        "ffxiv_marketshare",
        query.as_deref(),
        &preferences.home_defaults(),
        |form: &mut MarketshareForm, errors| {
            check_world(&catalog, "server", &mut form.server, errors)
        },
        |form| {
            let request = MarketshareRequest::from(form);
            let client = client.clone();
            async move { client.ffxiv_marketshare(&request).await }
        },
    )
    .await;
    if let Some(csv) = submission.csv("ffxiv-marketshare")? {
        return Ok(csv);
    }
    let form = &submission.form;
    let errors = submission.errors();
    let form_query = submission.form_query();
    let fields = html! {
        (FormErrors { errors })
        (world_field("server", "Home world", &form.server, &catalog, errors))
        (Field::new("time_period", "Time period (hours)", errors, number_input("time_period", form.time_period, "1")))
        (Field::new("sales_amount", "Minimum sales", errors, number_input("sales_amount", form.sales_amount, "1")))
        (Field::new("average_price", "Minimum average price", errors, number_input("average_price", form.average_price, "1")))
        (Field::new("filters", "Item categories", errors, id_list_input("filters", &form.filters, "0 for everything"))
            .help("Comma separated category ids"))
        (Field::new("sort_by", "Sort by", errors, select_input("sort_by", form.sort_by)))
    };
    let results = submission.results(|rows: &Vec<MarketshareItem>| {
        html! {
            (ResultTable {
                rows,
                view: &submission.view,
                form_query: &form_query,
                action: "/ffxiv/marketshare",
                currency: Currency::Gil,
            })
        }
    });
    let page = SearchPage {
        title: "FFXIV Marketshare",
        description: "Find the items with the most gil changing hands on your world and how their prices are trending.",
        action: "/ffxiv/marketshare",
        method: "get",
        fields,
        results,
    };
    Ok(RenderPage(page, preferences).into_response())
}

pub(crate) async fn craftsim(
    State(client): State<SaddlebagClient>,
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let submission = run_search(
        "ffxiv_craftsim",
        query.as_deref(),
        &preferences.home_defaults(),
        |form: &mut CraftsimForm, errors| {
            check_world(&catalog, "home_server", &mut form.home_server, errors)
        },
        |form| {
            let request = CraftsimRequest::from(form);
            let client = client.clone();
            async move { client.ffxiv_craftsim(&request).await }
        },
    )
    .await;
    if let Some(csv) = submission.csv("ffxiv-craftsim")? {
        return Ok(csv);
    }
    let form = &submission.form;
    let errors = submission.errors();
    let form_query = submission.form_query();
    let fields = html! {
        (FormErrors { errors })
        (world_field("home_server", "Home world", &form.home_server, &catalog, errors))
        (Field::new("cost_metric", "Material cost", errors, select_input("cost_metric", form.cost_metric)))
        (Field::new("revenue_metric", "Sale price", errors, select_input("revenue_metric", form.revenue_metric)))
        (Field::new("sales_per_week", "Minimum sales per week", errors, number_input("sales_per_week", form.sales_per_week, "1")))
        (Field::new("median_sale_price", "Minimum median sale price", errors, number_input("median_sale_price", form.median_sale_price, "1")))
        (Field::new("max_material_cost", "Maximum material cost", errors, number_input("max_material_cost", form.max_material_cost, "1")))
        (Field::new("jobs", "Jobs", errors, id_list_input("jobs", &form.jobs, "0 for every job"))
            .help("Comma separated job ids"))
        (Field::new("filters", "Item categories", errors, id_list_input("filters", &form.filters, "0 for everything")))
        (Field::new("stars", "Stars", errors, number_input("stars", form.stars, "1")).help("-1 for any"))
        (Field::new("lvl", "Recipe level", errors, number_input("lvl", form.lvl, "1")).help("-1 for any"))
        (Field::new("yields", "Yield", errors, number_input("yields", form.yields, "1")).help("-1 for any"))
        (Field::new("hide_expert_recipes", "Hide expert recipes", errors, bool_input("hide_expert_recipes", form.hide_expert_recipes)))
    };
    let results = submission.results(|rows: &Vec<CraftItem>| {
        html! {
            (ResultTable {
                rows,
                view: &submission.view,
                form_query: &form_query,
                action: "/ffxiv/craftsim",
                currency: Currency::Gil,
            })
        }
    });
    let page = SearchPage {
        title: "FFXIV Craftsim",
        description: "Rank every recipe by the profit it would make on your world today.",
        action: "/ffxiv/craftsim",
        method: "get",
        fields,
        results,
    };
    Ok(RenderPage(page, preferences).into_response())
}

pub(crate) async fn price_groups(
    State(client): State<SaddlebagClient>,
    preferences: Preferences,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let submission = run_search(
        "ffxiv_price_groups",
        query.as_deref(),
        &preferences.home_defaults(),
        |_: &mut PriceGroupForm, _| {},
        |form| {
            let request = PriceGroupRequest::from(form);
            let client = client.clone();
            async move { client.ffxiv_price_group_delta(&request).await }
        },
    )
    .await;
    if let (SearchOutcome::Found(deltas), ResponseFormat::Csv) =
        (&submission.outcome, submission.format)
    {
        return csv_response("ffxiv-price-groups", &item_rows(deltas), &submission.view);
    }
    let errors = submission.errors();
    let form_query = submission.form_query();
    let fields = html! {
        (FormErrors { errors })
        (PriceGroupFields { form: &submission.form, errors })
    };
    let results = submission.results(|deltas| {
        html! {
            (PriceGroupResults {
                deltas,
                view: &submission.view,
                form_query: &form_query,
            })
        }
    });
    let page = SearchPage {
        title: "FFXIV Price Groups",
        description: "Track week over week price changes for groups of items and categories you define.",
        action: "/ffxiv/price-groups",
        method: "get",
        fields,
        results,
    };
    Ok(RenderPage(page, preferences).into_response())
}

fn undercut_page(
    form: &UndercutAlertForm,
    errors: &ValidationErrors,
    catalog: &Catalog,
    config: Option<&str>,
) -> SearchPage {
    let fields = html! {
        (FormErrors { errors })
        (Field::new("seller_id", "Retainer seller id", errors, text_input("seller_id", &form.seller_id, "Hex id from your retainer's listings")))
        (world_field("server", "Home world", &form.server, catalog, errors))
        (Field::new("add_ids", "Only watch these items", errors, id_list_input("add_ids", &form.add_ids, "Item ids, comma separated")))
        (Field::new("ignore_ids", "Ignore these items", errors, id_list_input("ignore_ids", &form.ignore_ids, "Item ids, comma separated"))
            .help("Leave empty when using the watch list"))
        (Field::new("hq_only", "HQ only", errors, bool_input("hq_only", form.hq_only)))
        (Field::new("ignore_data_after_hours", "Ignore listings older than (hours)", errors, number_input("ignore_data_after_hours", form.ignore_data_after_hours, "1")))
        (Field::new("ignore_undercuts_with_quantity_over", "Ignore undercuts with quantity over", errors, number_input("ignore_undercuts_with_quantity_over", form.ignore_undercuts_with_quantity_over, "1")))
    };
    let results = html! {
        @if let Some(config) = config {
            div class="card" {
                h3 { "Alert configuration" }
                p { "Paste this into the alert bot to start receiving undercut alerts." }
                pre class="json" { (config) }
            }
        } @else if !errors.is_empty() && errors.for_field("form").next().is_none() {
            div class="card error" { p { "Please fix the highlighted fields." } }
        }
    };
    SearchPage {
        title: "FFXIV Undercut Alerts",
        description: "Generate the configuration for alerts when another retainer undercuts yours.",
        action: "/ffxiv/undercut",
        method: "post",
        fields,
        results,
    }
}

pub(crate) async fn undercut(
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
) -> RenderPage<SearchPage> {
    let mut form = UndercutAlertForm::default();
    form.apply_preferences(&preferences.home_defaults());
    let page = undercut_page(&form, &NO_ERRORS, &catalog, None);
    RenderPage(page, preferences)
}

pub(crate) async fn generate_undercut(
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    body: String,
) -> Result<RenderPage<SearchPage>, WebError> {
    let home = preferences.home_defaults();
    let (form, errors) = match parse_form::<UndercutAlertForm>(&body) {
        Ok(mut form) => {
            form.apply_preferences(&home);
            let mut errors = ValidationErrors::new();
            check_world(&catalog, "server", &mut form.server, &mut errors);
            if let Err(invalid) = form.validate() {
                errors.0.extend(invalid.0);
            }
            (form, errors)
        }
        Err(errors) => {
            let mut form = UndercutAlertForm::default();
            form.apply_preferences(&home);
            (form, errors)
        }
    };
    let config = if errors.is_empty() {
        info!(server = %form.server, "generated undercut alert config");
        Some(UndercutConfig::from(&form).to_json_pretty()?)
    } else {
        None
    };
    let page = undercut_page(&form, &errors, &catalog, config.as_deref());
    Ok(RenderPage(page, preferences))
}
