use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use maud::{html, Markup};
use saddlebag_api_types::wow::export::{ExportRealm, ExportSearchForm, ExportSearchRequest};
use saddlebag_api_types::wow::marketshare::{
    MarketshareForm, MarketshareItem, MarketshareRequest,
};
use saddlebag_api_types::wow::shortage::{ShortageForm, ShortageItem, ShortageRequest};
use saddlebag_api_types::{ValidationErrors, WowRegion};
use saddlebag_client::SaddlebagClient;

use crate::catalog::Catalog;
use crate::web::error::WebError;
use crate::web::preferences::Preferences;
use crate::web::search::{check_realm, run_search};
use crate::web::templates::components::currency::Currency;
use crate::web::templates::components::fields::{
    bool_input, number_input, select_input, Field, FormErrors,
};
use crate::web::templates::components::realm_select::RealmSelect;
use crate::web::templates::components::result_table::ResultTable;
use crate::web::templates::page::RenderPage;
use crate::web::templates::pages::search_page::SearchPage;

/// Region select plus the realm select it drives
fn realm_fields(
    region: Option<WowRegion>,
    realm: Option<i32>,
    catalog: &Catalog,
    errors: &ValidationErrors,
) -> Markup {
    let region = region.unwrap_or_default();
    html! {
        (Field::new("region", "Region", errors, select_input("region", region)))
        (Field::new("realm", "Home realm", errors, html! {
            (RealmSelect {
                name: "realm",
                region_field: "region",
                region,
                selected: realm,
                catalog,
            })
        }))
    }
}

fn item_filters(
    item_class: i32,
    item_subclass: i32,
    errors: &ValidationErrors,
) -> Markup {
    html! {
        (Field::new("item_class", "Item class", errors, number_input("item_class", item_class, "1"))
            .help("-1 for every class"))
        (Field::new("item_subclass", "Item subclass", errors, number_input("item_subclass", item_subclass, "1"))
            .help("-1 for every subclass"))
    }
}

pub(crate) async fn shortages(
    State(client): State<SaddlebagClient>,
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let submission = run_search(
        "wow_shortages",
        query.as_deref(),
        &preferences.home_defaults(),
        |form: &mut ShortageForm, errors| {
            check_realm(&catalog, form.region, &mut form.realm, errors)
        },
        |form| {
            let request = ShortageRequest::from(form);
            let client = client.clone();
            async move { client.wow_shortages(&request).await }
        },
    )
    .await;
    if let Some(csv) = submission.csv("wow-shortages")? {
        return Ok(csv);
    }
    let form = &submission.form;
    let errors = submission.errors();
    let form_query = submission.form_query();
    let fields = html! {
        (FormErrors { errors })
        (realm_fields(form.region, form.realm, &catalog, errors))
        (Field::new("desired_avg_price", "Minimum average price", errors, number_input("desired_avg_price", form.desired_avg_price, "any")))
        (Field::new("desired_sales_per_day", "Minimum sales per day", errors, number_input("desired_sales_per_day", form.desired_sales_per_day, "any")))
        (Field::new("desired_price_increase", "Minimum price increase (%)", errors, number_input("desired_price_increase", form.desired_price_increase, "any")))
        (Field::new("flip_risk_limit", "Flip risk limit", errors, number_input("flip_risk_limit", form.flip_risk_limit, "any"))
            .help("Lower values are safer flips"))
        (Field::new("item_quality", "Item quality", errors, number_input("item_quality", form.item_quality, "1"))
            .help("-1 for any quality"))
        (item_filters(form.item_class, form.item_subclass, errors))
    };
    let results = submission.results(|rows: &Vec<ShortageItem>| {
        html! {
            (ResultTable {
                rows,
                view: &submission.view,
                form_query: &form_query,
                action: "/wow/shortages",
                currency: Currency::Gold,
            })
        }
    });
    let page = SearchPage {
        title: "WoW Shortage Finder",
        description: "Find items that are about to sell out on your realm so you can stock up before the price jumps.",
        action: "/wow/shortages",
        method: "get",
        fields,
        results,
    };
    Ok(RenderPage(page, preferences).into_response())
}

pub(crate) async fn marketshare(
    State(client): State<SaddlebagClient>,
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let submission = run_search(
        "wow_marketshare",
        query.as_deref(),
        &preferences.home_defaults(),
        |form: &mut MarketshareForm, errors| {
            check_realm(&catalog, form.region, &mut form.realm, errors)
        },
        |form| {
            let request = MarketshareRequest::from(form);
            let client = client.clone();
            async move { client.wow_marketshare(&request).await }
        },
    )
    .await;
    if let Some(csv) = submission.csv("wow-marketshare")? {
        return Ok(csv);
    }
    let form = &submission.form;
    let errors = submission.errors();
    let form_query = submission.form_query();
    let fields = html! {
        (FormErrors { errors })
        (realm_fields(form.region, form.realm, &catalog, errors))
        (Field::new("commodity", "Commodities", errors, bool_input("commodity", form.commodity))
            .help("Region wide commodity auctions instead of your realm"))
        (Field::new("desired_avg_price", "Minimum average price", errors, number_input("desired_avg_price", form.desired_avg_price, "any")))
        (Field::new("desired_sales_per_day", "Minimum sales per day", errors, number_input("desired_sales_per_day", form.desired_sales_per_day, "any")))
        (item_filters(form.item_class, form.item_subclass, errors))
        (Field::new("sort_by", "Sort by", errors, select_input("sort_by", form.sort_by)))
    };
    let results = submission.results(|rows: &Vec<MarketshareItem>| {
        html! {
            (ResultTable {
                rows,
                view: &submission.view,
                form_query: &form_query,
                action: "/wow/marketshare",
                currency: Currency::Gold,
            })
        }
    });
    let page = SearchPage {
        title: "WoW Marketshare",
        description: "See which items move the most gold on your realm and whether their prices are rising or crashing.",
        action: "/wow/marketshare",
        method: "get",
        fields,
        results,
    };
    Ok(RenderPage(page, preferences).into_response())
}

pub(crate) async fn export(
    State(client): State<SaddlebagClient>,
    preferences: Preferences,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let submission = run_search(
        "wow_export",
        query.as_deref(),
        &preferences.home_defaults(),
        |_: &mut ExportSearchForm, _| {},
        |form| {
            let request = ExportSearchRequest::from(form);
            let client = client.clone();
            async move { client.wow_export_search(&request).await }
        },
    )
    .await;
    if let Some(csv) = submission.csv("wow-export")? {
        return Ok(csv);
    }
    let form = &submission.form;
    let errors = submission.errors();
    let form_query = submission.form_query();
    let fields = html! {
        (FormErrors { errors })
        (Field::new("region", "Region", errors, select_input("region", form.region.unwrap_or_default())))
        (Field::new("item_id", "Item id", errors, number_input("item_id", form.item_id, "1")))
        (Field::new("min_price", "Minimum price", errors, number_input("min_price", form.min_price, "any")))
        (Field::new("max_quantity", "Maximum quantity", errors, number_input("max_quantity", form.max_quantity, "1")))
        (Field::new("population", "Realm population", errors, select_input("population", form.population)))
        (Field::new("sort_by", "Sort by", errors, select_input("sort_by", form.sort_by)))
    };
    let results = submission.results(|rows: &Vec<ExportRealm>| {
        html! {
            (ResultTable {
                rows,
                view: &submission.view,
                form_query: &form_query,
                action: "/wow/export",
                currency: Currency::Gold,
            })
        }
    });
    let page = SearchPage {
        title: "WoW Export Search",
        description: "Compare an item's cheapest listing across every realm in your region.",
        action: "/wow/export",
        method: "get",
        fields,
        results,
    };
    Ok(RenderPage(page, preferences).into_response())
}
