use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::web::preferences::{Preferences, PreferencesForm};
use crate::web::templates::page::RenderPage;
use crate::web::templates::pages::options_page::OptionsPage;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OptionsQuery {
    saved: bool,
}

pub(crate) async fn options(
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    Query(query): Query<OptionsQuery>,
) -> RenderPage<OptionsPage> {
    let page = OptionsPage {
        saved: query.saved,
        ..OptionsPage::new(&preferences, catalog)
    };
    RenderPage(page, preferences)
}

pub(crate) async fn save_options(
    State(catalog): State<Arc<Catalog>>,
    preferences: Preferences,
    cookies: CookieJar,
    Form(form): Form<PreferencesForm>,
) -> Response {
    match form.save(&catalog, cookies) {
        Ok(cookies) => (cookies, Redirect::to("/options?saved=true")).into_response(),
        Err(errors) => {
            let mut page = OptionsPage::new(&preferences, catalog);
            page.ffxiv_world = form.ffxiv_world;
            page.wow_region = form.wow_region.parse().unwrap_or(page.wow_region);
            page.wow_realm = form.wow_realm;
            page.theme = form.theme.parse().unwrap_or_default();
            page.errors = Some(errors);
            RenderPage(page, preferences).into_response()
        }
    }
}
