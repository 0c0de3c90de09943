use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::headers::{CacheControl, HeaderMapExt};
use saddlebag_api_types::WowRegion;

use crate::catalog::Catalog;
use crate::web::error::WebError;
use crate::web::preferences::Preferences;
use crate::web::templates::page::RenderPage;
use crate::web::templates::pages::home_page::HomePage;

const CATALOG_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24);

pub(crate) async fn home(preferences: Preferences) -> RenderPage<HomePage> {
    RenderPage(HomePage, preferences)
}

pub(crate) async fn world_data(State(catalog): State<Arc<Catalog>>) -> impl IntoResponse {
    let mut response = Json(catalog.worlds()).into_response();
    response
        .headers_mut()
        .typed_insert(CacheControl::new().with_max_age(CATALOG_MAX_AGE));
    response
}

pub(crate) async fn realm_data(
    State(catalog): State<Arc<Catalog>>,
    Path(region): Path<String>,
) -> Result<impl IntoResponse, WebError> {
    let region = region
        .parse::<WowRegion>()
        .map_err(|_| WebError::NotFound)?;
    let mut response = Json(catalog.realms(region)).into_response();
    response
        .headers_mut()
        .typed_insert(CacheControl::new().with_max_age(CATALOG_MAX_AGE));
    Ok(response)
}

pub(crate) async fn fallback() -> WebError {
    WebError::NotFound
}
