//! The request flow shared by every search page. A GET without a query string shows the
//! form filled from the visitor's preferences, anything else is a submitted search.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Instant;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use maud::{html, Markup};
use result_table::{write_csv, TableRow, TableView};
use saddlebag_api_types::{
    parse_form, to_query_string, HomeDefaults, SearchForm, ValidationErrors, WowRegion,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::WebError;
use super::templates::components::fields::NO_ERRORS;
use crate::catalog::Catalog;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SearchOutcome<R> {
    NotSubmitted,
    Invalid(ValidationErrors),
    /// Backend exception or transport failure, shown next to the kept form
    Failed(String),
    Empty,
    Found(R),
}

impl<R> SearchOutcome<R> {
    fn label(&self) -> &'static str {
        match self {
            SearchOutcome::NotSubmitted => "not_submitted",
            SearchOutcome::Invalid(_) => "invalid",
            SearchOutcome::Failed(_) => "failed",
            SearchOutcome::Empty => "empty",
            SearchOutcome::Found(_) => "found",
        }
    }
}

pub(crate) trait SearchResults {
    fn is_empty(&self) -> bool;
}

impl<T> SearchResults for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> SearchResults for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ResponseFormat {
    #[default]
    Html,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatQuery {
    format: ResponseFormat,
}

impl ResponseFormat {
    fn from_query_str(query: &str) -> Self {
        serde_qs::Config::new(5, false)
            .deserialize_str::<FormatQuery>(query)
            .map(|query| query.format)
            .unwrap_or_default()
    }
}

/// A handled search request
pub(crate) struct Submission<F, R> {
    pub(crate) form: F,
    pub(crate) outcome: SearchOutcome<R>,
    pub(crate) view: TableView,
    pub(crate) format: ResponseFormat,
}

impl<F: SearchForm, R> Submission<F, R> {
    pub(crate) fn errors(&self) -> &ValidationErrors {
        match &self.outcome {
            SearchOutcome::Invalid(errors) => errors,
            _ => &NO_ERRORS,
        }
    }

    /// The form as a query string, so table links resubmit the same search
    pub(crate) fn form_query(&self) -> String {
        to_query_string(&self.form).unwrap_or_default()
    }

    /// Draws whatever goes below the form
    pub(crate) fn results(&self, found: impl FnOnce(&R) -> Markup) -> Markup {
        match &self.outcome {
            SearchOutcome::NotSubmitted => html! {},
            SearchOutcome::Invalid(errors) => html! {
                div class="card error" {
                    @if errors.for_field("form").next().is_some() {
                        @for error in errors.for_field("form") {
                            p { (error.message) }
                        }
                    } @else {
                        p { "Please fix the highlighted fields." }
                    }
                }
            },
            SearchOutcome::Failed(message) => html! {
                div class="card error" {
                    h3 { "The search failed" }
                    p { (message) }
                }
            },
            SearchOutcome::Empty => html! {
                div class="card" { "No results found. Try loosening the search." }
            },
            SearchOutcome::Found(results) => found(results),
        }
    }
}

impl<F: SearchForm, T: TableRow> Submission<F, Vec<T>> {
    /// The CSV download when one was asked for and there is something to export
    pub(crate) fn csv(&self, name: &str) -> Result<Option<Response>, WebError> {
        match (&self.outcome, self.format) {
            (SearchOutcome::Found(rows), ResponseFormat::Csv) => {
                Ok(Some(csv_response(name, rows, &self.view)?))
            }
            _ => Ok(None),
        }
    }
}

pub(crate) fn csv_response<T: TableRow>(
    name: &str,
    rows: &[T],
    view: &TableView,
) -> Result<Response, WebError> {
    let mut body = Vec::new();
    write_csv(&view.rows(rows), &view.columns::<T>(), &mut body)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}.csv\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Runs one search: decode the query, fill in the visitor's defaults, let `prepare` check
/// things that need the catalog, validate, then call the backend.
pub(crate) async fn run_search<F, R, Fut>(
    search: &'static str,
    query: Option<&str>,
    home: &HomeDefaults,
    prepare: impl FnOnce(&mut F, &mut ValidationErrors),
    call: impl FnOnce(&F) -> Fut,
) -> Submission<F, R>
where
    F: SearchForm,
    R: SearchResults,
    Fut: Future<Output = Result<R, saddlebag_client::Error>>,
{
    let query = query.map(str::trim).filter(|query| !query.is_empty());
    let Some(query) = query else {
        let mut form = F::default();
        form.apply_preferences(home);
        return Submission {
            form,
            outcome: SearchOutcome::NotSubmitted,
            view: TableView::default(),
            format: ResponseFormat::Html,
        };
    };
    let view = TableView::from_query_str(query);
    let format = ResponseFormat::from_query_str(query);
    let start = Instant::now();

    let (form, outcome) = match parse_form::<F>(query) {
        Err(errors) => {
            let mut form = F::default();
            form.apply_preferences(home);
            (form, SearchOutcome::Invalid(errors))
        }
        Ok(mut form) => {
            form.apply_preferences(home);
            let mut errors = ValidationErrors::new();
            prepare(&mut form, &mut errors);
            if let Err(invalid) = form.validate() {
                errors.0.extend(invalid.0);
            }
            let outcome = if !errors.is_empty() {
                SearchOutcome::Invalid(errors)
            } else {
                match call(&form).await {
                    Ok(results) if results.is_empty() => SearchOutcome::Empty,
                    Ok(results) => SearchOutcome::Found(results),
                    Err(saddlebag_client::Error::Backend(message)) => {
                        warn!(search, "backend rejected search: {message}");
                        SearchOutcome::Failed(message)
                    }
                    Err(e) => {
                        warn!(search, "search request failed: {e}");
                        SearchOutcome::Failed(format!(
                            "Unable to reach the market data service, please try again later ({e})"
                        ))
                    }
                }
            };
            (form, outcome)
        }
    };

    let labels = [("search", search), ("outcome", outcome.label())];
    metrics::counter!("saddlebag_searches_total", &labels).increment(1);
    metrics::histogram!("saddlebag_search_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
    info!(search, outcome = outcome.label(), "search handled");

    Submission {
        form,
        outcome,
        view,
        format,
    }
}

/// Fills the world field from the catalog's spelling, or reports it as unknown
pub(crate) fn check_world(
    catalog: &Catalog,
    field: &'static str,
    world: &mut String,
    errors: &mut ValidationErrors,
) {
    if world.trim().is_empty() {
        return;
    }
    match catalog.find_world(world) {
        Some(location) => *world = location.world.to_string(),
        None => errors.add(field, format!("Unknown world `{}`", world.trim())),
    }
}

/// A blank realm becomes the region's default realm, a realm from another region is an error
pub(crate) fn check_realm(
    catalog: &Catalog,
    region: Option<WowRegion>,
    realm: &mut Option<i32>,
    errors: &mut ValidationErrors,
) {
    let Some(region) = region else {
        return;
    };
    match *realm {
        None => *realm = catalog.default_realm(region).map(|realm| realm.id),
        Some(id) if catalog.realm(region, id).is_none() => {
            errors.add("realm", format!("Realm {id} is not in the selected region"))
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod test {
    use saddlebag_api_types::ffxiv::marketshare::{MarketshareForm, MarketshareItem};
    use saddlebag_api_types::wow::shortage::ShortageForm;
    use saddlebag_api_types::{FfxivRegion, HomeDefaults, MarketState, ValidationErrors, WowRegion};

    use std::future::{ready, Ready};

    use super::{check_realm, check_world, run_search, ResponseFormat, SearchOutcome};
    use crate::catalog::Catalog;

    fn home() -> HomeDefaults {
        HomeDefaults {
            ffxiv_world: "Balmung".into(),
            ffxiv_region: FfxivRegion::NorthAmerica,
            wow_region: WowRegion::NorthAmerica,
            wow_realm_id: 3678,
            wow_realm_name: "Thrall".into(),
        }
    }

    fn item(name: &str) -> MarketshareItem {
        MarketshareItem {
            item_id: 1,
            name: name.into(),
            state: MarketState::Stable,
            ..Default::default()
        }
    }

    type Found = Result<Vec<MarketshareItem>, saddlebag_client::Error>;

    fn not_called(_: &MarketshareForm) -> Ready<Found> {
        panic!("the backend should not be called")
    }

    #[tokio::test]
    async fn empty_query_is_not_submitted() {
        let submission = run_search::<MarketshareForm, Vec<MarketshareItem>, _>(
            "test",
            Some("  "),
            &home(),
            |_, _| {},
            not_called,
        )
        .await;
        assert_eq!(submission.outcome, SearchOutcome::NotSubmitted);
        assert_eq!(submission.form.server, "Balmung");
    }

    #[tokio::test]
    async fn invalid_forms_never_reach_the_backend() {
        let submission = run_search::<MarketshareForm, Vec<MarketshareItem>, _>(
            "test",
            Some("time_period=0"),
            &home(),
            |_, _| {},
            not_called,
        )
        .await;
        match &submission.outcome {
            SearchOutcome::Invalid(errors) => {
                assert_eq!(errors.for_field("time_period").count(), 1)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(submission.errors().for_field("time_period").count(), 1);
    }

    #[tokio::test]
    async fn backend_results_and_format_are_kept() {
        let submission = run_search::<MarketshareForm, _, _>(
            "test",
            Some("server=Zalera&sort=name&format=csv"),
            &home(),
            |_, _| {},
            |form| {
                let server = form.server.clone();
                async move { Found::Ok(vec![item(&server)]) }
            },
        )
        .await;
        assert_eq!(submission.format, ResponseFormat::Csv);
        assert_eq!(submission.view.sort.as_deref(), Some("name"));
        match &submission.outcome {
            SearchOutcome::Found(rows) => assert_eq!(rows[0].name, "Zalera"),
            other => panic!("unexpected {other:?}"),
        }
        let response = submission.csv("marketshare").unwrap().unwrap();
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"marketshare.csv\""
        );
    }

    #[tokio::test]
    async fn empty_and_failed_searches() {
        let empty = run_search::<MarketshareForm, Vec<MarketshareItem>, _>(
            "test",
            Some("server=Zalera"),
            &home(),
            |_, _| {},
            |_| ready(Ok(Vec::new())),
        )
        .await;
        assert_eq!(empty.outcome, SearchOutcome::Empty);

        let failed = run_search::<MarketshareForm, Vec<MarketshareItem>, _>(
            "test",
            Some("server=Zalera"),
            &home(),
            |_, _| {},
            |_| ready(Err(saddlebag_client::Error::Backend("Invalid server".into()))),
        )
        .await;
        assert_eq!(failed.outcome, SearchOutcome::Failed("Invalid server".into()));
    }

    #[tokio::test]
    async fn malformed_query_is_an_invalid_form() {
        let submission = run_search::<MarketshareForm, Vec<MarketshareItem>, _>(
            "test",
            Some("time_period=soon"),
            &home(),
            |_, _| {},
            not_called,
        )
        .await;
        assert_eq!(submission.errors().for_field("form").count(), 1);
    }

    #[test]
    fn worlds_and_realms_are_checked_against_the_catalog() {
        let catalog = Catalog::embedded().unwrap();
        let mut errors = ValidationErrors::new();
        let mut world = "zalera".to_string();
        check_world(&catalog, "server", &mut world, &mut errors);
        assert_eq!(world, "Zalera");

        let mut form = ShortageForm::default();
        check_realm(&catalog, Some(WowRegion::Europe), &mut form.realm, &mut errors);
        assert_eq!(form.realm, Some(1403));
        assert!(errors.is_empty());

        let mut realm = Some(3678);
        check_realm(&catalog, Some(WowRegion::Europe), &mut realm, &mut errors);
        let mut world = "Atlantis".to_string();
        check_world(&catalog, "server", &mut world, &mut errors);
        assert_eq!(errors.for_field("realm").count(), 1);
        assert_eq!(errors.for_field("server").count(), 1);
    }
}
