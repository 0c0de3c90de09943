pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod oauth;
pub(crate) mod preferences;
pub(crate) mod search;
pub(crate) mod state;
pub(crate) mod static_content;
pub(crate) mod templates;
pub(crate) mod tools;

use std::net::SocketAddr;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use self::handlers::{ffxiv, misc, options, wow};
use self::oauth::{begin_login, logout, redirect};
use self::state::WebState;
use self::static_content::{favicon, robots, static_path};
use crate::web_metrics::track_metrics;

pub(crate) fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(misc::home))
        .route("/ffxiv/marketshare", get(ffxiv::marketshare))
        .route("/ffxiv/craftsim", get(ffxiv::craftsim))
        .route("/ffxiv/price-groups", get(ffxiv::price_groups))
        .route(
            "/ffxiv/undercut",
            get(ffxiv::undercut).post(ffxiv::generate_undercut),
        )
        .route("/wow/shortages", get(wow::shortages))
        .route("/wow/marketshare", get(wow::marketshare))
        .route("/wow/export", get(wow::export))
        .route("/options", get(options::options).post(options::save_options))
        .route("/discord/login", get(begin_login))
        .route("/discord/callback", get(redirect))
        .route("/discord/logout", get(logout))
        .route("/api/ffxiv/worlds", get(misc::world_data))
        .route("/api/wow/realms/{region}", get(misc::realm_data))
        .route("/static/{*path}", get(static_path))
        .route("/favicon.ico", get(favicon))
        .route("/robots.txt", get(robots))
        .fallback(misc::fallback)
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) async fn start_web(state: WebState, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
