mod catalog;
mod config;
mod web;
mod web_metrics;

use std::sync::Arc;

use anyhow::Result;
use axum_extra::extract::cookie::Key;
use catalog::Catalog;
use config::Config;
use saddlebag_client::SaddlebagClient;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use web::oauth::DiscordAuthConfig;
use web::state::{StaticDir, WebState};
use web_metrics::start_metrics_server;

const USER_AGENT: &str = concat!("saddlebag/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let config = Config::from_env()?;

    let key = match &config.cookie_key {
        Some(bytes) => Key::try_from(bytes.as_slice())?,
        None => {
            warn!("COOKIE_KEY is not set, using a random key. Everyone is logged out on restart.");
            Key::generate()
        }
    };
    let oauth_config = config
        .discord
        .as_ref()
        .map(DiscordAuthConfig::new)
        .transpose()?;
    if oauth_config.is_none() {
        info!("Discord settings missing, login is disabled");
    }
    let client = SaddlebagClient::new(&config.api_url, USER_AGENT)?;
    info!(api = %client.base_url(), "using market data api");
    let catalog = Arc::new(Catalog::embedded()?);
    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = start_metrics_server(metrics_port).await {
            error!("metrics server stopped {e:?}");
        }
    });

    let web_state = WebState {
        client,
        catalog,
        key,
        oauth_config,
        http,
        static_dir: StaticDir(Arc::new(config.static_dir.clone())),
    };
    web::start_web(web_state, config.port).await
}
