use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use saddlebag_client::SaddlebagClient;

use super::oauth::DiscordAuthConfig;
use crate::catalog::Catalog;

/// Where debug builds read static files from
#[derive(Clone, Debug)]
pub(crate) struct StaticDir(pub(crate) Arc<PathBuf>);

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) client: SaddlebagClient,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) key: Key,
    /// `None` when Discord login is not configured
    pub(crate) oauth_config: Option<DiscordAuthConfig>,
    /// Plain client for talking to Discord
    pub(crate) http: reqwest::Client,
    pub(crate) static_dir: StaticDir,
}

impl FromRef<WebState> for SaddlebagClient {
    fn from_ref(input: &WebState) -> Self {
        input.client.clone()
    }
}

impl FromRef<WebState> for Arc<Catalog> {
    fn from_ref(input: &WebState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<WebState> for Key {
    fn from_ref(input: &WebState) -> Self {
        input.key.clone()
    }
}

impl FromRef<WebState> for Option<DiscordAuthConfig> {
    fn from_ref(input: &WebState) -> Self {
        input.oauth_config.clone()
    }
}

impl FromRef<WebState> for reqwest::Client {
    fn from_ref(input: &WebState) -> Self {
        input.http.clone()
    }
}

impl FromRef<WebState> for StaticDir {
    fn from_ref(input: &WebState) -> Self {
        input.static_dir.clone()
    }
}
