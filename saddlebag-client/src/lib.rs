//! Typed client for the Saddlebag Exchange market data API. Every search is a JSON
//! POST; the backend reports failures as `{"exception": "..."}`, frequently with a
//! `200 OK` status.

use std::time::Duration;

use log::{info, warn};
use reqwest::{Client, StatusCode, Url};
use saddlebag_api_types::ffxiv::craftsim::{CraftItem, CraftsimRequest};
use saddlebag_api_types::ffxiv::marketshare::{MarketshareItem, MarketshareRequest};
use saddlebag_api_types::ffxiv::price_groups::{PriceGroupDeltas, PriceGroupRequest};
use saddlebag_api_types::result::BackendResponse;
use saddlebag_api_types::wow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
    #[error("Backend responded with {0}")]
    Status(StatusCode),
}

#[derive(Clone, Debug)]
pub struct SaddlebagClient {
    client: Client,
    base_url: Url,
}

impl SaddlebagClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.saddlebagexchange.com/api";
    /// Some searches scan every realm in a region and take a while
    const TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(base_url: &str, user_agent: impl ToString) -> Result<Self, Error> {
        // `Url::join` replaces the last segment unless the base ends in a slash
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Self::TIMEOUT)
            .build()?;
        Ok(SaddlebagClient { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn ffxiv_marketshare(
        &self,
        request: &MarketshareRequest,
    ) -> Result<Vec<MarketshareItem>, Error> {
        self.post("ffxivmarketshare", request).await
    }

    pub async fn ffxiv_craftsim(&self, request: &CraftsimRequest) -> Result<Vec<CraftItem>, Error> {
        self.post("v2/craftsim", request).await
    }

    pub async fn ffxiv_price_group_delta(
        &self,
        request: &PriceGroupRequest,
    ) -> Result<PriceGroupDeltas, Error> {
        // keyed by the caller's group names, which may be `data` or `exception` themselves
        let value = self.send("ffxiv/price-group/delta", request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn wow_shortages(
        &self,
        request: &wow::shortage::ShortageRequest,
    ) -> Result<Vec<wow::shortage::ShortageItem>, Error> {
        self.post("wow/shortages", request).await
    }

    pub async fn wow_marketshare(
        &self,
        request: &wow::marketshare::MarketshareRequest,
    ) -> Result<Vec<wow::marketshare::MarketshareItem>, Error> {
        self.post("wow/itemstats", request).await
    }

    pub async fn wow_export_search(
        &self,
        request: &wow::export::ExportSearchRequest,
    ) -> Result<Vec<wow::export::ExportRealm>, Error> {
        self.post("wow/export", request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, Error> {
        let value = self.send(path, body).await?;
        serde_json::from_value::<BackendResponse<T>>(value)?
            .into_result()
            .map_err(Error::Backend)
    }

    /// Posts `body` and returns the reply once it is neither an exception nor an error status
    async fn send<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, Error> {
        let url = self.base_url.join(path)?;
        info!("POST {url}");
        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                warn!("{url} responded {status} without a JSON body");
                return Err(Error::Status(status));
            }
        };
        if let Some(message) = value.get("exception").and_then(Value::as_str) {
            warn!("{url} raised {message}");
            return Err(Error::Backend(message.to_string()));
        }
        if !status.is_success() {
            warn!("{url} responded {status}");
            return Err(Error::Status(status));
        }
        Ok(value)
    }
}
