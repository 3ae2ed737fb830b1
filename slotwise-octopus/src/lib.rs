//! slotwise-octopus
//!
//! Connector that implements `SlotwiseConnector` on top of the Octopus Energy
//! REST API. Serves half-hourly unit rates for single-register electricity
//! tariffs (Agile and friends), following pagination until exhausted.
#![warn(missing_docs)]

mod builder;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::StatusCode;
use slotwise_core::connector::{ConnectorKey, SlotwiseConnector, TariffProvider};
use slotwise_core::{SlotwiseError, TariffRate, TariffRequest};
use url::Url;

pub use builder::OctopusConnectorBuilder;

/// Upper bound on followed `next` links for one request.
const MAX_PAGES: usize = 64;

/// Connection settings for [`OctopusConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctopusConfig {
    /// API root, e.g. `https://api.octopus.energy/v1/`.
    pub base_url: String,
    /// HTTP timeout per page request.
    pub timeout: Duration,
    /// `page_size` sent on the first request.
    pub page_size: u32,
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            base_url: OctopusConnector::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            page_size: 1500,
        }
    }
}

/// Public connector type. Production users will construct with `OctopusConnector::new_default()`.
pub struct OctopusConnector {
    client: reqwest::Client,
    base_url: Url,
    page_size: u32,
}

impl OctopusConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("slotwise-octopus");

    /// Public Octopus Energy API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.octopus.energy/v1/";

    /// Build against the public API with default settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new_default() -> Result<Self, SlotwiseError> {
        Self::from_config(&OctopusConfig::default())
    }

    /// Build from explicit settings.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL and `Other` if the
    /// HTTP client cannot be initialised.
    pub fn from_config(cfg: &OctopusConfig) -> Result<Self, SlotwiseError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| SlotwiseError::Other(format!("http client: {e}")))?;
        Self::with_client(client, &cfg.base_url, cfg.page_size)
    }

    /// Build from an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        page_size: u32,
    ) -> Result<Self, SlotwiseError> {
        Ok(Self {
            client,
            base_url: parse_base(base_url)?,
            page_size,
        })
    }

    fn rates_url(&self, req: &TariffRequest) -> Result<Url, SlotwiseError> {
        let path = format!(
            "products/{}/electricity-tariffs/{}/standard-unit-rates/",
            req.product_code,
            req.tariff_code()
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| SlotwiseError::InvalidArg(format!("tariff url: {e}")))?;
        url.query_pairs_mut()
            .append_pair(
                "period_from",
                &req.window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair(
                "period_to",
                &req.window.end().to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair("page_size", &self.page_size.to_string());
        Ok(url)
    }

    async fn fetch_page(&self, url: Url, what: &str) -> Result<wire::RatePage, SlotwiseError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(url = %url, "GET standard-unit-rates");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SlotwiseError::connector(Self::KEY.as_str(), e.to_string()))?;
        match resp.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(SlotwiseError::not_found(what)),
            s => {
                return Err(SlotwiseError::connector(
                    Self::KEY.as_str(),
                    format!("HTTP {s}"),
                ));
            }
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| SlotwiseError::connector(Self::KEY.as_str(), e.to_string()))?;
        serde_json::from_slice(&body)
            .map_err(|e| SlotwiseError::Data(format!("octopus unit rates: {e}")))
    }
}

fn parse_base(raw: &str) -> Result<Url, SlotwiseError> {
    // `Url::join` drops the last segment unless the base ends in a slash.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| SlotwiseError::InvalidArg(format!("base url {raw}: {e}")))
}

impl SlotwiseConnector for OctopusConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Octopus Energy"
    }

    fn as_tariff_provider(&self) -> Option<&dyn TariffProvider> {
        Some(self as &dyn TariffProvider)
    }
}

#[async_trait]
impl TariffProvider for OctopusConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "slotwise_octopus::tariff_rates",
            skip(self, req),
            fields(tariff = %req.tariff_code()),
        )
    )]
    async fn tariff_rates(&self, req: &TariffRequest) -> Result<Vec<TariffRate>, SlotwiseError> {
        let what = format!("tariff {}", req.tariff_code());
        let mut next = Some(self.rates_url(req)?);
        let mut rates: Vec<TariffRate> = Vec::new();
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(SlotwiseError::Data(format!(
                    "octopus pagination exceeded {MAX_PAGES} pages"
                )));
            }
            let page = self.fetch_page(url, &what).await?;
            rates.extend(page.results.into_iter().map(TariffRate::from));
            next = page
                .next
                .as_deref()
                .map(Url::parse)
                .transpose()
                .map_err(|e| SlotwiseError::Data(format!("octopus next link: {e}")))?;
        }

        rates.sort_by_key(|r| r.valid_from);
        #[cfg(feature = "tracing")]
        tracing::debug!(rates = rates.len(), pages, "fetched unit rates");
        Ok(rates)
    }
}
