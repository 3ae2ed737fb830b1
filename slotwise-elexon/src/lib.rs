//! slotwise-elexon
//!
//! Connector that implements `SlotwiseConnector` on top of the Elexon
//! Insights (BMRS) API. Serves GB balancing prices per settlement date from
//! either the settlement system-prices endpoint or the APX market index,
//! converted from £/MWh to p/kWh.
#![warn(missing_docs)]

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use slotwise_core::connector::{ConnectorKey, SlotwiseConnector, SystemPriceProvider};
use slotwise_core::{SlotwiseError, SystemPrice, SystemPriceSource, settlement_day_bounds};
use url::Url;

use crate::wire::{Envelope, MarketIndexRow, SettlementRow};

/// Connection settings for [`ElexonConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElexonConfig {
    /// API root, e.g. `https://data.elexon.co.uk/bmrs/api/v1/`.
    pub base_url: String,
    /// HTTP timeout per request.
    pub timeout: Duration,
    /// Which price series to read.
    pub source: SystemPriceSource,
}

impl Default for ElexonConfig {
    fn default() -> Self {
        Self {
            base_url: ElexonConnector::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            source: SystemPriceSource::default(),
        }
    }
}

/// Public connector type for GB system prices.
pub struct ElexonConnector {
    client: reqwest::Client,
    base_url: Url,
    source: SystemPriceSource,
}

impl ElexonConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("slotwise-elexon");

    /// Public Insights API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://data.elexon.co.uk/bmrs/api/v1/";

    /// Data provider requested from the market index endpoint.
    pub const MARKET_INDEX_PROVIDER: &'static str = "APXMIDP";

    /// Build against the public API reading settlement system prices.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new_default() -> Result<Self, SlotwiseError> {
        Self::from_config(&ElexonConfig::default())
    }

    /// Build from explicit settings.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL and `Other` if the
    /// HTTP client cannot be initialised.
    pub fn from_config(cfg: &ElexonConfig) -> Result<Self, SlotwiseError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| SlotwiseError::Other(format!("http client: {e}")))?;
        Self::with_client(client, &cfg.base_url, cfg.source)
    }

    /// Build from an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        source: SystemPriceSource,
    ) -> Result<Self, SlotwiseError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| SlotwiseError::InvalidArg(format!("base url {base_url}: {e}")))?;
        Ok(Self {
            client,
            base_url,
            source,
        })
    }

    fn join(&self, path: &str) -> Result<Url, SlotwiseError> {
        self.base_url
            .join(path)
            .map_err(|e| SlotwiseError::InvalidArg(format!("elexon url: {e}")))
    }

    fn settlement_url(&self, date: NaiveDate) -> Result<Url, SlotwiseError> {
        let mut url = self.join(&format!(
            "balancing/settlement/system-prices/{}",
            date.format("%Y-%m-%d")
        ))?;
        url.query_pairs_mut().append_pair("format", "json");
        Ok(url)
    }

    fn market_index_url(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Url, SlotwiseError> {
        let mut url = self.join("balancing/pricing/market-index")?;
        url.query_pairs_mut()
            .append_pair("from", &from.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("to", &to.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("dataProviders", Self::MARKET_INDEX_PROVIDER)
            .append_pair("format", "json");
        Ok(url)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        url: Url,
        date: NaiveDate,
    ) -> Result<Vec<T>, SlotwiseError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(url = %url, "GET elexon");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SlotwiseError::connector(Self::KEY.as_str(), e.to_string()))?;
        match resp.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(SlotwiseError::not_found(format!(
                    "system prices for {date}"
                )));
            }
            s => {
                return Err(SlotwiseError::connector(
                    Self::KEY.as_str(),
                    format!("HTTP {s} for {date}"),
                ));
            }
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| SlotwiseError::connector(Self::KEY.as_str(), e.to_string()))?;
        let env: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|e| SlotwiseError::Data(format!("elexon {date}: {e}")))?;
        Ok(env.into_rows())
    }
}

impl SlotwiseConnector for ElexonConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Elexon"
    }

    fn as_system_price_provider(&self) -> Option<&dyn SystemPriceProvider> {
        Some(self as &dyn SystemPriceProvider)
    }
}

#[async_trait]
impl SystemPriceProvider for ElexonConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "slotwise_elexon::system_prices",
            skip(self),
            fields(source = ?self.source),
        )
    )]
    async fn system_prices(&self, date: NaiveDate) -> Result<Vec<SystemPrice>, SlotwiseError> {
        let mut prices: Vec<SystemPrice> = match self.source {
            SystemPriceSource::SettlementSystemPrices => self
                .get_rows::<SettlementRow>(self.settlement_url(date)?, date)
                .await?
                .into_iter()
                .map(SystemPrice::from)
                .collect(),
            SystemPriceSource::MarketIndex => {
                // Select the local day by start time, not by the row's settlement date.
                let (from, to) = settlement_day_bounds(date)?;
                self.get_rows::<MarketIndexRow>(self.market_index_url(from, to)?, date)
                    .await?
                    .into_iter()
                    .map(SystemPrice::from)
                    .filter(|p| from <= p.start && p.start < to)
                    .collect()
            }
        };
        prices.retain(|p| p.price_p_per_kwh.is_finite());
        prices.sort_by_key(|p| p.start);
        Ok(prices)
    }

    fn source(&self) -> SystemPriceSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(source: SystemPriceSource) -> ElexonConnector {
        ElexonConnector::with_client(reqwest::Client::new(), "https://elexon.test/bmrs/api/v1", source)
            .unwrap()
    }

    #[test]
    fn settlement_url_shape() {
        let c = connector(SystemPriceSource::SettlementSystemPrices);
        let url = c
            .settlement_url(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://elexon.test/bmrs/api/v1/balancing/settlement/system-prices/2024-03-01?format=json"
        );
    }

    fn market_index_query(date: NaiveDate) -> Vec<(String, String)> {
        let c = connector(SystemPriceSource::MarketIndex);
        let (from, to) = settlement_day_bounds(date).unwrap();
        let url = c.market_index_url(from, to).unwrap();
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn market_index_url_spans_one_day() {
        let q = market_index_query(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(q[0], ("from".into(), "2024-03-01T00:00:00Z".into()));
        assert_eq!(q[1], ("to".into(), "2024-03-02T00:00:00Z".into()));
        assert_eq!(q[2], ("dataProviders".into(), "APXMIDP".into()));
    }

    #[test]
    fn market_index_url_uses_london_midnights_in_summer() {
        let q = market_index_query(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(q[0], ("from".into(), "2024-05-31T23:00:00Z".into()));
        assert_eq!(q[1], ("to".into(), "2024-06-01T23:00:00Z".into()));
    }
}
