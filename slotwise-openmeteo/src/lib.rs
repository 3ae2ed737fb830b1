//! slotwise-openmeteo
//!
//! Connector that implements `SlotwiseConnector` on top of the Open-Meteo
//! forecast API. Serves hourly 10 m wind speed (m/s), cloud cover (%) and
//! shortwave radiation (W/m²) for a location, in UTC.
#![warn(missing_docs)]

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeDelta;
use reqwest::StatusCode;
use slotwise_core::connector::{ConnectorKey, SlotwiseConnector, WeatherProvider};
use slotwise_core::{SlotwiseError, WeatherRequest, WeatherSample};
use url::Url;

/// Hourly variables requested from the forecast endpoint.
const HOURLY_VARIABLES: &str = "wind_speed_10m,cloud_cover,shortwave_radiation";

/// Connection settings for [`OpenMeteoConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMeteoConfig {
    /// API root, e.g. `https://api.open-meteo.com/`.
    pub base_url: String,
    /// HTTP timeout per request.
    pub timeout: Duration,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: OpenMeteoConnector::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Public connector type for hourly weather forecasts.
pub struct OpenMeteoConnector {
    client: reqwest::Client,
    base_url: Url,
}

impl OpenMeteoConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("slotwise-openmeteo");

    /// Public Open-Meteo API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.open-meteo.com/";

    /// Build against the public API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new_default() -> Result<Self, SlotwiseError> {
        Self::from_config(&OpenMeteoConfig::default())
    }

    /// Build from explicit settings.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL and `Other` if the
    /// HTTP client cannot be initialised.
    pub fn from_config(cfg: &OpenMeteoConfig) -> Result<Self, SlotwiseError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| SlotwiseError::Other(format!("http client: {e}")))?;
        Self::with_client(client, &cfg.base_url)
    }

    /// Build from an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, SlotwiseError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| SlotwiseError::InvalidArg(format!("base url {base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn forecast_url(&self, req: &WeatherRequest) -> Result<Url, SlotwiseError> {
        let mut url = self
            .base_url
            .join("v1/forecast")
            .map_err(|e| SlotwiseError::InvalidArg(format!("open-meteo url: {e}")))?;
        let first_day = req.window.start().date_naive();
        // The window end is exclusive.
        let last_day = (req.window.end() - TimeDelta::nanoseconds(1)).date_naive();
        url.query_pairs_mut()
            .append_pair("latitude", &req.coordinates.latitude().to_string())
            .append_pair("longitude", &req.coordinates.longitude().to_string())
            .append_pair("hourly", HOURLY_VARIABLES)
            .append_pair("wind_speed_unit", "ms")
            .append_pair("timezone", "GMT")
            .append_pair("start_date", &first_day.format("%Y-%m-%d").to_string())
            .append_pair("end_date", &last_day.format("%Y-%m-%d").to_string());
        Ok(url)
    }
}

impl SlotwiseConnector for OpenMeteoConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Open-Meteo"
    }

    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        Some(self as &dyn WeatherProvider)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "slotwise_openmeteo::weather",
            skip(self, req),
            fields(
                lat = req.coordinates.latitude(),
                lon = req.coordinates.longitude(),
            ),
        )
    )]
    async fn weather(&self, req: &WeatherRequest) -> Result<Vec<WeatherSample>, SlotwiseError> {
        let url = self.forecast_url(req)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SlotwiseError::connector(Self::KEY.as_str(), e.to_string()))?;
        match resp.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(SlotwiseError::not_found("open-meteo forecast")),
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
        let forecast: wire::Forecast = serde_json::from_slice(&body)
            .map_err(|e| SlotwiseError::Data(format!("open-meteo forecast: {e}")))?;

        let mut samples = match forecast.hourly {
            Some(h) => h.into_samples()?,
            None => Vec::new(),
        };
        samples.retain(|s| req.window.contains(s.ts));
        samples.sort_by_key(|s| s.ts);
        #[cfg(feature = "tracing")]
        tracing::debug!(samples = samples.len(), "fetched forecast");
        Ok(samples)
    }
}
