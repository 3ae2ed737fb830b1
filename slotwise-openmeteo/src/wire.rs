//! Response shape of the `/v1/forecast` endpoint.

use chrono::NaiveDateTime;
use serde::Deserialize;
use slotwise_core::{SlotwiseError, WeatherSample};

/// Format of `hourly.time` entries when `timezone=GMT`.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
pub(crate) struct Forecast {
    pub hourly: Option<Hourly>,
}

/// Parallel arrays; any measurement may be null.
#[derive(Debug, Deserialize)]
pub(crate) struct Hourly {
    pub time: Vec<String>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    pub shortwave_radiation: Vec<Option<f64>>,
}

impl Hourly {
    /// Zip the arrays into samples. Shorter measurement arrays read as missing.
    pub fn into_samples(self) -> Result<Vec<WeatherSample>, SlotwiseError> {
        let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();
        self.time
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let ts = NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
                    .map_err(|e| SlotwiseError::Data(format!("open-meteo time {raw:?}: {e}")))?
                    .and_utc();
                Ok(WeatherSample {
                    ts,
                    wind_speed_ms: at(&self.wind_speed_10m, i),
                    cloud_cover_pct: at(&self.cloud_cover, i),
                    solar_radiation_wm2: at(&self.shortwave_radiation, i),
                })
            })
            .collect()
    }
}
