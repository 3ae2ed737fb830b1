use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for routing, caching, errors, and telemetry.
///
/// These map one-to-one with the upstream data sources the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Half-hourly tariff unit rates (e.g. Octopus Agile).
    TariffRates,
    /// Grid balancing prices per settlement period.
    SystemPrices,
    /// Hourly weather forecast samples.
    WeatherForecast,
}

impl Capability {
    /// Stable, kebab-case identifier for logs, errors and cache configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TariffRates => "tariff-rates",
            Self::SystemPrices => "system-prices",
            Self::WeatherForecast => "weather-forecast",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
