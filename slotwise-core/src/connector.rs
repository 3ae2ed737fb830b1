use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    Capability, SlotwiseError, SystemPrice, SystemPriceSource, TariffRate, TariffRequest,
    WeatherRequest, WeatherSample,
};
pub use slotwise_types::ConnectorKey;

/// Focused role trait for connectors that provide half-hourly tariff unit rates.
#[async_trait]
pub trait TariffProvider: Send + Sync {
    /// Fetch every unit rate whose validity overlaps the request window.
    ///
    /// Implementations return rates sorted ascending by `valid_from`. An empty
    /// vector is a valid answer (rates not yet published).
    async fn tariff_rates(&self, req: &TariffRequest) -> Result<Vec<TariffRate>, SlotwiseError>;
}

/// Focused role trait for connectors that provide grid system prices.
#[async_trait]
pub trait SystemPriceProvider: Send + Sync {
    /// Fetch system prices for one settlement date, already converted to p/kWh.
    async fn system_prices(&self, date: NaiveDate) -> Result<Vec<SystemPrice>, SlotwiseError>;

    /// Upstream endpoint this provider reads from.
    fn source(&self) -> SystemPriceSource {
        SystemPriceSource::default()
    }
}

/// Focused role trait for connectors that provide hourly weather forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch forecast samples inside the request window.
    async fn weather(&self, req: &WeatherRequest) -> Result<Vec<WeatherSample>, SlotwiseError>;
}

/// Main connector trait implemented by provider crates. Exposes capability discovery.
#[async_trait]
pub trait SlotwiseConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g., "slotwise-octopus", "slotwise-elexon").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    ///
    /// Use this helper when configuring per-capability priorities.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise tariff capability by returning a usable trait object reference when supported.
    fn as_tariff_provider(&self) -> Option<&dyn TariffProvider> {
        None
    }

    /// Advertise system price capability.
    fn as_system_price_provider(&self) -> Option<&dyn SystemPriceProvider> {
        None
    }

    /// Advertise weather forecast capability.
    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        None
    }

    /// Whether this connector serves `cap`.
    fn supports(&self, cap: Capability) -> bool {
        match cap {
            Capability::TariffRates => self.as_tariff_provider().is_some(),
            Capability::SystemPrices => self.as_system_price_provider().is_some(),
            Capability::WeatherForecast => self.as_weather_provider().is_some(),
        }
    }
}

/// Generate `as_*_provider` accessors for a wrapper that implements
/// `SlotwiseConnector` by delegating to an inner field.
///
/// The wrapper must implement every provider trait itself; an accessor only
/// advertises the capability when the inner connector does.
#[macro_export]
macro_rules! slotwise_connector_accessors {
    ($inner:ident) => {
        fn as_tariff_provider(&self) -> Option<&dyn $crate::connector::TariffProvider> {
            if self.$inner.as_tariff_provider().is_some() {
                Some(self as &dyn $crate::connector::TariffProvider)
            } else {
                None
            }
        }
        fn as_system_price_provider(&self) -> Option<&dyn $crate::connector::SystemPriceProvider> {
            if self.$inner.as_system_price_provider().is_some() {
                Some(self as &dyn $crate::connector::SystemPriceProvider)
            } else {
                None
            }
        }
        fn as_weather_provider(&self) -> Option<&dyn $crate::connector::WeatherProvider> {
            if self.$inner.as_weather_provider().is_some() {
                Some(self as &dyn $crate::connector::WeatherProvider)
            } else {
                None
            }
        }
    };
}
