use async_trait::async_trait;
use chrono::NaiveDate;
use slotwise_core::connector::{
    SlotwiseConnector, SystemPriceProvider, TariffProvider, WeatherProvider,
};
use slotwise_core::{
    SlotwiseError, SystemPrice, TariffRate, TariffRequest, WeatherRequest, WeatherSample,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Mock connector for CI-safe demos. Provides deterministic data from generated fixtures.
///
/// Product codes `FAIL`, `EMPTY` and `TIMEOUT` force a connector error, an
/// empty answer and a 200 ms delay respectively.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(code: &str, capability: &'static str) -> Result<(), SlotwiseError> {
        match code {
            "FAIL" => Err(SlotwiseError::connector(
                "slotwise-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                // Long enough for orchestrator timeouts in tests, short enough not to stall them.
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SlotwiseConnector for MockConnector {
    fn name(&self) -> &'static str {
        "slotwise-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_tariff_provider(&self) -> Option<&dyn TariffProvider> {
        Some(self as &dyn TariffProvider)
    }
    fn as_system_price_provider(&self) -> Option<&dyn SystemPriceProvider> {
        Some(self as &dyn SystemPriceProvider)
    }
    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        Some(self as &dyn WeatherProvider)
    }
}

#[async_trait]
impl TariffProvider for MockConnector {
    async fn tariff_rates(&self, req: &TariffRequest) -> Result<Vec<TariffRate>, SlotwiseError> {
        let code = req.product_code.as_str();
        Self::maybe_fail_or_timeout(code, "tariff-rates").await?;
        if code == "EMPTY" {
            return Ok(Vec::new());
        }
        Ok(fixtures::tariff::rates_for(&req.window))
    }
}

#[async_trait]
impl SystemPriceProvider for MockConnector {
    async fn system_prices(&self, date: NaiveDate) -> Result<Vec<SystemPrice>, SlotwiseError> {
        Ok(fixtures::system::prices_for(date))
    }
}

#[async_trait]
impl WeatherProvider for MockConnector {
    async fn weather(&self, req: &WeatherRequest) -> Result<Vec<WeatherSample>, SlotwiseError> {
        Ok(fixtures::weather::samples_for(&req.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use slotwise_core::{GspRegion, TimeWindow};

    fn window() -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        TimeWindow::next_hours(start, 24).unwrap()
    }

    #[tokio::test]
    async fn tariff_fixture_covers_every_slot() {
        let req = TariffRequest::new("AGILE-24-10-01", GspRegion::C, window()).unwrap();
        let rates = MockConnector::new().tariff_rates(&req).await.unwrap();
        assert_eq!(rates.len(), 48);
        assert!(rates.windows(2).all(|w| w[0].valid_from < w[1].valid_from));
    }

    #[tokio::test]
    async fn special_codes_drive_behavior() {
        let m = MockConnector::new();
        let fail = TariffRequest::new("FAIL", GspRegion::C, window()).unwrap();
        assert!(matches!(
            m.tariff_rates(&fail).await,
            Err(SlotwiseError::Connector { .. })
        ));
        let empty = TariffRequest::new("EMPTY", GspRegion::C, window()).unwrap();
        assert!(m.tariff_rates(&empty).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn system_prices_have_forty_eight_periods() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let prices = MockConnector::new().system_prices(date).await.unwrap();
        assert_eq!(prices.len(), 48);
        assert_eq!(prices[47].settlement_period, Some(48));
    }

    #[tokio::test]
    async fn summer_system_prices_start_at_london_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let prices = MockConnector::new().system_prices(date).await.unwrap();
        assert_eq!(prices.len(), 48);
        assert_eq!(
            prices[0].start,
            Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap()
        );

        let spring = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(MockConnector::new().system_prices(spring).await.unwrap().len(), 46);
    }
}
