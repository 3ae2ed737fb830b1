use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use slotwise_core::{
    Capability, Coordinates, GspRegion, TariffRequest, TimeWindow, WeatherRequest,
};
use slotwise_middleware::ConnectorBuilder;
use slotwise_mock::DynamicMockConnector;
use slotwise_types::CacheConfig;

fn window(h: u32) -> TimeWindow {
    TimeWindow::next_hours(Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap(), 2).unwrap()
}

fn cache() -> CacheConfig {
    CacheConfig::uniform(Duration::from_secs(60))
}

#[tokio::test]
async fn tariff_key_includes_product_region_and_window() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("keys");
    let wrapped = ConnectorBuilder::new(raw).with_cache(&cache()).build();
    let tp = wrapped.as_tariff_provider().expect("tariff provider");

    let base = TariffRequest::new("AGILE", GspRegion::C, window(0)).unwrap();
    let other_region = TariffRequest::new("AGILE", GspRegion::D, window(0)).unwrap();
    let other_product = TariffRequest::new("GO", GspRegion::C, window(0)).unwrap();
    let other_window = TariffRequest::new("AGILE", GspRegion::C, window(1)).unwrap();
    let same_normalized = TariffRequest::new(" agile ", GspRegion::C, window(0)).unwrap();

    for r in [&base, &other_region, &other_product, &other_window, &same_normalized] {
        tp.tariff_rates(r).await.expect("ok");
    }
    assert_eq!(controller.calls(Capability::TariffRates).await, 4);
}

#[tokio::test]
async fn system_prices_key_on_settlement_date() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("keys");
    let wrapped = ConnectorBuilder::new(raw).with_cache(&cache()).build();
    let sp = wrapped
        .as_system_price_provider()
        .expect("system price provider");

    let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let d2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    for d in [d1, d2, d1, d2] {
        sp.system_prices(d).await.expect("ok");
    }
    assert_eq!(controller.system_price_dates().await, vec![d1, d2]);
}

#[tokio::test]
async fn weather_key_includes_coordinates() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("keys");
    let wrapped = ConnectorBuilder::new(raw).with_cache(&cache()).build();
    let wp = wrapped.as_weather_provider().expect("weather provider");

    let london = WeatherRequest {
        coordinates: Coordinates::new(51.5, -0.1).unwrap(),
        window: window(0),
    };
    let leeds = WeatherRequest {
        coordinates: Coordinates::new(53.8, -1.5).unwrap(),
        window: window(0),
    };
    for r in [&london, &leeds, &london] {
        wp.weather(r).await.expect("ok");
    }
    assert_eq!(controller.calls(Capability::WeatherForecast).await, 2);
}

#[tokio::test]
async fn wrapper_preserves_capabilities_and_identity() {
    let (raw, _controller) =
        DynamicMockConnector::new_with_capabilities("weather-only", &[Capability::WeatherForecast]);
    let wrapped = ConnectorBuilder::new(raw).with_cache(&cache()).build();
    assert_eq!(wrapped.name(), "weather-only");
    assert!(wrapped.as_tariff_provider().is_none());
    assert!(wrapped.as_system_price_provider().is_none());
    assert!(wrapped.supports(Capability::WeatherForecast));
}
