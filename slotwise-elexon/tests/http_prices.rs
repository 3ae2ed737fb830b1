use chrono::{NaiveDate, TimeZone, Utc};
use httpmock::prelude::*;
use serde_json::json;
use slotwise_core::connector::SystemPriceProvider;
use slotwise_core::{SlotwiseConnector, SlotwiseError, SystemPriceSource};
use slotwise_elexon::{ElexonConfig, ElexonConnector};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn connector(server: &MockServer, source: SystemPriceSource) -> ElexonConnector {
    ElexonConnector::from_config(&ElexonConfig {
        base_url: server.url("/bmrs/api/v1"),
        source,
        ..ElexonConfig::default()
    })
    .expect("connector")
}

#[tokio::test]
async fn settlement_prices_are_converted_and_sorted() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/settlement/system-prices/2024-03-01")
                .query_param("format", "json");
            then.status(200).json_body(json!({
                "data": [
                    {"settlementDate": "2024-03-01", "settlementPeriod": 2,
                     "startTime": "2024-03-01T00:30:00Z", "systemSellPrice": 50.0},
                    {"settlementDate": "2024-03-01", "settlementPeriod": 1,
                     "startTime": "2024-03-01T00:00:00Z", "systemSellPrice": 100.0}
                ]
            }));
        })
        .await;

    let prices = connector(&server, SystemPriceSource::SettlementSystemPrices)
        .system_prices(date())
        .await
        .expect("prices");
    m.assert_async().await;
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].settlement_period, Some(1));
    assert!((prices[0].price_p_per_kwh - 10.0).abs() < 1e-9);
    assert!((prices[1].price_p_per_kwh - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn market_index_reads_price_field() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/pricing/market-index")
                .query_param("dataProviders", "APXMIDP")
                .query_param("from", "2024-03-01T00:00:00Z");
            then.status(200).json_body(json!({
                "data": [
                    {"startTime": "2024-03-01T00:00:00Z", "dataProvider": "APXMIDP",
                     "settlementDate": "2024-03-01", "settlementPeriod": 1,
                     "price": 72.3, "volume": 1000.0},
                    {"startTime": "2024-03-02T00:00:00Z", "dataProvider": "APXMIDP",
                     "settlementDate": "2024-03-02", "settlementPeriod": 1,
                     "price": 60.0, "volume": 900.0}
                ]
            }));
        })
        .await;

    let c = connector(&server, SystemPriceSource::MarketIndex);
    assert_eq!(c.source(), SystemPriceSource::MarketIndex);
    let prices = c.system_prices(date()).await.expect("prices");
    m.assert_async().await;
    assert_eq!(prices.len(), 1);
    assert!((prices[0].price_p_per_kwh - 7.23).abs() < 1e-9);
}

#[tokio::test]
async fn market_index_keeps_late_evening_slots_in_summer() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/pricing/market-index")
                .query_param("from", "2024-06-01T23:00:00Z")
                .query_param("to", "2024-06-02T23:00:00Z");
            then.status(200).json_body(json!({
                "data": [
                    {"startTime": "2024-06-01T22:30:00Z", "dataProvider": "APXMIDP",
                     "settlementDate": "2024-06-01", "settlementPeriod": 48, "price": 90.0},
                    {"startTime": "2024-06-01T23:00:00Z", "dataProvider": "APXMIDP",
                     "settlementDate": "2024-06-01", "settlementPeriod": 1, "price": 80.0},
                    {"startTime": "2024-06-01T23:30:00Z", "dataProvider": "APXMIDP",
                     "settlementDate": "2024-06-02", "settlementPeriod": 2, "price": 70.0},
                    {"startTime": "2024-06-02T00:00:00Z", "dataProvider": "APXMIDP",
                     "settlementDate": "2024-06-02", "settlementPeriod": 3, "price": 60.0}
                ]
            }));
        })
        .await;

    let prices = connector(&server, SystemPriceSource::MarketIndex)
        .system_prices(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())
        .await
        .expect("prices");
    m.assert_async().await;
    let starts: Vec<_> = prices.iter().map(|p| p.start).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap(),
        ]
    );
}

#[tokio::test]
async fn empty_or_null_data_is_empty_vec() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/settlement/system-prices/2024-03-01");
            then.status(200).json_body(json!({ "data": null }));
        })
        .await;
    let prices = connector(&server, SystemPriceSource::SettlementSystemPrices)
        .system_prices(date())
        .await
        .expect("prices");
    assert!(prices.is_empty());
}

#[tokio::test]
async fn http_errors_are_classified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/settlement/system-prices/2024-03-01");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/settlement/system-prices/2024-03-02");
            then.status(404);
        })
        .await;
    let c = connector(&server, SystemPriceSource::SettlementSystemPrices);

    let err = c.system_prices(date()).await.expect_err("500");
    assert!(
        matches!(&err, SlotwiseError::Connector { connector, .. } if connector == "slotwise-elexon"),
        "got {err:?}"
    );
    let err = c
        .system_prices(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
        .await
        .expect_err("404");
    assert!(matches!(err, SlotwiseError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_data_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/bmrs/api/v1/balancing/settlement/system-prices/2024-03-01");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;
    let err = connector(&server, SystemPriceSource::SettlementSystemPrices)
        .system_prices(date())
        .await
        .expect_err("html");
    assert!(matches!(err, SlotwiseError::Data(_)), "got {err:?}");
}

#[test]
fn advertises_only_system_prices() {
    let c = ElexonConnector::new_default().expect("connector");
    assert_eq!(c.name(), "slotwise-elexon");
    assert!(c.as_system_price_provider().is_some());
    assert!(c.as_tariff_provider().is_none());
}
