use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use serde_json::json;
use slotwise_core::connector::TariffProvider;
use slotwise_core::{GspRegion, SlotwiseConnector, SlotwiseError, TariffRequest, TimeWindow};
use slotwise_octopus::{OctopusConfig, OctopusConnector};

const RATES_PATH: &str =
    "/v1/products/AGILE-24-10-01/electricity-tariffs/E-1R-AGILE-24-10-01-C/standard-unit-rates/";

fn connector(server: &MockServer) -> OctopusConnector {
    OctopusConnector::from_config(&OctopusConfig {
        base_url: server.url("/v1"),
        ..OctopusConfig::default()
    })
    .expect("connector")
}

fn request() -> TariffRequest {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    TariffRequest::new(
        "agile-24-10-01",
        GspRegion::C,
        TimeWindow::next_hours(start, 1).unwrap(),
    )
    .unwrap()
}

fn rate(from: &str, to: &str, inc: f64) -> serde_json::Value {
    json!({
        "value_exc_vat": inc / 1.05,
        "value_inc_vat": inc,
        "valid_from": from,
        "valid_to": to,
        "payment_method": null
    })
}

#[tokio::test]
async fn follows_next_links_and_sorts() {
    let server = MockServer::start_async().await;
    let page2 = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/page-2");
            then.status(200).json_body(json!({
                "count": 2,
                "next": null,
                "previous": null,
                "results": [rate("2024-03-01T00:00:00Z", "2024-03-01T00:30:00Z", 12.5)]
            }));
        })
        .await;
    let page1 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(RATES_PATH)
                .query_param("period_from", "2024-03-01T00:00:00Z")
                .query_param("period_to", "2024-03-01T01:00:00Z")
                .query_param("page_size", "1500");
            then.status(200).json_body(json!({
                "count": 2,
                "next": server.url("/v1/page-2"),
                "previous": null,
                "results": [rate("2024-03-01T00:30:00Z", "2024-03-01T01:00:00Z", 20.0)]
            }));
        })
        .await;

    let rates = connector(&server)
        .tariff_rates(&request())
        .await
        .expect("rates");
    page1.assert_async().await;
    page2.assert_async().await;
    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0].value_inc_vat, 12.5);
    assert_eq!(rates[1].value_inc_vat, 20.0);
    assert!(rates[0].valid_from < rates[1].valid_from);
}

#[tokio::test]
async fn empty_results_are_not_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RATES_PATH);
            then.status(200)
                .json_body(json!({"count": 0, "next": null, "previous": null, "results": []}));
        })
        .await;
    let rates = connector(&server)
        .tariff_rates(&request())
        .await
        .expect("rates");
    assert!(rates.is_empty());
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RATES_PATH);
            then.status(404).json_body(json!({"detail": "Not found."}));
        })
        .await;
    let err = connector(&server)
        .tariff_rates(&request())
        .await
        .expect_err("404");
    assert!(matches!(err, SlotwiseError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_tagged_with_connector() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RATES_PATH);
            then.status(503);
        })
        .await;
    let err = connector(&server)
        .tariff_rates(&request())
        .await
        .expect_err("503");
    match err {
        SlotwiseError::Connector { connector, msg } => {
            assert_eq!(connector, "slotwise-octopus");
            assert!(msg.contains("503"), "msg: {msg}");
        }
        other => panic!("expected connector error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_data_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RATES_PATH);
            then.status(200).body("{\"results\": [{\"value_inc_vat\": \"cheap\"}]}");
        })
        .await;
    let err = connector(&server)
        .tariff_rates(&request())
        .await
        .expect_err("bad json");
    assert!(matches!(err, SlotwiseError::Data(_)), "got {err:?}");
}

#[test]
fn advertises_only_tariff_capability() {
    let c = OctopusConnector::new_default().expect("connector");
    assert_eq!(c.name(), "slotwise-octopus");
    assert!(c.as_tariff_provider().is_some());
    assert!(c.as_system_price_provider().is_none());
    assert!(c.as_weather_provider().is_none());
}
