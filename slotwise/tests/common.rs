#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use slotwise::{GspRegion, RunRequest, SystemPrice, TariffRate, TimeWindow, WeatherSample};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 22, 0, 0).unwrap()
}

/// Four hours from 22:00, crossing into the next settlement date.
pub fn window() -> TimeWindow {
    TimeWindow::next_hours(t0(), 4).unwrap()
}

pub fn request() -> RunRequest {
    RunRequest::new("AGILE-24-10-01", GspRegion::C, window()).unwrap()
}

pub fn day1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}

pub fn day2() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()
}

fn slots() -> impl Iterator<Item = (usize, DateTime<Utc>)> {
    (0..8).map(|i| (i, t0() + Duration::minutes(30 * i as i64)))
}

pub fn tariff() -> Vec<TariffRate> {
    slots()
        .map(|(i, ts)| TariffRate {
            valid_from: ts,
            valid_to: Some(ts + Duration::minutes(30)),
            value_inc_vat: 10.0 + i as f64,
            value_exc_vat: None,
        })
        .collect()
}

pub fn system_for(date: NaiveDate) -> Vec<SystemPrice> {
    slots()
        .filter(|(_, ts)| ts.date_naive() == date)
        .map(|(i, ts)| SystemPrice {
            start: ts,
            settlement_date: Some(date),
            settlement_period: None,
            price_p_per_kwh: 5.0 + (i % 3) as f64,
        })
        .collect()
}

pub fn weather() -> Vec<WeatherSample> {
    (0..4)
        .map(|h| WeatherSample {
            ts: t0() + Duration::hours(h),
            wind_speed_ms: Some(3.0 + h as f64),
            cloud_cover_pct: Some(50.0),
            solar_radiation_wm2: Some(0.0),
        })
        .collect()
}
