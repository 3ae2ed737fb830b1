use chrono::{DateTime, Duration, TimeZone, Utc};
use slotwise_core::{
    Capability, JoinPolicy, PipelineConfig, PipelineInputs, PricePoint, RankConfig, ReportStatus,
    ScoringMode, SeriesKey, TimeWindow, WeatherSample, compute,
};

fn t(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, h, m, 0).unwrap()
}

fn day_window() -> TimeWindow {
    TimeWindow::new(t(0, 0), t(0, 0) + Duration::hours(24)).unwrap()
}

fn pts(values: &[(u32, u32, f64)]) -> Vec<PricePoint> {
    values
        .iter()
        .map(|(h, m, v)| PricePoint::new(t(*h, *m), *v))
        .collect()
}

#[test]
fn three_slot_cheapness_scenario() {
    let inputs = PipelineInputs::new()
        .with_series(
            SeriesKey::Tariff,
            pts(&[(0, 0, 5.0), (0, 30, 10.0), (1, 0, 15.0)]),
        )
        .with_series(
            SeriesKey::SystemPrice,
            pts(&[(0, 0, 2.0), (0, 30, 2.0), (1, 0, 2.0)]),
        );
    let report = compute(day_window(), &inputs, &PipelineConfig::default());

    assert_eq!(report.status, ReportStatus::Ready);
    assert_eq!(report.mode, "cheapness");
    let scores: Vec<f64> = report.rows.iter().map(|r| r.score).collect();
    for (got, want) in scores.iter().zip([75.0, 50.0, 25.0]) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }
    assert_eq!(report.rows[1].normalized(SeriesKey::SystemPrice), Some(0.5));
}

#[test]
fn empty_required_input_is_a_status_not_an_error() {
    let inputs = PipelineInputs::new()
        .with_series(SeriesKey::Tariff, pts(&[(0, 0, 5.0)]))
        .with_series(SeriesKey::SystemPrice, Vec::new());
    let report = compute(day_window(), &inputs, &PipelineConfig::default());
    assert_eq!(
        report.status,
        ReportStatus::EmptyInput {
            source: Capability::SystemPrices
        }
    );
    assert!(report.rows.is_empty());
    assert!(report.ranking.is_none());
}

#[test]
fn disjoint_series_yield_alignment_empty() {
    let inputs = PipelineInputs::new()
        .with_series(SeriesKey::Tariff, pts(&[(0, 0, 5.0)]))
        .with_series(SeriesKey::SystemPrice, pts(&[(5, 0, 2.0)]));
    let report = compute(day_window(), &inputs, &PipelineConfig::default());
    assert_eq!(report.status, ReportStatus::AlignmentEmpty);
}

#[test]
fn slots_outside_window_are_dropped() {
    let inputs = PipelineInputs::new()
        .with_series(
            SeriesKey::Tariff,
            pts(&[(0, 0, 5.0), (0, 30, 6.0), (1, 0, 7.0)]),
        )
        .with_series(
            SeriesKey::SystemPrice,
            pts(&[(0, 0, 1.0), (0, 30, 2.0), (1, 0, 3.0)]),
        );
    let window = TimeWindow::new(t(0, 30), t(1, 30)).unwrap();
    let report = compute(window, &inputs, &PipelineConfig::default());
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].slot.start(), t(0, 30));
    // Bounds come from the window only, so 0:30 is now the cheapest slot.
    assert_eq!(report.rows[0].score, 100.0);
}

#[test]
fn preference_fills_missing_weather_with_neutral_defaults() {
    let weather = [WeatherSample {
        ts: t(0, 0),
        wind_speed_ms: Some(0.0),
        cloud_cover_pct: Some(100.0),
        solar_radiation_wm2: None,
    }];
    let inputs = PipelineInputs::new()
        .with_series(SeriesKey::Tariff, pts(&[(0, 0, 10.0), (3, 0, 10.0)]))
        .with_weather(&weather);
    let cfg = PipelineConfig {
        join: JoinPolicy::nearest(),
        scoring: ScoringMode::preference(),
        ranking: Some(RankConfig::default()),
    };
    let report = compute(day_window(), &inputs, &cfg);
    assert_eq!(report.status, ReportStatus::Ready);
    assert_eq!(report.rows.len(), 2);

    // 00:00 has weather: 6 + 0.2*1 + 0.1*1 - 0
    assert!((report.rows[0].score - 6.3).abs() < 1e-9);
    // 03:00 falls back to defaults: 6 + 0.1 + 0.1/6
    assert!((report.rows[1].score - (6.1 + 0.1 / 6.0)).abs() < 1e-9);

    let ranking = report.ranking.expect("ranking requested");
    assert_eq!(ranking.selected[0].slot, report.rows[1].slot);
    assert_eq!(ranking.night_slots, 2);
    assert_eq!(ranking.mean_price, Some(10.0));
}

#[test]
fn preference_does_not_need_weather() {
    let inputs = PipelineInputs::new().with_series(SeriesKey::Tariff, pts(&[(12, 0, 20.0)]));
    let cfg = PipelineConfig {
        scoring: ScoringMode::preference(),
        ..PipelineConfig::default()
    };
    let report = compute(day_window(), &inputs, &cfg);
    assert_eq!(report.status, ReportStatus::Ready);
    assert_eq!(report.rows.len(), 1);
}

#[test]
fn cheapness_ranking_prefers_high_scores() {
    let inputs = PipelineInputs::new()
        .with_series(
            SeriesKey::Tariff,
            pts(&[(10, 0, 30.0), (10, 30, 5.0), (11, 0, 20.0)]),
        )
        .with_series(
            SeriesKey::SystemPrice,
            pts(&[(10, 0, 9.0), (10, 30, 1.0), (11, 0, 5.0)]),
        );
    let cfg = PipelineConfig {
        ranking: Some(RankConfig {
            k: 1,
            ..RankConfig::default()
        }),
        ..PipelineConfig::default()
    };
    let report = compute(day_window(), &inputs, &cfg);
    let ranking = report.ranking.unwrap();
    assert_eq!(ranking.selected.len(), 1);
    assert_eq!(ranking.selected[0].slot.start(), t(10, 30));
    assert_eq!(ranking.night_slots, 0);
}
