use chrono::{Duration, DurationRound, Timelike};
use slotwise_core::{TimeWindow, WeatherSample};

/// Hourly samples covering the window; solar radiation follows a midday arc.
pub fn samples_for(window: &TimeWindow) -> Vec<WeatherSample> {
    let Ok(mut ts) = window.start().duration_trunc(Duration::hours(1)) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    while ts < window.end() {
        if window.contains(ts) {
            let h = ts.hour();
            let solar = if (7..=18).contains(&h) {
                let x = f64::from(h) - 12.5;
                (800.0 - 20.0 * x * x).max(0.0)
            } else {
                0.0
            };
            out.push(WeatherSample {
                ts,
                wind_speed_ms: Some(3.0 + f64::from(h % 6)),
                cloud_cover_pct: Some(f64::from((h * 7) % 100)),
                solar_radiation_wm2: Some(solar),
            });
        }
        ts += Duration::hours(1);
    }
    out
}
