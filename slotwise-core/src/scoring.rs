//! Per-slot scores under the configured [`ScoringMode`].
//!
//! Every row's `normalized` map carries the min-max scaling of each series it
//! contains, computed over the rows passed in. Scores are a function of the
//! whole window: adding or removing a slot can change every other score.

use std::collections::BTreeMap;

use crate::timeseries::normalize::MinMax;
use crate::{
    AlignedRow, CheapnessWeights, NeutralDefaults, PreferenceWeights, ScoredRow, ScoringMode,
    SeriesKey,
};

/// Cheapness index in `[0, 100]` from normalized tariff and system price.
///
/// 100 when both inputs are at their window minimum, 0 when both are at
/// their maximum. Weights must pass [`CheapnessWeights::validate`] and both
/// inputs must lie in `[0, 1]`; the result is not clamped.
#[must_use]
pub fn cheapness(tariff_norm: f64, system_norm: f64, w: &CheapnessWeights) -> f64 {
    debug_assert!(w.validate().is_ok(), "invalid cheapness weights {w:?}");
    debug_assert!(
        (0.0..=1.0).contains(&tariff_norm) && (0.0..=1.0).contains(&system_norm),
        "normalized inputs out of range: {tariff_norm}, {system_norm}"
    );
    let weighted = w.tariff.mul_add(tariff_norm, w.system * system_norm);
    100.0 * (1.0 - weighted)
}

/// Weather inputs for the preference penalty; `None` falls back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherInputs {
    /// Cloud cover percent.
    pub cloud_cover_pct: Option<f64>,
    /// Wind speed, m/s.
    pub wind_speed_ms: Option<f64>,
    /// Solar radiation, W/m².
    pub solar_radiation_wm2: Option<f64>,
}

/// Preference penalty. Lower is better; unbounded.
///
/// The price term uses the raw tariff in p/kWh while the weather terms are
/// fractions, so price dominates.
#[must_use]
pub fn preference(
    tariff_p_per_kwh: f64,
    weather: WeatherInputs,
    w: &PreferenceWeights,
    defaults: &NeutralDefaults,
) -> f64 {
    let cloud = weather.cloud_cover_pct.unwrap_or(defaults.cloud_cover_pct);
    let wind = weather
        .wind_speed_ms
        .unwrap_or(defaults.wind_speed_ms)
        .max(0.0);
    let solar = weather
        .solar_radiation_wm2
        .unwrap_or(defaults.solar_radiation_wm2);

    w.price * tariff_p_per_kwh + w.cloud * (cloud / 100.0) + w.wind * (1.0 / (1.0 + wind))
        - w.solar * (solar / 1000.0).min(1.0)
}

/// Score aligned rows, preserving their order.
///
/// Rows missing a series the mode requires are skipped.
#[must_use]
pub fn score_rows(rows: &[AlignedRow], mode: &ScoringMode) -> Vec<ScoredRow> {
    let bounds = series_bounds(rows);
    rows.iter()
        .filter_map(|row| {
            let normalized: BTreeMap<SeriesKey, f64> = row
                .values
                .iter()
                .filter_map(|(k, v)| bounds.get(k).map(|mm| (*k, mm.scale(*v))))
                .collect();
            let score = match mode {
                ScoringMode::Cheapness(w) => cheapness(
                    *normalized.get(&SeriesKey::Tariff)?,
                    *normalized.get(&SeriesKey::SystemPrice)?,
                    w,
                ),
                ScoringMode::Preference { weights, defaults } => preference(
                    row.get(SeriesKey::Tariff)?,
                    WeatherInputs {
                        cloud_cover_pct: row.get(SeriesKey::CloudCover),
                        wind_speed_ms: row.get(SeriesKey::WindSpeed),
                        solar_radiation_wm2: row.get(SeriesKey::SolarRadiation),
                    },
                    weights,
                    defaults,
                ),
            };
            Some(ScoredRow {
                slot: row.slot,
                values: row.values.clone(),
                normalized,
                score,
            })
        })
        .collect()
}

/// Min-max bounds of every series present in `rows`.
#[must_use]
pub fn series_bounds(rows: &[AlignedRow]) -> BTreeMap<SeriesKey, MinMax> {
    let mut columns: BTreeMap<SeriesKey, Vec<f64>> = BTreeMap::new();
    for row in rows {
        for (k, v) in &row.values {
            columns.entry(*k).or_default().push(*v);
        }
    }
    columns
        .into_iter()
        .filter_map(|(k, col)| MinMax::of(&col).map(|mm| (k, mm)))
        .collect()
}
