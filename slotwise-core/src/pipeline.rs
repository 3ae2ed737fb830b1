//! The pure half-hour pipeline: bucket, align, normalize, score and rank.
//!
//! Nothing here performs I/O or keeps state between calls; normalization
//! bounds are recomputed from each window's rows.

use crate::ranking::rank;
use crate::scoring::score_rows;
use crate::timeseries::align::{JoinSpec, SeriesSet, align};
use crate::{
    PipelineConfig, PricePoint, ReportStatus, ScoreReport, SeriesKey, SystemPrice, TariffRate,
    TimeWindow, WeatherSample,
};

/// Raw series handed to [`compute`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineInputs {
    series: SeriesSet,
}

impl PipelineInputs {
    /// Empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the observations for `key`.
    #[must_use]
    pub fn with_series(mut self, key: SeriesKey, points: Vec<PricePoint>) -> Self {
        self.series.insert(key, points);
        self
    }

    /// Add tariff rates, keyed at the start of each validity period (VAT inclusive).
    #[must_use]
    pub fn with_tariff(self, rates: &[TariffRate]) -> Self {
        let pts = rates
            .iter()
            .map(|r| PricePoint::new(r.valid_from, r.value_inc_vat))
            .collect();
        self.with_series(SeriesKey::Tariff, pts)
    }

    /// Add system prices in p/kWh.
    #[must_use]
    pub fn with_system_prices(self, prices: &[SystemPrice]) -> Self {
        let pts = prices
            .iter()
            .map(|p| PricePoint::new(p.start, p.price_p_per_kwh))
            .collect();
        self.with_series(SeriesKey::SystemPrice, pts)
    }

    /// Split weather samples into one series per measured quantity.
    #[must_use]
    pub fn with_weather(self, samples: &[WeatherSample]) -> Self {
        let column = |f: fn(&WeatherSample) -> Option<f64>| -> Vec<PricePoint> {
            samples
                .iter()
                .filter_map(|s| f(s).map(|v| PricePoint::new(s.ts, v)))
                .collect()
        };
        let wind = column(|s| s.wind_speed_ms);
        let cloud = column(|s| s.cloud_cover_pct);
        let solar = column(|s| s.solar_radiation_wm2);
        self.with_series(SeriesKey::WindSpeed, wind)
            .with_series(SeriesKey::CloudCover, cloud)
            .with_series(SeriesKey::SolarRadiation, solar)
    }

    /// Observations for `key`; empty when absent.
    #[must_use]
    pub fn series(&self, key: SeriesKey) -> &[PricePoint] {
        self.series.get(&key).map_or(&[][..], Vec::as_slice)
    }
}

/// Run the pipeline over `inputs` for `window`.
///
/// Only slots starting inside the window are kept. The report status is
/// `EmptyInput` when a required series has no observations, `AlignmentEmpty`
/// when nothing survives the join, and `Ready` otherwise. `cfg` is expected
/// to have passed [`PipelineConfig::validate`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "slotwise_core::pipeline::compute",
        skip(inputs, cfg),
        fields(mode = cfg.scoring.name(), start = %window.start(), end = %window.end()),
    )
)]
#[must_use]
pub fn compute(window: TimeWindow, inputs: &PipelineInputs, cfg: &PipelineConfig) -> ScoreReport {
    let mode = cfg.scoring.name();
    let spec = JoinSpec {
        required: cfg.scoring.required_series(),
        optional: cfg.scoring.optional_series(),
    };

    if let Some(missing) = spec
        .required
        .iter()
        .find(|k| inputs.series(**k).is_empty())
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(series = %missing, "required series empty");
        return ScoreReport::empty(
            window,
            mode,
            ReportStatus::EmptyInput {
                source: missing.capability(),
            },
        );
    }

    let mut aligned = align(&inputs.series, spec, cfg.join);
    aligned.retain(|r| window.contains(r.slot.start()));
    if aligned.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::debug!("no slot survived alignment");
        return ScoreReport::empty(window, mode, ReportStatus::AlignmentEmpty);
    }

    let rows = score_rows(&aligned, &cfg.scoring);
    let ranking = cfg
        .ranking
        .as_ref()
        .map(|rc| rank(&rows, rc, cfg.scoring.best_order()));

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = rows.len(), "scored window");

    ScoreReport {
        window,
        mode: mode.to_string(),
        rows,
        status: ReportStatus::Ready,
        ranking,
        warnings: Vec::new(),
    }
}
