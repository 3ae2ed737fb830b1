//! Configuration types shared across the pipeline, orchestrator and connectors.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::SlotwiseError;
use crate::series::SeriesKey;

const WEIGHT_EPSILON: f64 = 1e-9;

/// How two or more series are merged onto the half-hour timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Average duplicates inside each slot, then keep slots present in every required series.
    #[default]
    BucketMean,
    /// Anchor on the primary series and attach the closest secondary observation
    /// whose raw timestamp is within `tolerance` of the slot start.
    NearestWithin {
        /// Largest accepted distance between slot start and observation.
        tolerance: Duration,
    },
}

impl JoinPolicy {
    /// Default matching tolerance for [`JoinPolicy::NearestWithin`].
    pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(15 * 60);

    /// Nearest-neighbour join with the default 15 minute tolerance.
    #[must_use]
    pub const fn nearest() -> Self {
        Self::NearestWithin {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

/// Weights of the cheapness index components. Must be non-negative and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheapnessWeights {
    /// Weight of the normalized tariff rate.
    pub tariff: f64,
    /// Weight of the normalized system price.
    pub system: f64,
}

impl Default for CheapnessWeights {
    fn default() -> Self {
        Self {
            tariff: 0.5,
            system: 0.5,
        }
    }
}

impl CheapnessWeights {
    /// Check that weights are finite, non-negative and sum to one.
    ///
    /// # Errors
    /// Returns `InvalidArg` describing the offending weights.
    pub fn validate(&self) -> Result<(), SlotwiseError> {
        let all = [self.tariff, self.system];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SlotwiseError::InvalidArg(format!(
                "cheapness weights must be finite and non-negative: {self:?}"
            )));
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(SlotwiseError::InvalidArg(format!(
                "cheapness weights must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Weights of the preference penalty terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    /// Weight of the raw tariff rate (p/kWh).
    pub price: f64,
    /// Weight of cloud cover as a fraction.
    pub cloud: f64,
    /// Weight of `1 / (1 + wind)`.
    pub wind: f64,
    /// Weight of the solar bonus, subtracted from the penalty.
    pub solar: f64,
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self {
            price: 0.6,
            cloud: 0.2,
            wind: 0.1,
            solar: 0.1,
        }
    }
}

/// Values substituted for missing weather inputs before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeutralDefaults {
    /// Cloud cover percent.
    pub cloud_cover_pct: f64,
    /// Wind speed in m/s.
    pub wind_speed_ms: f64,
    /// Solar radiation in W/m².
    pub solar_radiation_wm2: f64,
}

impl Default for NeutralDefaults {
    fn default() -> Self {
        Self {
            cloud_cover_pct: 50.0,
            wind_speed_ms: 5.0,
            solar_radiation_wm2: 0.0,
        }
    }
}

/// Direction in which scores are "best".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankOrder {
    /// Lowest score first.
    Ascending,
    /// Highest score first.
    Descending,
}

/// Scoring strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Bounded 0..=100 index from normalized tariff and system price. Higher is cheaper.
    Cheapness(CheapnessWeights),
    /// Unbounded penalty from tariff and weather. Lower is better.
    Preference {
        /// Term weights.
        weights: PreferenceWeights,
        /// Substitutes for missing weather values.
        defaults: NeutralDefaults,
    },
}

impl Default for ScoringMode {
    fn default() -> Self {
        Self::Cheapness(CheapnessWeights::default())
    }
}

impl ScoringMode {
    /// Preference mode with default weights and defaults.
    #[must_use]
    pub fn preference() -> Self {
        Self::Preference {
            weights: PreferenceWeights::default(),
            defaults: NeutralDefaults::default(),
        }
    }

    /// Short identifier for logs and output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cheapness(_) => "cheapness",
            Self::Preference { .. } => "preference",
        }
    }

    /// Which direction counts as "best" for this mode.
    #[must_use]
    pub const fn best_order(&self) -> RankOrder {
        match self {
            Self::Cheapness(_) => RankOrder::Descending,
            Self::Preference { .. } => RankOrder::Ascending,
        }
    }

    /// Series that must be present in every aligned row. The first is the primary.
    #[must_use]
    pub const fn required_series(&self) -> &'static [SeriesKey] {
        match self {
            Self::Cheapness(_) => &[SeriesKey::Tariff, SeriesKey::SystemPrice],
            Self::Preference { .. } => &[SeriesKey::Tariff],
        }
    }

    /// Series attached when available.
    #[must_use]
    pub const fn optional_series(&self) -> &'static [SeriesKey] {
        match self {
            Self::Cheapness(_) => &[],
            Self::Preference { .. } => &[
                SeriesKey::WindSpeed,
                SeriesKey::CloudCover,
                SeriesKey::SolarRadiation,
            ],
        }
    }

    /// Capabilities the orchestrator must fetch for this mode.
    #[must_use]
    pub const fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Cheapness(_) => &[Capability::TariffRates, Capability::SystemPrices],
            Self::Preference { .. } => &[Capability::TariffRates, Capability::WeatherForecast],
        }
    }

    /// Validate mode parameters.
    ///
    /// # Errors
    /// Returns `InvalidArg` for invalid weights or non-finite defaults.
    pub fn validate(&self) -> Result<(), SlotwiseError> {
        match self {
            Self::Cheapness(w) => w.validate(),
            Self::Preference { weights, defaults } => {
                let values = [
                    weights.price,
                    weights.cloud,
                    weights.wind,
                    weights.solar,
                    defaults.cloud_cover_pct,
                    defaults.wind_speed_ms,
                    defaults.solar_radiation_wm2,
                ];
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(SlotwiseError::InvalidArg(
                        "preference weights and defaults must be finite".into(),
                    ));
                }
                if defaults.wind_speed_ms < 0.0 {
                    return Err(SlotwiseError::InvalidArg(
                        "neutral wind speed must be non-negative".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Local-hour predicate for "night" slots: `hour < morning_end || hour >= evening_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightHours {
    /// First local hour that is no longer night.
    pub morning_end: u32,
    /// First local hour that is night again.
    pub evening_start: u32,
    /// Zone the hour is evaluated in.
    pub tz: Tz,
}

impl Default for NightHours {
    fn default() -> Self {
        Self {
            morning_end: 8,
            evening_start: 20,
            tz: chrono_tz::Europe::London,
        }
    }
}

impl NightHours {
    /// True when `hour` (0..24, local) counts as night.
    #[must_use]
    pub const fn is_night_hour(&self, hour: u32) -> bool {
        hour < self.morning_end || hour >= self.evening_start
    }
}

/// Top-K selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Number of slots to select.
    pub k: usize,
    /// Night-slot predicate for the summary.
    pub night: NightHours,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            k: 12,
            night: NightHours::default(),
        }
    }
}

/// Settings of the pure computation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Alignment strategy.
    pub join: JoinPolicy,
    /// Scoring strategy.
    pub scoring: ScoringMode,
    /// Optional top-K ranking.
    pub ranking: Option<RankConfig>,
}

impl PipelineConfig {
    /// Validate every nested setting.
    ///
    /// # Errors
    /// Returns `InvalidArg` for zero `k`, zero tolerance, out-of-range night
    /// hours, or invalid scoring parameters.
    pub fn validate(&self) -> Result<(), SlotwiseError> {
        self.scoring.validate()?;
        if let JoinPolicy::NearestWithin { tolerance } = self.join
            && tolerance.is_zero()
        {
            return Err(SlotwiseError::InvalidArg(
                "nearest join tolerance must be positive".into(),
            ));
        }
        if let Some(rank) = &self.ranking {
            if rank.k == 0 {
                return Err(SlotwiseError::InvalidArg("top-k must be positive".into()));
            }
            if rank.night.morning_end > 24 || rank.night.evening_start > 24 {
                return Err(SlotwiseError::InvalidArg(
                    "night hours must be within 0..=24".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Per-capability TTLs and capacity for the cache middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when no per-capability override exists.
    pub default_ttl: Duration,
    /// Per-capability TTL overrides. A zero TTL disables caching for that capability.
    pub per_capability_ttl: Vec<(Capability, Duration)>,
    /// Maximum entries per capability cache.
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(5 * 60),
            per_capability_ttl: vec![
                // Tariff rates are published once a day.
                (Capability::TariffRates, Duration::from_secs(30 * 60)),
                (Capability::SystemPrices, Duration::from_secs(5 * 60)),
                (Capability::WeatherForecast, Duration::from_secs(15 * 60)),
            ],
            capacity: 256,
        }
    }
}

impl CacheConfig {
    /// Uniform TTL for every capability.
    #[must_use]
    pub fn uniform(ttl: Duration) -> Self {
        Self {
            default_ttl: ttl,
            per_capability_ttl: Vec::new(),
            ..Self::default()
        }
    }

    /// Effective TTL for `cap`; `None` when caching is disabled for it.
    #[must_use]
    pub fn ttl_for(&self, cap: Capability) -> Option<Duration> {
        let ttl = self
            .per_capability_ttl
            .iter()
            .find(|(c, _)| *c == cap)
            .map_or(self.default_ttl, |(_, ttl)| *ttl);
        (!ttl.is_zero()).then_some(ttl)
    }
}

/// Upstream endpoint used for grid system prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemPriceSource {
    /// Settlement system sell price per settlement period.
    #[default]
    SettlementSystemPrices,
    /// Market index price (APX mid price).
    MarketIndex,
}

/// Global configuration for the `Slotwise` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotwiseConfig {
    /// Pure computation settings.
    pub pipeline: PipelineConfig,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
    /// Optional deadline for the whole fetch phase of a run.
    pub request_timeout: Option<Duration>,
}

impl Default for SlotwiseConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            provider_timeout: Duration::from_secs(15),
            request_timeout: None,
        }
    }
}
