//! Series observations, half-hour slots and pipeline rows.

use core::fmt;
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::SlotwiseError;

/// Length of one settlement slot in seconds.
pub const SLOT_SECONDS: i64 = 30 * 60;

/// One observation of a numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation instant.
    pub ts: DateTime<Utc>,
    /// Observed value in the series' native unit.
    pub value: f64,
}

impl PricePoint {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(ts: DateTime<Utc>, value: f64) -> Self {
        Self { ts, value }
    }
}

/// A canonical half-hour slot, identified by its UTC start instant.
///
/// The start always has minute 0 or 30 and no seconds or sub-seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DateTime<Utc>", into = "DateTime<Utc>")]
pub struct Slot(DateTime<Utc>);

impl Slot {
    /// Floor `ts` to the start of the half-hour slot containing it.
    #[must_use]
    pub fn floor(ts: DateTime<Utc>) -> Self {
        let secs = ts.timestamp();
        let floored = secs - secs.rem_euclid(SLOT_SECONDS);
        // MIN_UTC sits on a slot boundary, so the floored instant is representable.
        Self(DateTime::from_timestamp(floored, 0).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    /// Checked constructor for an instant already on a slot boundary.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start` has a minute other than 0/30 or any
    /// seconds or sub-second component.
    pub fn from_start(start: DateTime<Utc>) -> Result<Self, SlotwiseError> {
        if start.minute() % 30 != 0 || start.second() != 0 || start.nanosecond() != 0 {
            return Err(SlotwiseError::InvalidArg(format!(
                "{start} is not a half-hour slot boundary"
            )));
        }
        Ok(Self(start))
    }

    /// Inclusive start instant.
    #[must_use]
    pub const fn start(self) -> DateTime<Utc> {
        self.0
    }

    /// Exclusive end instant (`start + 30min`).
    #[must_use]
    pub fn end(self) -> DateTime<Utc> {
        self.0 + Duration::seconds(SLOT_SECONDS)
    }

    /// The following slot.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.end())
    }
}

impl TryFrom<DateTime<Utc>> for Slot {
    type Error = SlotwiseError;

    fn try_from(value: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_start(value)
    }
}

impl From<Slot> for DateTime<Utc> {
    fn from(s: Slot) -> Self {
        s.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%MZ"))
    }
}

/// Names of the series the pipeline knows how to align and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKey {
    /// Tariff unit rate, p/kWh.
    Tariff,
    /// Grid system price, p/kWh.
    SystemPrice,
    /// Wind speed at 10 m, m/s.
    WindSpeed,
    /// Total cloud cover, percent.
    CloudCover,
    /// Shortwave solar radiation, W/m².
    SolarRadiation,
}

impl SeriesKey {
    /// Stable kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tariff => "tariff",
            Self::SystemPrice => "system-price",
            Self::WindSpeed => "wind-speed",
            Self::CloudCover => "cloud-cover",
            Self::SolarRadiation => "solar-radiation",
        }
    }

    /// Upstream capability that supplies this series.
    #[must_use]
    pub const fn capability(self) -> Capability {
        match self {
            Self::Tariff => Capability::TariffRates,
            Self::SystemPrice => Capability::SystemPrices,
            Self::WindSpeed | Self::CloudCover | Self::SolarRadiation => {
                Capability::WeatherForecast
            }
        }
    }

    /// Unit suffix for display.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Tariff | Self::SystemPrice => "p/kWh",
            Self::WindSpeed => "m/s",
            Self::CloudCover => "%",
            Self::SolarRadiation => "W/m²",
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot with the aligned value of each matched series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    /// Slot this row describes.
    pub slot: Slot,
    /// Aligned values keyed by series.
    pub values: BTreeMap<SeriesKey, f64>,
}

impl AlignedRow {
    /// Value for `key`, if the series matched this slot.
    #[must_use]
    pub fn get(&self, key: SeriesKey) -> Option<f64> {
        self.values.get(&key).copied()
    }
}

/// An aligned row with normalized components and its final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    /// Slot this row describes.
    pub slot: Slot,
    /// Raw aligned values.
    pub values: BTreeMap<SeriesKey, f64>,
    /// Min-max normalized values in `[0, 1]`.
    pub normalized: BTreeMap<SeriesKey, f64>,
    /// Score under the active scoring mode.
    pub score: f64,
}

impl ScoredRow {
    /// Raw value for `key`.
    #[must_use]
    pub fn value(&self, key: SeriesKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    /// Normalized value for `key`.
    #[must_use]
    pub fn normalized(&self, key: SeriesKey) -> Option<f64> {
        self.normalized.get(&key).copied()
    }
}

/// One tariff unit rate as published by the supplier, in p/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffRate {
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity, if bounded.
    pub valid_to: Option<DateTime<Utc>>,
    /// Unit rate including VAT.
    pub value_inc_vat: f64,
    /// Unit rate excluding VAT.
    pub value_exc_vat: Option<f64>,
}

/// Grid balancing price for one settlement period, already in p/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemPrice {
    /// Start of the settlement period.
    pub start: DateTime<Utc>,
    /// Settlement date as reported upstream.
    pub settlement_date: Option<NaiveDate>,
    /// Settlement period number (1..=50).
    pub settlement_period: Option<u8>,
    /// Price in pence per kWh.
    pub price_p_per_kwh: f64,
}

/// Hourly weather forecast sample. Any field may be missing upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Forecast instant.
    pub ts: DateTime<Utc>,
    /// Wind speed at 10 m, m/s.
    pub wind_speed_ms: Option<f64>,
    /// Cloud cover, percent.
    pub cloud_cover_pct: Option<f64>,
    /// Shortwave radiation, W/m².
    pub solar_radiation_wm2: Option<f64>,
}
