//! Connector metadata and request types usable across crates.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SlotwiseError;
use crate::window::TimeWindow;

/// Typed key for identifying connectors in priority configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorKey(pub &'static str);

impl ConnectorKey {
    /// Construct a new typed connector key from a static name.
    ///
    /// This is useful when configuring per-capability priorities.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<ConnectorKey> for &'static str {
    fn from(k: ConnectorKey) -> Self {
        k.0
    }
}

/// UK grid supply point (GSP) group, identified by the letter used in tariff codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum GspRegion {
    /// Eastern England
    A,
    /// East Midlands
    B,
    /// London
    C,
    /// Merseyside and North Wales
    D,
    /// West Midlands
    E,
    /// North Eastern England
    F,
    /// North Western England
    G,
    /// Southern England
    #[default]
    H,
    /// South Eastern England
    J,
    /// Southern Wales
    K,
    /// South Western England
    L,
    /// Yorkshire
    M,
    /// Southern Scotland
    N,
    /// Northern Scotland
    P,
}

impl GspRegion {
    /// Every region in tariff-code order.
    pub const ALL: [Self; 14] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::P,
    ];

    /// Single-letter code used in tariff codes and URLs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::P => "P",
        }
    }

    /// Human-readable area name.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::A => "Eastern England",
            Self::B => "East Midlands",
            Self::C => "London",
            Self::D => "Merseyside and North Wales",
            Self::E => "West Midlands",
            Self::F => "North Eastern England",
            Self::G => "North Western England",
            Self::H => "Southern England",
            Self::J => "South Eastern England",
            Self::K => "Southern Wales",
            Self::L => "South Western England",
            Self::M => "Yorkshire",
            Self::N => "Southern Scotland",
            Self::P => "Northern Scotland",
        }
    }
}

impl fmt::Display for GspRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GspRegion {
    type Err = SlotwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| SlotwiseError::InvalidArg(format!("unknown GSP region code: {s}")))
    }
}

/// WGS84 coordinates for weather lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Build validated coordinates.
    ///
    /// # Errors
    /// Returns `InvalidArg` when latitude is outside `[-90, 90]`, longitude is
    /// outside `[-180, 180]`, or either value is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SlotwiseError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SlotwiseError::InvalidArg(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SlotwiseError::InvalidArg(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Request for half-hourly tariff unit rates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TariffRequest {
    /// Product code, e.g. `AGILE-24-10-01`.
    pub product_code: String,
    /// Distribution region.
    pub region: GspRegion,
    /// Window of validity to fetch.
    pub window: TimeWindow,
}

impl TariffRequest {
    /// Build a request, trimming and upper-casing the product code.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the product code is empty.
    pub fn new(
        product_code: impl AsRef<str>,
        region: GspRegion,
        window: TimeWindow,
    ) -> Result<Self, SlotwiseError> {
        let product_code = product_code.as_ref().trim().to_ascii_uppercase();
        if product_code.is_empty() {
            return Err(SlotwiseError::InvalidArg(
                "tariff product code must not be empty".into(),
            ));
        }
        Ok(Self {
            product_code,
            region,
            window,
        })
    }

    /// Single-register electricity tariff code, e.g. `E-1R-AGILE-24-10-01-H`.
    #[must_use]
    pub fn tariff_code(&self) -> String {
        format!("E-1R-{}-{}", self.product_code, self.region.code())
    }
}

/// Request for an hourly weather forecast at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    /// Forecast location.
    pub coordinates: Coordinates,
    /// Window of forecast samples to return.
    pub window: TimeWindow,
}
