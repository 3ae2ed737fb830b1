//! Data model, configuration and error types shared by the slotwise crates.
#![warn(missing_docs)]

mod capability;
mod config;
mod connector;
mod error;
mod reports;
mod series;
mod window;

pub use capability::Capability;
pub use config::{
    CacheConfig, CheapnessWeights, JoinPolicy, NeutralDefaults, NightHours, PipelineConfig,
    PreferenceWeights, RankConfig, RankOrder, ScoringMode, SlotwiseConfig, SystemPriceSource,
};
pub use connector::{ConnectorKey, Coordinates, GspRegion, TariffRequest, WeatherRequest};
pub use error::SlotwiseError;
pub use reports::{RankSummary, ReportStatus, ScoreReport};
pub use series::{
    AlignedRow, PricePoint, SLOT_SECONDS, ScoredRow, SeriesKey, Slot, SystemPrice, TariffRate,
    WeatherSample,
};
pub use window::{MAX_WINDOW_HOURS, TimeWindow, settlement_day_bounds};
