//! Re-export of the shared data model from `slotwise-types`.
// Consolidated re-exports so downstream crates can depend on `slotwise-core` only

pub use slotwise_types::{Capability, ConnectorKey, SlotwiseError};

pub use slotwise_types::{
    AlignedRow, PricePoint, SLOT_SECONDS, ScoredRow, SeriesKey, Slot, SystemPrice, TariffRate,
    WeatherSample,
};
pub use slotwise_types::{Coordinates, GspRegion, TariffRequest, WeatherRequest};
pub use slotwise_types::{MAX_WINDOW_HOURS, TimeWindow, settlement_day_bounds};

pub use slotwise_types::{
    CacheConfig, CheapnessWeights, JoinPolicy, NeutralDefaults, NightHours, PipelineConfig,
    PreferenceWeights, RankConfig, RankOrder, ScoringMode, SlotwiseConfig, SystemPriceSource,
};
pub use slotwise_types::{RankSummary, ReportStatus, ScoreReport};
