//! Slotwise scores UK electricity half-hour slots across multiple providers.
//!
//! Overview
//! - Routes each capability (tariff rates, system prices, weather) to the
//!   connectors that implement the `slotwise_core` contracts, in priority order
//!   with a per-provider timeout and fallback.
//! - Fetches independent inputs concurrently and system prices per settlement
//!   date, keeping partial results when some dates fail.
//! - Runs the pure pipeline (bucket, align, normalize, score, rank) from
//!   `slotwise_core` over what was fetched.
//!
//! Key behaviors and trade-offs
//! - Scoring mode:
//!   - `Cheapness`: bounded 0..=100 index from tariff and system price; higher is
//!     cheaper. Needs both series for every slot.
//!   - `Preference`: unbounded penalty from tariff and weather; lower is better.
//!     Missing weather falls back to neutral values.
//! - Join policy:
//!   - `BucketMean`: mean per half-hour, inner join on slot. Strict.
//!   - `NearestWithin`: nearest secondary observation within a tolerance of each
//!     primary slot. Tolerant of offset timestamps.
//! - Failures: tariff failure aborts; failed system-price dates and weather
//!   failures are reported as warnings on the `ScoreReport`.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use slotwise::{GspRegion, RunRequest, Slotwise, TimeWindow};
//!
//! let slotwise = Slotwise::builder()
//!     .with_connector(OctopusConnector::cached()?.build())
//!     .with_connector(Arc::new(ElexonConnector::new_default()?))
//!     .build()?;
//!
//! let window = TimeWindow::next_hours(chrono::Utc::now(), 48)?;
//! let req = RunRequest::new("AGILE-24-10-01", GspRegion::H, window)?;
//! let report = slotwise.run(&req).await?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod fetch;
mod run;
mod util;

pub use crate::core::{Slotwise, SlotwiseBuilder, tag_err};
pub use run::RunRequest;
pub use util::collapse_errors;

pub use slotwise_middleware::{CacheMiddleware, ConnectorBuilder};

// Re-export core types for convenience
pub use slotwise_core::{
    AlignedRow, CacheConfig, Capability, CheapnessWeights, ConnectorKey, Coordinates, GspRegion,
    JoinPolicy, MAX_WINDOW_HOURS, NeutralDefaults, NightHours, PipelineConfig, PreferenceWeights, RankConfig,
    RankOrder, RankSummary, ReportStatus, ScoreReport, ScoredRow, ScoringMode, SeriesKey, Slot,
    SlotwiseConfig, SlotwiseConnector, SlotwiseError, SystemPrice, SystemPriceSource, TariffRate,
    TariffRequest, TimeWindow, WeatherRequest, WeatherSample,
};
