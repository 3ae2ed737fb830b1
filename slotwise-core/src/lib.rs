//! slotwise-core
//!
//! Connector traits and the pure computation shared across the slotwise workspace.
//!
//! - `types`: the data model re-exported from `slotwise-types`.
//! - `connector`: the `SlotwiseConnector` trait and capability provider traits.
//! - `timeseries`: half-hour bucketing, series alignment and normalization.
//! - `scoring` / `ranking`: cheapness and preference scores, top-K selection.
//! - `pipeline`: the composition of the above into a [`ScoreReport`].
//!
//! Everything except the connector traits is synchronous and free of I/O.
#![warn(missing_docs)]

/// Connector capability traits and the primary `SlotwiseConnector` interface.
pub mod connector;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Pure pipeline entry point.
pub mod pipeline;
/// Top-K selection and summary statistics.
pub mod ranking;
/// Cheapness index and preference penalty.
pub mod scoring;
/// Time-series utilities for bucketing, alignment and normalization.
pub mod timeseries;
pub mod types;

pub use connector::SlotwiseConnector;
pub use middleware::{Middleware, wrap_layers};
pub use pipeline::{PipelineInputs, compute};
pub use ranking::{rank, summarize, top_k};
pub use scoring::score_rows;
pub use timeseries::align::{JoinSpec, SeriesSet, align};
pub use timeseries::normalize::{MinMax, normalize};
pub use timeseries::slot::{bucket_mean, floor_to_slot, slot_range};
pub use types::*;
