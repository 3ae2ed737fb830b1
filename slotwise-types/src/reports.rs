//! Report envelopes produced by the pipeline and the orchestrator.

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::SlotwiseError;
use crate::series::ScoredRow;
use crate::window::TimeWindow;

/// Outcome of a run that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportStatus {
    /// Rows were produced.
    Ready,
    /// A required upstream returned no data for the window.
    EmptyInput {
        /// Capability whose data was empty.
        source: Capability,
    },
    /// Every input had data but no slot survived the join.
    AlignmentEmpty,
}

/// Top-K selection with its summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RankSummary {
    /// Selected rows, best first.
    pub selected: Vec<ScoredRow>,
    /// Selected slots that fall in night hours.
    pub night_slots: usize,
    /// Mean tariff rate over the selection, p/kWh.
    pub mean_price: Option<f64>,
    /// Mean score over the selection.
    pub mean_score: Option<f64>,
}

/// Scored half-hour slots for a window.
///
/// Carries the scored rows in chronological order, the optional ranking and any
/// non-fatal warnings encountered while fetching (for example a settlement day
/// whose system prices could not be retrieved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Window that was scored.
    pub window: TimeWindow,
    /// Scoring mode name (`cheapness` or `preference`).
    pub mode: String,
    /// Scored rows, ascending by slot.
    pub rows: Vec<ScoredRow>,
    /// Run outcome.
    pub status: ReportStatus,
    /// Top-K summary when ranking was requested and rows exist.
    pub ranking: Option<RankSummary>,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<SlotwiseError>,
}

impl ScoreReport {
    /// A report without rows for the given status.
    #[must_use]
    pub fn empty(window: TimeWindow, mode: impl Into<String>, status: ReportStatus) -> Self {
        Self {
            window,
            mode: mode.into(),
            rows: Vec::new(),
            status,
            ranking: None,
            warnings: Vec::new(),
        }
    }

    /// True when rows were produced.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.status, ReportStatus::Ready)
    }
}
