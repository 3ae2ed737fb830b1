use serde::{Deserialize, Serialize};

/// Value every element takes when the window has no spread.
pub const DEGENERATE: f64 = 0.5;

/// Observed bounds of one series over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl MinMax {
    /// Bounds of `values`, or `None` when empty.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |acc, v| Self {
                min: acc.min.min(*v),
                max: acc.max.max(*v),
            },
        ))
    }

    /// Scale `x` into `[0, 1]` relative to these bounds.
    #[must_use]
    pub fn scale(&self, x: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            DEGENERATE
        } else {
            ((x - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// Min-max normalize `values` over the whole slice.
///
/// `(x - min) / (max - min)` per element; when every value is equal the
/// result is [`DEGENERATE`] throughout. Empty input gives empty output.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    MinMax::of(values).map_or_else(Vec::new, |mm| {
        values.iter().map(|x| mm.scale(*x)).collect()
    })
}
