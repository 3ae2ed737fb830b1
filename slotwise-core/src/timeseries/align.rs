use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use super::slot::bucket_mean;
use crate::{AlignedRow, JoinPolicy, PricePoint, SeriesKey, Slot};

/// Raw observations keyed by series.
pub type SeriesSet = BTreeMap<SeriesKey, Vec<PricePoint>>;

/// Which series a join must contain and which it may attach.
///
/// The first required series is the primary: under
/// [`JoinPolicy::NearestWithin`] it anchors the slot grid.
#[derive(Debug, Clone, Copy)]
pub struct JoinSpec<'a> {
    /// Series every output row must contain.
    pub required: &'a [SeriesKey],
    /// Series attached when a value is available.
    pub optional: &'a [SeriesKey],
}

/// Merge `series` onto one row per slot, ascending by slot.
///
/// A missing or empty required series yields no rows.
#[must_use]
pub fn align(series: &SeriesSet, spec: JoinSpec<'_>, policy: JoinPolicy) -> Vec<AlignedRow> {
    let Some((&primary, secondaries)) = spec.required.split_first() else {
        return Vec::new();
    };
    let points = |k: SeriesKey| series.get(&k).map_or(&[][..], Vec::as_slice);
    if spec.required.iter().any(|k| points(*k).is_empty()) {
        return Vec::new();
    }

    match policy {
        JoinPolicy::BucketMean => {
            let primary_buckets = bucket_mean(points(primary));
            let required: Vec<_> = secondaries
                .iter()
                .map(|k| (*k, bucket_mean(points(*k))))
                .collect();
            let optional: Vec<_> = spec
                .optional
                .iter()
                .map(|k| (*k, bucket_mean(points(*k))))
                .collect();
            join_rows(primary, primary_buckets, &required, &optional, |b, slot| {
                b.get(&slot).copied()
            })
        }
        JoinPolicy::NearestWithin { tolerance } => {
            let tolerance = TimeDelta::from_std(tolerance).unwrap_or(TimeDelta::MAX);
            let primary_buckets = bucket_mean(points(primary));
            let required: Vec<_> = secondaries
                .iter()
                .map(|k| (*k, sorted_finite(points(*k))))
                .collect();
            let optional: Vec<_> = spec
                .optional
                .iter()
                .map(|k| (*k, sorted_finite(points(*k))))
                .collect();
            join_rows(primary, primary_buckets, &required, &optional, |s, slot| {
                nearest_within(s, slot.start(), tolerance)
            })
        }
    }
}

fn join_rows<S>(
    primary: SeriesKey,
    primary_buckets: BTreeMap<Slot, f64>,
    required: &[(SeriesKey, S)],
    optional: &[(SeriesKey, S)],
    lookup: impl Fn(&S, Slot) -> Option<f64>,
) -> Vec<AlignedRow> {
    primary_buckets
        .into_iter()
        .filter_map(|(slot, value)| {
            let mut values = BTreeMap::from([(primary, value)]);
            for (key, source) in required {
                values.insert(*key, lookup(source, slot)?);
            }
            for (key, source) in optional {
                if let Some(v) = lookup(source, slot) {
                    values.insert(*key, v);
                }
            }
            Some(AlignedRow { slot, values })
        })
        .collect()
}

fn sorted_finite(points: &[PricePoint]) -> Vec<PricePoint> {
    let mut out: Vec<PricePoint> = points
        .iter()
        .filter(|p| p.value.is_finite())
        .copied()
        .collect();
    out.sort_by_key(|p| p.ts);
    out
}

/// Value of the observation closest to `target` within `tolerance`.
///
/// `sorted` must be ascending by timestamp. Equidistant candidates resolve to
/// the earlier observation.
#[must_use]
pub fn nearest_within(
    sorted: &[PricePoint],
    target: DateTime<Utc>,
    tolerance: TimeDelta,
) -> Option<f64> {
    let idx = sorted.partition_point(|p| p.ts < target);
    let before = idx.checked_sub(1).and_then(|i| sorted.get(i));
    let after = sorted.get(idx);
    let best = match (before, after) {
        (Some(b), Some(a)) => {
            if a.ts - target < target - b.ts {
                a
            } else {
                b
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };
    ((best.ts - target).abs() <= tolerance).then_some(best.value)
}
