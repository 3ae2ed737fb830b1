//! Top-K slot selection and its summary.

use chrono::Timelike;

use crate::{NightHours, RankConfig, RankOrder, RankSummary, ScoredRow, SeriesKey};

/// Select the `k` best rows under `order`.
///
/// Returns `min(k, rows.len())` rows sorted by score, ties broken by slot
/// (earliest first). Applying it to its own output returns the same rows.
#[must_use]
pub fn top_k(rows: &[ScoredRow], k: usize, order: RankOrder) -> Vec<ScoredRow> {
    let mut sorted: Vec<&ScoredRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        let by_score = match order {
            RankOrder::Ascending => a.score.total_cmp(&b.score),
            RankOrder::Descending => b.score.total_cmp(&a.score),
        };
        by_score.then_with(|| a.slot.cmp(&b.slot))
    });
    sorted.into_iter().take(k).cloned().collect()
}

/// Count night slots and average price and score over `selected`.
#[must_use]
pub fn summarize(selected: Vec<ScoredRow>, night: &NightHours) -> RankSummary {
    let night_slots = selected
        .iter()
        .filter(|r| night.is_night_hour(r.slot.start().with_timezone(&night.tz).hour()))
        .count();
    let prices: Vec<f64> = selected
        .iter()
        .filter_map(|r| r.value(SeriesKey::Tariff))
        .collect();
    let scores: Vec<f64> = selected.iter().map(|r| r.score).collect();
    RankSummary {
        night_slots,
        mean_price: mean(&prices),
        mean_score: mean(&scores),
        selected,
    }
}

/// Select and summarize in one step.
#[must_use]
pub fn rank(rows: &[ScoredRow], cfg: &RankConfig, order: RankOrder) -> RankSummary {
    summarize(top_k(rows, cfg.k, order), &cfg.night)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    Some(values.iter().sum::<f64>() / n)
}
