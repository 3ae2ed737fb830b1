use chrono::{Duration, NaiveDate};
use slotwise_core::{SystemPrice, settlement_day_bounds};

/// One price per settlement period of the London day `date`, in p/kWh.
///
/// Ordinary days have 48 periods; clock-change days have 46 or 50.
pub fn prices_for(date: NaiveDate) -> Vec<SystemPrice> {
    let Ok((from, to)) = settlement_day_bounds(date) else {
        return Vec::new();
    };
    let periods = u8::try_from((to - from).num_minutes() / 30).unwrap_or(48);
    (1..=periods)
        .map(|period| {
            let hour = f64::from(period - 1) / 2.0;
            // £/MWh shape then converted, to mirror upstream units.
            let per_mwh = 60.0 + 40.0 * ((hour - 4.0) / 24.0 * std::f64::consts::TAU).sin().abs();
            SystemPrice {
                start: from + Duration::minutes(30 * i64::from(period - 1)),
                settlement_date: Some(date),
                settlement_period: Some(period),
                price_p_per_kwh: per_mwh * 0.1,
            }
        })
        .collect()
}
