use chrono::Timelike;
use slotwise_core::{TariffRate, TimeWindow, slot_range};

/// Agile-shaped unit rates: cheap overnight, a 16:00–19:00 peak, flat otherwise.
pub fn rates_for(window: &TimeWindow) -> Vec<TariffRate> {
    slot_range(window)
        .into_iter()
        .map(|slot| {
            let start = slot.start();
            let inc = rate_at(start.hour(), start.minute());
            TariffRate {
                valid_from: start,
                valid_to: Some(slot.end()),
                value_inc_vat: inc,
                value_exc_vat: Some((inc / 1.05 * 1000.0).round() / 1000.0),
            }
        })
        .collect()
}

fn rate_at(hour: u32, minute: u32) -> f64 {
    let half = if minute >= 30 { 0.5 } else { 0.0 };
    match hour {
        0..=5 => 12.0 + f64::from(hour) * 0.5 + half,
        16..=18 => 35.0 + half,
        _ => 22.0 + f64::from(hour % 4) + half,
    }
}
