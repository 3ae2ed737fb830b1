use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::{PricePoint, Slot, TimeWindow};

/// Floor an instant in any time zone to its canonical UTC half-hour slot.
///
/// The instant is converted to UTC first, so two renderings of the same
/// instant in different zones always land in the same slot.
pub fn floor_to_slot<Tz: TimeZone>(ts: &DateTime<Tz>) -> Slot {
    Slot::floor(ts.with_timezone(&Utc))
}

/// Every slot overlapping `window`, ascending.
#[must_use]
pub fn slot_range(window: &TimeWindow) -> Vec<Slot> {
    let mut out = Vec::new();
    let mut cur = Slot::floor(window.start());
    while cur.start() < window.end() {
        out.push(cur);
        cur = cur.next();
    }
    out
}

/// Group observations by slot and average duplicates within each slot.
///
/// Non-finite values are ignored; a slot whose observations are all non-finite
/// is absent from the result.
#[must_use]
pub fn bucket_mean(points: &[PricePoint]) -> BTreeMap<Slot, f64> {
    let mut acc: BTreeMap<Slot, (f64, u32)> = BTreeMap::new();
    for p in points.iter().filter(|p| p.value.is_finite()) {
        let e = acc.entry(Slot::floor(p.ts)).or_insert((0.0, 0));
        e.0 += p.value;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(slot, (sum, n))| (slot, sum / f64::from(n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Timelike};

    fn utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, s).unwrap()
    }

    #[test]
    fn floors_to_half_hours() {
        assert_eq!(floor_to_slot(&utc(10, 0, 0)).start(), utc(10, 0, 0));
        assert_eq!(floor_to_slot(&utc(10, 29, 59)).start(), utc(10, 0, 0));
        assert_eq!(floor_to_slot(&utc(10, 30, 0)).start(), utc(10, 30, 0));
        assert_eq!(floor_to_slot(&utc(10, 59, 59)).start(), utc(10, 30, 0));
    }

    #[test]
    fn drops_sub_seconds() {
        let ts = utc(3, 45, 12) + Duration::milliseconds(999);
        let slot = floor_to_slot(&ts);
        assert_eq!(slot.start().nanosecond(), 0);
        assert_eq!(slot.start(), utc(3, 30, 0));
    }

    #[test]
    fn offset_zones_convert_to_utc_first() {
        // +05:45 shifts the minute grid; the floor must follow UTC, not local time.
        let tz = FixedOffset::east_opt(5 * 3600 + 45 * 60).unwrap();
        let local = utc(10, 10, 0).with_timezone(&tz);
        assert_eq!(floor_to_slot(&local).start(), utc(10, 0, 0));
    }

    #[test]
    fn range_covers_partial_edges() {
        let w = TimeWindow::new(utc(10, 10, 0), utc(11, 5, 0)).unwrap();
        let slots: Vec<_> = slot_range(&w).into_iter().map(Slot::start).collect();
        assert_eq!(slots, vec![utc(10, 0, 0), utc(10, 30, 0), utc(11, 0, 0)]);
    }

    #[test]
    fn duplicates_are_averaged() {
        let pts = [
            PricePoint::new(utc(0, 0, 0), 10.0),
            PricePoint::new(utc(0, 15, 0), 20.0),
            PricePoint::new(utc(0, 30, 0), f64::NAN),
        ];
        let b = bucket_mean(&pts);
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(&Slot::floor(utc(0, 0, 0))), Some(&15.0));
    }
}
