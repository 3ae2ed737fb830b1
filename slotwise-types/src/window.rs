//! Bounded time windows for a single pipeline run.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::London;
use serde::{Deserialize, Serialize};

use crate::error::SlotwiseError;
use crate::series::Slot;

/// Longest look-ahead accepted by [`TimeWindow::next_hours`].
pub const MAX_WINDOW_HOURS: u32 = 7 * 24;

/// Half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = SlotwiseError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Build a window.
    ///
    /// # Errors
    /// Returns `InvalidArg` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SlotwiseError> {
        if start >= end {
            return Err(SlotwiseError::InvalidArg(format!(
                "window start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window beginning at the slot containing `now` and spanning `hours` hours.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `hours` is zero or exceeds [`MAX_WINDOW_HOURS`].
    pub fn next_hours(now: DateTime<Utc>, hours: u32) -> Result<Self, SlotwiseError> {
        if hours == 0 || hours > MAX_WINDOW_HOURS {
            return Err(SlotwiseError::InvalidArg(format!(
                "window hours must be within 1..={MAX_WINDOW_HOURS}, got {hours}"
            )));
        }
        let start = Slot::floor(now).start();
        Self::new(start, start + Duration::hours(i64::from(hours)))
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `ts` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Every settlement date touched by the window, ascending.
    ///
    /// Settlement dates are Europe/London calendar days, so in summer a
    /// slot starting at 23:00Z belongs to the following date.
    #[must_use]
    pub fn settlement_dates(&self) -> Vec<NaiveDate> {
        let first = self.start.with_timezone(&London).date_naive();
        let last = (self.end - Duration::nanoseconds(1))
            .with_timezone(&London)
            .date_naive();
        first.iter_days().take_while(|d| *d <= last).collect()
    }
}

/// UTC bounds `[start, end)` of the settlement day `date`.
///
/// The day runs from local midnight to local midnight in Europe/London, so it
/// is 46 or 50 slots long on clock-change days.
///
/// # Errors
/// Returns `InvalidArg` when either midnight cannot be resolved.
pub fn settlement_day_bounds(
    date: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>), SlotwiseError> {
    let local_midnight = |d: NaiveDate| {
        London
            .from_local_datetime(&d.and_time(NaiveTime::MIN))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| SlotwiseError::InvalidArg(format!("no local midnight on {d}")))
    };
    let next = date
        .succ_opt()
        .ok_or_else(|| SlotwiseError::InvalidArg(format!("settlement date {date} out of range")))?;
    Ok((local_midnight(date)?, local_midnight(next)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_and_empty() {
        let t = utc(2024, 1, 1, 0, 0);
        assert!(TimeWindow::new(t, t).is_err());
        assert!(TimeWindow::new(t + Duration::hours(1), t).is_err());
    }

    #[test]
    fn next_hours_starts_at_current_slot() {
        let now = utc(2024, 3, 10, 12, 47) + Duration::seconds(13);
        let w = TimeWindow::next_hours(now, 48).unwrap();
        assert_eq!(w.start(), utc(2024, 3, 10, 12, 30));
        assert_eq!(w.end(), utc(2024, 3, 12, 12, 30));
        assert!(TimeWindow::next_hours(now, 0).is_err());
        assert!(TimeWindow::next_hours(now, MAX_WINDOW_HOURS + 1).is_err());
    }

    #[test]
    fn settlement_dates_cover_touched_days() {
        let w = TimeWindow::new(utc(2024, 3, 10, 22, 0), utc(2024, 3, 12, 0, 0)).unwrap();
        let dates = w.settlement_dates();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            ]
        );
    }

    #[test]
    fn settlement_dates_follow_london_days_in_summer() {
        let w = TimeWindow::new(utc(2024, 6, 1, 12, 0), utc(2024, 6, 1, 23, 30)).unwrap();
        assert_eq!(
            w.settlement_dates(),
            vec![
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            ]
        );

        let before = TimeWindow::new(utc(2024, 6, 1, 12, 0), utc(2024, 6, 1, 23, 0)).unwrap();
        assert_eq!(
            before.settlement_dates(),
            vec![NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()]
        );
    }

    #[test]
    fn settlement_day_bounds_track_clock_changes() {
        let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();

        let (from, to) = settlement_day_bounds(day(1, 15)).unwrap();
        assert_eq!((from, to), (utc(2024, 1, 15, 0, 0), utc(2024, 1, 16, 0, 0)));

        let (from, to) = settlement_day_bounds(day(6, 1)).unwrap();
        assert_eq!((from, to), (utc(2024, 5, 31, 23, 0), utc(2024, 6, 1, 23, 0)));

        let (from, to) = settlement_day_bounds(day(3, 31)).unwrap();
        assert_eq!((to - from).num_minutes(), 23 * 60);

        let (from, to) = settlement_day_bounds(day(10, 27)).unwrap();
        assert_eq!((to - from).num_minutes(), 25 * 60);
    }

    #[test]
    fn deserialize_validates_order() {
        let bad = r#"{"start":"2024-01-02T00:00:00Z","end":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<TimeWindow>(bad).is_err());
        let ok = r#"{"start":"2024-01-01T00:00:00Z","end":"2024-01-02T00:00:00Z"}"#;
        let w: TimeWindow = serde_json::from_str(ok).unwrap();
        assert!(w.contains(utc(2024, 1, 1, 23, 30)));
        assert!(!w.contains(utc(2024, 1, 2, 0, 0)));
    }
}
