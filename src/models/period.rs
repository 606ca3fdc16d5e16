//! Period helpers.
//!
//! Periods are identified by their first day. Weekly periods start on
//! Monday (ISO 8601).

use chrono::{Datelike, Duration, NaiveDate};

/// Returns the Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Number of whole periods of `period_days` between `earlier` and `later`.
///
/// Returns 0 when `period_days` is 0 or `later` is not after `earlier`.
pub fn periods_between(earlier: NaiveDate, later: NaiveDate, period_days: u32) -> u32 {
    if period_days == 0 || later <= earlier {
        return 0;
    }
    ((later - earlier).num_days() / period_days as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_start() {
        // 2026-10-18 is a Sunday
        assert_eq!(week_start(d(2026, 10, 18)), d(2026, 10, 12));
        assert_eq!(week_start(d(2026, 10, 12)), d(2026, 10, 12));
        assert_eq!(week_start(d(2026, 10, 14)), d(2026, 10, 12));
    }

    #[test]
    fn test_periods_between() {
        assert_eq!(periods_between(d(2026, 10, 5), d(2026, 10, 12), 7), 1);
        assert_eq!(periods_between(d(2026, 9, 14), d(2026, 10, 12), 7), 4);
        assert_eq!(periods_between(d(2026, 10, 12), d(2026, 10, 12), 7), 0);
        assert_eq!(periods_between(d(2026, 10, 12), d(2026, 10, 5), 7), 0);
        assert_eq!(periods_between(d(2026, 10, 5), d(2026, 10, 12), 0), 0);
    }
}
